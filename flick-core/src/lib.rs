#![allow(clippy::new_without_default)]

pub mod cache;
pub mod error;
pub mod movie;
pub mod util;
pub mod webapi;
