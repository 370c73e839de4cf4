#![allow(clippy::new_without_default)]

pub mod cmd;
pub mod controller;
pub mod data;
pub mod delegate;
pub mod error;
