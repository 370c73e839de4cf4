mod config;
mod nav;
mod promise;
mod store;

pub use crate::data::{
    config::{Config, SelectionPolicy},
    nav::{Nav, NavStack, Navigator},
    promise::{Promise, PromiseState},
    store::{Backdrop, BackdropSignal, ForwardHistory, HistoryCounter, Store},
};
