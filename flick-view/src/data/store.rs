use std::sync::Arc;

use parking_lot::Mutex;

/// Write-only channel for the page background.
pub trait BackdropSignal: Send {
    fn set_backdrop(&self, path: Option<Arc<str>>);
}

/// Number of forward steps currently available in the browsing history.
pub trait HistoryCounter: Send {
    fn get(&self) -> usize;

    fn set(&self, count: usize);
}

#[derive(Debug, Default)]
struct StoreState {
    background_path: Option<Arc<str>>,
    forward_history: usize,
}

/// App-wide state shared between the detail view and the rest of the UI.
/// The view only ever gets the narrow handles below, never the store itself.
#[derive(Clone, Debug, Default)]
pub struct Store {
    state: Arc<Mutex<StoreState>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backdrop(&self) -> Backdrop {
        Backdrop {
            state: self.state.clone(),
        }
    }

    pub fn forward_history(&self) -> ForwardHistory {
        ForwardHistory {
            state: self.state.clone(),
        }
    }

    pub fn background_path(&self) -> Option<Arc<str>> {
        self.state.lock().background_path.clone()
    }

    pub fn forward_steps(&self) -> usize {
        self.state.lock().forward_history
    }
}

#[derive(Clone, Debug)]
pub struct Backdrop {
    state: Arc<Mutex<StoreState>>,
}

impl BackdropSignal for Backdrop {
    fn set_backdrop(&self, path: Option<Arc<str>>) {
        self.state.lock().background_path = path;
    }
}

#[derive(Clone, Debug)]
pub struct ForwardHistory {
    state: Arc<Mutex<StoreState>>,
}

impl HistoryCounter for ForwardHistory {
    fn get(&self) -> usize {
        self.state.lock().forward_history
    }

    fn set(&self, count: usize) {
        self.state.lock().forward_history = count;
    }
}
