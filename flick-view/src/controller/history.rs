use crate::data::{HistoryCounter, Nav, Navigator};

/// Keeps the forward-step counter in step with the host navigator.
pub struct HistoryTracker {
    navigator: Box<dyn Navigator>,
    counter: Box<dyn HistoryCounter>,
}

impl HistoryTracker {
    pub fn new(navigator: impl Navigator + 'static, counter: impl HistoryCounter + 'static) -> Self {
        Self {
            navigator: Box::new(navigator),
            counter: Box::new(counter),
        }
    }

    pub fn current(&self) -> Option<&Nav> {
        self.navigator.current()
    }

    pub fn forward_steps(&self) -> usize {
        self.counter.get()
    }

    pub fn can_go_back(&self) -> bool {
        self.navigator.can_move_by(-1)
    }

    pub fn can_go_forward(&self) -> bool {
        self.counter.get() > 0
    }

    pub fn go_back(&mut self) -> Option<Nav> {
        let Some(nav) = self.navigator.move_by(-1) else {
            log::warn!("cannot go back, no previous entry");
            return None;
        };
        self.counter.set(self.counter.get() + 1);
        Some(nav)
    }

    pub fn go_forward(&mut self) -> Option<Nav> {
        let steps = self.counter.get();
        if steps == 0 {
            log::warn!("cannot go forward, nothing to redo");
            return None;
        }
        let Some(nav) = self.navigator.move_by(1) else {
            // The host lost its forward entries behind our back.
            log::warn!("host has no forward entry, resetting history counter");
            self.counter.set(0);
            return None;
        };
        self.counter.set(steps - 1);
        Some(nav)
    }

    /// Visit a new entry.  The host drops its forward entries, so there is
    /// nothing left to redo.
    pub fn push(&mut self, nav: Nav) {
        self.navigator.push(nav);
        self.counter.set(0);
    }
}
