use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use flick_core::webapi::RecommendationSource;
use threadpool::ThreadPool;

use crate::{
    cmd::ViewEvent,
    controller::{Completion, DetailController, DetailView, LoadRequest},
};

pub enum Act {
    Continue,
    Shutdown,
}

/// Owns the detail controller and runs its recommendation loads on a worker
/// pool.  Finished loads come back as `ViewEvent::RecommendationsLoaded`
/// through `sink`, so all controller state stays on the handling thread.
pub struct Delegate {
    controller: DetailController,
    source: Arc<dyn RecommendationSource>,
    pool: ThreadPool,
    sink: Sender<ViewEvent>,
}

impl Delegate {
    pub fn new(
        controller: DetailController,
        source: Arc<dyn RecommendationSource>,
        sink: Sender<ViewEvent>,
    ) -> Self {
        const MAX_LOAD_THREADS: usize = 4;

        Self {
            controller,
            source,
            pool: ThreadPool::with_name("recommendations".into(), MAX_LOAD_THREADS),
            sink,
        }
    }

    pub fn controller(&self) -> &DetailController {
        &self.controller
    }

    pub fn view(&self) -> DetailView {
        self.controller.view()
    }

    pub fn handle(&mut self, event: ViewEvent) -> Act {
        let request = match event {
            ViewEvent::Enter(movie) => self.controller.enter(movie),
            ViewEvent::Open(movie) => self.controller.open(movie),
            ViewEvent::OpenRecommendation(index) => self.controller.open_recommendation(index),
            ViewEvent::NavigateBack => self.controller.go_back(),
            ViewEvent::NavigateForward => self.controller.go_forward(),
            ViewEvent::ToggleGenre(genre) => {
                self.controller.toggle_genre(&genre);
                None
            }
            ViewEvent::ClearGenres => {
                self.controller.clear_genres();
                None
            }
            ViewEvent::SetRecommendationCount(count) => {
                self.controller.set_recommendation_count(count)
            }
            ViewEvent::Refetch => self.controller.refetch(),
            ViewEvent::RecommendationsLoaded(token, result) => {
                if self.controller.complete(token, result) == Completion::Stale {
                    log::debug!("ignored result for {}", token.subject);
                }
                None
            }
            ViewEvent::Dispose => {
                self.controller.dispose();
                None
            }
            ViewEvent::Shutdown => {
                self.controller.dispose();
                return Act::Shutdown;
            }
        };
        if let Some(request) = request {
            self.dispatch(request);
        }
        Act::Continue
    }

    fn dispatch(&self, request: LoadRequest) {
        let source = self.source.clone();
        let sink = self.sink.clone();
        self.pool.execute(move || {
            let result = source
                .recommendations(request.subject(), request.count)
                .map_err(Into::into);
            if sink
                .send(ViewEvent::RecommendationsLoaded(request.token, result))
                .is_err()
            {
                log::debug!("view is gone, dropping result for {}", request.subject());
            }
        });
    }

    /// Handle events until `Shutdown` arrives, calling `on_change` with a
    /// fresh snapshot after each one.
    pub fn process(mut self, recv: Receiver<ViewEvent>, mut on_change: impl FnMut(&DetailView)) {
        for event in recv {
            match self.handle(event) {
                Act::Continue => on_change(&self.view()),
                Act::Shutdown => break,
            }
        }
        self.pool.join();
    }
}
