use std::sync::Arc;

use flick_core::{
    movie::{Movie, MovieId},
    util::Sequence,
};
use im::Vector;

use crate::{
    data::{BackdropSignal, Promise, PromiseState},
    error::Error,
};

/// Identifies one recommendation load.  Only the most recently issued token
/// is live; results carrying any other token are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadToken {
    pub subject: MovieId,
    generation: u64,
}

impl LoadToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Work order handed to whoever actually talks to the recommendation source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    pub token: LoadToken,
    pub count: usize,
}

impl LoadRequest {
    pub fn subject(&self) -> MovieId {
        self.token.subject
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Failed,
    Stale,
}

pub struct FetchCoordinator {
    generation: Sequence<u64>,
    status: Promise<usize, LoadToken>,
    recommendations: Vector<Arc<Movie>>,
    recommendations_for: Option<MovieId>,
    backdrop: Box<dyn BackdropSignal>,
}

impl FetchCoordinator {
    pub fn new(backdrop: impl BackdropSignal + 'static) -> Self {
        Self {
            generation: Sequence::new(0),
            status: Promise::Empty,
            recommendations: Vector::new(),
            recommendations_for: None,
            backdrop: Box::new(backdrop),
        }
    }

    /// Start loading recommendations for `subject`, superseding any load still
    /// in flight.
    pub fn load(&mut self, subject: &Movie, count: usize) -> LoadRequest {
        let token = LoadToken {
            subject: subject.id,
            generation: self.generation.advance(),
        };
        if let Some(previous) = self.status.deferred() {
            log::debug!("load {:?} superseded by {:?}", previous, token);
        }
        if self.recommendations_for != Some(subject.id) {
            self.recommendations.clear();
            self.recommendations_for = Some(subject.id);
        }
        self.status.defer(token);
        self.backdrop.set_backdrop(subject.backdrop_path.clone());

        log::info!("loading {} recommendations for {}", count.max(1), subject.id);
        LoadRequest {
            token,
            count: count.max(1),
        }
    }

    pub fn complete(&mut self, token: LoadToken, result: Result<Vec<Movie>, Error>) -> Completion {
        if !self.status.is_deferred(&token) {
            log::debug!("dropping stale recommendations {:?}", token);
            return Completion::Stale;
        }
        match result {
            Ok(movies) => {
                self.recommendations = movies.into_iter().map(Arc::new).collect();
                self.status.resolve(self.recommendations.len());
                Completion::Applied
            }
            Err(err) => {
                log::warn!("failed to load recommendations for {}: {}", token.subject, err);
                self.status.reject(err);
                Completion::Failed
            }
        }
    }

    /// Release the live session.  Whatever is still in flight becomes stale,
    /// and the background goes back to neutral.
    pub fn dispose(&mut self) {
        if let Some(token) = self.status.deferred() {
            log::debug!("disposing while {:?} is in flight", token);
        }
        self.status.clear();
        self.recommendations.clear();
        self.recommendations_for = None;
        self.backdrop.set_backdrop(None);
    }

    pub fn is_loading(&self) -> bool {
        self.status.state() == PromiseState::Deferred
    }

    pub fn live_token(&self) -> Option<LoadToken> {
        self.status.deferred().copied()
    }

    pub fn error(&self) -> Option<&Error> {
        self.status.rejected()
    }

    pub fn recommendations(&self) -> &Vector<Arc<Movie>> {
        &self.recommendations
    }
}
