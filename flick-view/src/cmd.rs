use std::sync::Arc;

use flick_core::movie::Movie;

use crate::{controller::LoadToken, error::Error};

#[derive(Debug)]
pub enum ViewEvent {
    // Navigation
    Enter(Arc<Movie>),
    Open(Arc<Movie>),
    OpenRecommendation(usize),
    NavigateBack,
    NavigateForward,

    // Genre filter
    ToggleGenre(Arc<str>),
    ClearGenres,

    // Recommendations
    SetRecommendationCount(usize),
    Refetch,
    RecommendationsLoaded(LoadToken, Result<Vec<Movie>, Error>),

    // Lifecycle
    Dispose,
    Shutdown,
}
