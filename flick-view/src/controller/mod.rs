mod detail;
mod fetch;
mod genre_filter;
mod history;

pub use self::{
    detail::{DetailController, DetailView},
    fetch::{Completion, FetchCoordinator, LoadRequest, LoadToken},
    genre_filter::{derive as derive_filtered, GenreFilter},
    history::HistoryTracker,
};
