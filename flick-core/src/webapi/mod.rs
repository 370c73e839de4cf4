mod cache;
mod client;

pub use self::{
    cache::WebApiCache,
    client::{parse_recommendations, WebApi},
};

use std::sync::Arc;

use crate::{
    error::Error,
    movie::{Movie, MovieId},
};

/// Anything that can produce recommendations for a movie.  Implementations
/// are called from worker threads and may block.
pub trait RecommendationSource: Send + Sync {
    /// Returns at most `count` movies similar to `id`.  Calling this twice
    /// with the same arguments must give the same answer.
    fn recommendations(&self, id: MovieId, count: usize) -> Result<Vec<Movie>, Error>;
}

impl<T: RecommendationSource + ?Sized> RecommendationSource for Arc<T> {
    fn recommendations(&self, id: MovieId, count: usize) -> Result<Vec<Movie>, Error> {
        (**self).recommendations(id, count)
    }
}
