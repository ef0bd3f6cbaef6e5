use async_trait::async_trait;
use marquee_model::{Movie, MovieID, NewMovie};

use crate::{
    error::Result,
    query::{ListRequest, MovieSort, Page},
};

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Store a new movie. Id, creation time and version come back from the
    /// database.
    async fn insert(&self, movie: NewMovie) -> Result<Movie>;

    async fn get(&self, id: MovieID) -> Result<Movie>;

    /// Write `movie` if the stored row still has `movie.version`.
    ///
    /// Returns the movie with its new version. Fails with `NotFound` when the
    /// row is gone and `EditConflict` when another writer got there first.
    async fn update(&self, movie: &Movie) -> Result<Movie>;

    async fn delete(&self, id: MovieID) -> Result<()>;

    async fn list(&self, request: &ListRequest<MovieSort>) -> Result<Page<Movie>>;
}
