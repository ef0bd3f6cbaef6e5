use async_trait::async_trait;
use marquee_model::{Director, DirectorID, NewDirector};

use crate::{
    error::Result,
    query::{DirectorSort, ListRequest, Page},
};

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait DirectorRepository: Send + Sync {
    async fn insert(&self, director: NewDirector) -> Result<Director>;

    async fn get(&self, id: DirectorID) -> Result<Director>;

    /// Versioned write; see [`super::MovieRepository::update`].
    async fn update(&self, director: &Director) -> Result<Director>;

    async fn delete(&self, id: DirectorID) -> Result<()>;

    async fn list(
        &self,
        request: &ListRequest<DirectorSort>,
    ) -> Result<Page<Director>>;
}
