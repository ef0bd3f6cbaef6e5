//! Storage: pool setup, repository ports and their Postgres adapters.

pub mod deadline;
pub mod pool;
pub mod ports;
pub mod repositories;

use std::sync::Arc;

use sqlx::PgPool;

pub use deadline::QueryDeadline;
pub use pool::{DatabaseSettings, connect, migrate, validate_database_url};
pub use repositories::{
    PostgresDirectorRepository, PostgresMovieRepository, PostgresUserRepository,
};

use crate::error::Result;

/// One pool, one deadline, one repository per record kind.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    movies: Arc<PostgresMovieRepository>,
    directors: Arc<PostgresDirectorRepository>,
    users: Arc<PostgresUserRepository>,
}

impl PostgresStore {
    pub fn new(pool: PgPool, deadline: QueryDeadline) -> Self {
        Self {
            movies: Arc::new(PostgresMovieRepository::new(pool.clone(), deadline)),
            directors: Arc::new(PostgresDirectorRepository::new(
                pool.clone(),
                deadline,
            )),
            users: Arc::new(PostgresUserRepository::new(pool.clone(), deadline)),
            pool,
        }
    }

    /// Connect with `settings` and wrap the resulting pool.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let pool = connect(settings).await?;
        Ok(Self::new(pool, settings.deadline()))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn movies(&self) -> Arc<PostgresMovieRepository> {
        Arc::clone(&self.movies)
    }

    pub fn directors(&self) -> Arc<PostgresDirectorRepository> {
        Arc::clone(&self.directors)
    }

    pub fn users(&self) -> Arc<PostgresUserRepository> {
        Arc::clone(&self.users)
    }

    pub async fn migrate(&self) -> Result<()> {
        migrate(&self.pool).await
    }
}
