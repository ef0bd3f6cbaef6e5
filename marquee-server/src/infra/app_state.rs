use std::{fmt, sync::Arc};

use marquee_core::database::{
    PostgresStore,
    ports::{DirectorRepository, MovieRepository, UserRepository},
};

use crate::infra::config::Config;

/// Shared handler state. Cloned per request; everything inside is behind an
/// `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub movies: Arc<dyn MovieRepository>,
    pub directors: Arc<dyn DirectorRepository>,
    pub users: Arc<dyn UserRepository>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        movies: Arc<dyn MovieRepository>,
        directors: Arc<dyn DirectorRepository>,
        users: Arc<dyn UserRepository>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            movies,
            directors,
            users,
            config,
        }
    }

    /// Wire every port to its Postgres adapter.
    pub fn from_store(store: &PostgresStore, config: Arc<Config>) -> Self {
        Self::new(store.movies(), store.directors(), store.users(), config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
