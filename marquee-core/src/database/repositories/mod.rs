//! PostgreSQL-backed repository implementations.

pub mod directors;
mod listing;
pub mod movies;
pub mod users;
mod versioned;

pub use directors::PostgresDirectorRepository;
pub use movies::PostgresMovieRepository;
pub use users::PostgresUserRepository;
