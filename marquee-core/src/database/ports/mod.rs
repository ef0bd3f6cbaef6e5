//! Repository ports: what the rest of the system may ask of storage.
//!
//! Postgres implementations live in [`crate::database::repositories`].
//! With the `mocks` feature each port also gets a mockall double
//! (`MockMovieRepository`, ...).

pub mod directors;
pub mod movies;
pub mod users;

pub use directors::DirectorRepository;
pub use movies::MovieRepository;
pub use users::{USERS_EMAIL_CONSTRAINT, UserRepository};

#[cfg(any(test, feature = "mocks"))]
pub use directors::MockDirectorRepository;
#[cfg(any(test, feature = "mocks"))]
pub use movies::MockMovieRepository;
#[cfg(any(test, feature = "mocks"))]
pub use users::MockUserRepository;
