//! Record models shared across Marquee crates.
//!
//! Everything here is plain data: identifiers, the optimistic-concurrency
//! version stamp, and the movie/director/user records together with the
//! drafts used to create them and the patches used to edit them.
#![allow(missing_docs)]

pub mod director;
pub mod ids;
pub mod movie;
pub mod user;
pub mod version;

pub use director::{Director, DirectorPatch, NewDirector};
pub use ids::{DirectorID, MovieID, UserID};
pub use movie::{Movie, MoviePatch, NewMovie};
pub use user::{NewUser, User};
pub use version::RecordVersion;
