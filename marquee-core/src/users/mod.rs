//! Account support that does not touch storage.

pub mod password;

pub use password::{PasswordError, hash_password, verify_password};
