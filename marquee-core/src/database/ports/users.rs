use async_trait::async_trait;
use marquee_model::{NewUser, User, UserID};

use crate::error::Result;

/// Unique constraint guarding `users.email`.
pub const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `UniqueViolation` on [`USERS_EMAIL_CONSTRAINT`] when the
    /// address is taken.
    async fn insert(&self, user: NewUser) -> Result<User>;

    async fn get(&self, id: UserID) -> Result<User>;

    async fn get_by_email(&self, email: &str) -> Result<User>;

    async fn update(&self, user: &User) -> Result<User>;
}
