use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ids::UserID, version::RecordVersion};

/// Registered account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserID,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string. Never serialized.
    #[serde(skip)]
    pub password_hash: String,
    pub activated: bool,
    pub version: RecordVersion,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("activated", &self.activated)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Account about to be inserted. The password is already hashed.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub activated: bool,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("activated", &self.activated)
            .finish_non_exhaustive()
    }
}
