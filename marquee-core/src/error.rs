use std::{fmt, time::Duration};

use marquee_model::RecordVersion;
use thiserror::Error;

/// Kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Movie,
    Director,
    User,
}

impl Entity {
    /// Backing table. Only ever used as SQL text for these fixed names.
    pub fn table(self) -> &'static str {
        match self {
            Entity::Movie => "movies",
            Entity::Director => "directors",
            Entity::User => "users",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Movie => "movie",
            Entity::Director => "director",
            Entity::User => "user",
        })
    }
}

/// Every way a store operation can fail.
///
/// `NotFound` and `EditConflict` are expected outcomes the caller
/// maps to a response. Everything else is a storage failure: the caller logs
/// it and reports a server error.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} {key} not found")]
    NotFound { entity: Entity, key: String },

    #[error(
        "edit conflict on {entity} {id}: expected version {expected}, stored version is {stored}"
    )]
    EditConflict {
        entity: Entity,
        id: i64,
        expected: RecordVersion,
        stored: RecordVersion,
    },

    #[error("unique constraint `{constraint}` violated")]
    UniqueViolation {
        constraint: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("{context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("invalid database configuration: {0}")]
    InvalidConfiguration(String),

    #[error("database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub fn not_found(entity: Entity, key: impl fmt::Display) -> Self {
        StoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Build a `map_err` adapter that tags a driver error with `context`.
    ///
    /// Unique violations (SQLSTATE 23505) are split out so callers can map
    /// them to a domain conflict such as a duplicate email.
    pub fn storage(
        context: impl Into<String>,
    ) -> impl FnOnce(sqlx::Error) -> StoreError {
        move |source| {
            let unique_constraint = match &source {
                sqlx::Error::Database(db_err)
                    if db_err.code().as_deref() == Some("23505") =>
                {
                    Some(db_err.constraint().unwrap_or_default().to_owned())
                }
                _ => None,
            };

            match unique_constraint {
                Some(constraint) => {
                    StoreError::UniqueViolation { constraint, source }
                }
                None => StoreError::Storage {
                    context: context.into(),
                    source,
                },
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_edit_conflict(&self) -> bool {
        matches!(self, StoreError::EditConflict { .. })
    }

    pub fn is_unique_violation_on(&self, constraint: &str) -> bool {
        matches!(
            self,
            StoreError::UniqueViolation { constraint: c, .. } if c == constraint
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
