use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marquee_model::{NewUser, RecordVersion, User, UserID};
use sqlx::PgPool;
use tracing::{info, instrument};

use super::versioned::missed_update;
use crate::{
    database::{deadline::QueryDeadline, ports::UserRepository},
    error::{Entity, Result, StoreError},
};

// `email` is citext; it is read back as text so the column decodes as a
// plain string.
const USER_COLUMNS: &str =
    "id, created_at, name, email::text AS email, password_hash, activated, version";

#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
    deadline: QueryDeadline,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool, deadline: QueryDeadline) -> Self {
        Self { pool, deadline }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserID,
    created_at: DateTime<Utc>,
    name: String,
    email: String,
    password_hash: String,
    activated: bool,
    version: RecordVersion,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            created_at: row.created_at,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            activated: row.activated,
            version: row.version,
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn insert(&self, user: NewUser) -> Result<User> {
        let sql = format!(
            "INSERT INTO users (name, email, password_hash, activated) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );

        let stored = self
            .deadline
            .run("users.insert", async {
                sqlx::query_as::<_, UserRow>(&sql)
                    .bind(&user.name)
                    .bind(&user.email)
                    .bind(&user.password_hash)
                    .bind(user.activated)
                    .fetch_one(self.pool())
                    .await
                    .map(User::from)
                    .map_err(StoreError::storage("failed to insert user"))
            })
            .await?;

        info!(id = %stored.id, "user registered");
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: UserID) -> Result<User> {
        if !id.is_valid() {
            return Err(StoreError::not_found(Entity::User, id));
        }

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        self.deadline
            .run("users.get", async {
                sqlx::query_as::<_, UserRow>(&sql)
                    .bind(id)
                    .fetch_optional(self.pool())
                    .await
                    .map_err(StoreError::storage("failed to load user"))?
                    .map(User::from)
                    .ok_or_else(|| StoreError::not_found(Entity::User, id))
            })
            .await
    }

    #[instrument(skip(self))]
    async fn get_by_email(&self, email: &str) -> Result<User> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1::citext"
        );
        self.deadline
            .run("users.get_by_email", async {
                sqlx::query_as::<_, UserRow>(&sql)
                    .bind(email)
                    .fetch_optional(self.pool())
                    .await
                    .map_err(StoreError::storage("failed to load user"))?
                    .map(User::from)
                    .ok_or_else(|| StoreError::not_found(Entity::User, email))
            })
            .await
    }

    #[instrument(skip(self, user), fields(id = %user.id, version = %user.version))]
    async fn update(&self, user: &User) -> Result<User> {
        if !user.id.is_valid() {
            return Err(StoreError::not_found(Entity::User, user.id));
        }

        self.deadline
            .run("users.update", async {
                let new_version = sqlx::query_scalar::<_, RecordVersion>(
                    r#"
                    UPDATE users
                    SET name = $1, email = $2, password_hash = $3, activated = $4,
                        version = version + 1
                    WHERE id = $5 AND version = $6
                    RETURNING version
                    "#,
                )
                .bind(&user.name)
                .bind(&user.email)
                .bind(&user.password_hash)
                .bind(user.activated)
                .bind(user.id)
                .bind(user.version)
                .fetch_optional(self.pool())
                .await
                .map_err(StoreError::storage("failed to update user"))?;

                match new_version {
                    Some(version) => Ok(User {
                        version,
                        ..user.clone()
                    }),
                    None => Err(missed_update(
                        self.pool(),
                        Entity::User,
                        user.id.get(),
                        user.version,
                    )
                    .await),
                }
            })
            .await
    }
}
