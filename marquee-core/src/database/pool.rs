use std::{fmt, str::FromStr, time::Duration};

use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::info;
use url::Url;

use super::deadline::QueryDeadline;
use crate::error::{Result, StoreError};

/// Connection pool and statement limits, built once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub max_idle_time: Duration,
    /// Applied both client side (see [`QueryDeadline`]) and as the
    /// session `statement_timeout`.
    pub query_timeout: Duration,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 25,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(5),
            max_idle_time: Duration::from_secs(15 * 60),
            query_timeout: QueryDeadline::DEFAULT,
        }
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &redact_url(&self.url))
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("max_idle_time", &self.max_idle_time)
            .field("query_timeout", &self.query_timeout)
            .finish()
    }
}

impl DatabaseSettings {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn deadline(&self) -> QueryDeadline {
        QueryDeadline::new(self.query_timeout)
    }
}

fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("***"));
            }
            url.to_string()
        }
        Err(_) => "<unparseable>".to_string(),
    }
}

/// Reject URLs that can not name a Postgres database.
pub fn validate_database_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| {
        StoreError::InvalidConfiguration(format!("invalid PostgreSQL URL: {e}"))
    })?;

    match url.scheme() {
        "postgres" | "postgresql" => {}
        other => {
            return Err(StoreError::InvalidConfiguration(format!(
                "unsupported database URL scheme `{other}`"
            )));
        }
    }

    if url.path().trim_start_matches('/').is_empty() {
        return Err(StoreError::InvalidConfiguration(
            "database URL must include database name".to_string(),
        ));
    }

    Ok(url)
}

/// Open a pool according to `settings`.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool> {
    validate_database_url(&settings.url)?;

    let statement_timeout = settings.query_timeout.as_millis().to_string();
    let connect_options = PgConnectOptions::from_str(&settings.url)
        .map_err(StoreError::storage("invalid database connection options"))?
        .options([("statement_timeout", statement_timeout.as_str())]);

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(settings.max_idle_time)
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await
        .map_err(StoreError::storage("database connection failed"))?;

    info!(
        max_connections = settings.max_connections,
        min_connections = settings.min_connections,
        statement_timeout_ms = %statement_timeout,
        "database pool initialized"
    );

    Ok(pool)
}

/// Apply embedded migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    crate::MIGRATOR.run(pool).await?;
    info!("database migrations applied");
    Ok(())
}
