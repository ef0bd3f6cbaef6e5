use std::{env, str::FromStr, time::Duration};

use anyhow::{Context, anyhow};
use marquee_core::database::{DatabaseSettings, validate_database_url};

/// Server configuration, read from the environment once at startup and
/// shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server: ServerConfig,
    /// Deployment label reported by the health check (`development`,
    /// `staging`, `production`).
    pub environment: String,
    pub database: DatabaseSettings,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 4000,
            },
            environment: "development".to_string(),
            database: DatabaseSettings::default(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Read the process environment. Call `dotenvy::dotenv()` first if a
    /// `.env` file should be honoured.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys take their defaults.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let db_defaults = &defaults.database;

        let database = DatabaseSettings {
            url: lookup("DATABASE_URL").unwrap_or_default(),
            max_connections: parse_var(
                &lookup,
                "DB_MAX_CONNECTIONS",
                db_defaults.max_connections,
            )?,
            min_connections: parse_var(
                &lookup,
                "DB_MIN_CONNECTIONS",
                db_defaults.min_connections,
            )?,
            acquire_timeout: duration_var(
                &lookup,
                "DB_ACQUIRE_TIMEOUT",
                db_defaults.acquire_timeout,
            )?,
            max_idle_time: duration_var(
                &lookup,
                "DB_MAX_IDLE_TIME",
                db_defaults.max_idle_time,
            )?,
            query_timeout: duration_var(
                &lookup,
                "DB_QUERY_TIMEOUT",
                db_defaults.query_timeout,
            )?,
        };

        if database.min_connections > database.max_connections {
            return Err(anyhow!(
                "DB_MIN_CONNECTIONS ({}) exceeds DB_MAX_CONNECTIONS ({})",
                database.min_connections,
                database.max_connections
            ));
        }
        if database.query_timeout.is_zero() {
            return Err(anyhow!("DB_QUERY_TIMEOUT must be greater than zero"));
        }

        Ok(Self {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var(&lookup, "SERVER_PORT", defaults.server.port)?,
            },
            environment: lookup("MARQUEE_ENV").unwrap_or(defaults.environment),
            database,
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
        })
    }

    /// Fail early when the database URL can not work.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.url.is_empty() {
            return Err(anyhow!(
                "DATABASE_URL is not set; pass --database-url or export it"
            ));
        }
        validate_database_url(&self.database.url)
            .context("DATABASE_URL is not usable")?;
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: `{raw}`")),
        None => Ok(default),
    }
}

fn duration_var(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> anyhow::Result<Duration> {
    match lookup(key) {
        Some(raw) => humantime::parse_duration(raw.trim())
            .with_context(|| format!("invalid duration for {key}: `{raw}`")),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
