//! # Marquee Server
//!
//! Process entry point: configuration, logging, database pool and the HTTP
//! listener. `marquee-server db migrate` applies the schema and exits.

use std::sync::Arc;

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use marquee_core::database::{PostgresStore, connect, migrate};
use marquee_server::{AppState, create_app, infra::config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "marquee-server")]
#[command(about = "Movie catalog API with filtered listings and versioned edits")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// PostgreSQL connection URL (overrides config)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// Deployment label reported by the health check
    #[arg(long = "env", env = "MARQUEE_ENV")]
    environment: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before clap so `env = ...` fallbacks see .env values too.
    let env_file = dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_tracing();
    if let Some(path) = env_file {
        info!(path = %path.display(), "loaded .env file");
    }

    let config = load_config(&cli.serve)?;

    match cli.command {
        Some(Command::Db(DbCommand::Migrate)) => run_db_migrate(&config).await,
        None => run_server(config).await,
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                |_| "marquee_server=debug,marquee_core=debug,tower_http=debug".into(),
            ),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let mut config = Config::from_env().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }
    if let Some(url) = args.database_url.clone() {
        config.database.url = url;
    }
    if let Some(environment) = args.environment.clone() {
        config.environment = environment;
    }

    config.validate()?;
    info!(
        environment = %config.environment,
        database = ?config.database,
        "configuration loaded"
    );
    Ok(config)
}

async fn run_db_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = connect(&config.database)
        .await
        .context("failed to connect to PostgreSQL for migration")?;
    migrate(&pool).await.context("database migration failed")?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let store = PostgresStore::connect(&config.database)
        .await
        .context("failed to connect to PostgreSQL")?;

    let config = Arc::new(config);
    let state = AppState::from_store(&store, Arc::clone(&config));
    let app = create_app(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        "Starting Marquee server ({}) on {}",
        config.environment, addr
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.pool().close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(
            tokio::signal::unix::SignalKind::terminate(),
        ) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}
