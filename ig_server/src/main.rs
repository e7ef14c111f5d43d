//! Wagering and settlement HTTP server.
//!
//! Serves the igaming engine over a JSON API backed by PostgreSQL.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Error, anyhow};
use ig_server::{
    api::{self, AppState},
    config::ServerConfig,
    logging, metrics,
};
use igaming::db::Database;
use pico_args::Arguments;
use tracing::{error, info};

const HELP: &str = "\
Run the igaming wagering and settlement server

USAGE:
  ig_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --db-url     URL         Database connection string  [default: env DATABASE_URL]

FLAGS:
  --skip-migrations        Do not apply pending database migrations on startup
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  DATABASE_URL             PostgreSQL connection string
  LOCK_TIMEOUT_MS          Longest wait for a single row lock
  TRANSACTION_TIMEOUT_MS   Longest run time of one engine transaction
  PAYOUT_SCHEDULE          Prize pool fractions by placement (e.g., 0.5,0.3,0.2)
  BET_AFTER_END_ALLOWED    Accept bets after a tournament's end time
  METRICS_ENABLED          Serve Prometheus metrics on /metrics
  RUST_LOG                 Log filter (e.g., info,sqlx=warn)
  (See .env.example for all configuration options)
";

struct Args {
    bind: Option<SocketAddr>,
    database_url: Option<String>,
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
        skip_migrations: pargs.contains("--skip-migrations"),
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.database_url)?;
    config.validate()?;
    info!(
        bind = %config.bind,
        lock_timeout_ms = config.engine.lock_timeout.as_millis() as u64,
        "Starting wagering server"
    );

    let db = Database::new(&config.database)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {e}"))?;
    info!("Database connected successfully");

    if args.skip_migrations {
        info!("Skipping database migrations");
    } else {
        db.run_migrations()
            .await
            .map_err(|e| anyhow!("Failed to run migrations: {e}"))?;
        info!("Database migrations applied");
    }

    let mut state = AppState::new(Arc::new(db.pool().clone()), &config.engine);
    info!(
        payout_schedule = ?state.settlement.schedule().fractions(),
        "Settlement engine ready"
    );
    if config.metrics_enabled {
        state = state.with_metrics(metrics::install_recorder()?);
        info!("Prometheus metrics enabled on /metrics");
    }

    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow!("Server error: {e}"))?;

    info!("Shutting down server...");
    db.close().await;

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install CTRL+C signal handler: {e}");
        std::future::pending::<()>().await;
    }
}
