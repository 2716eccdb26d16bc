use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use realty::config::Config;
use realty::AppState;

#[derive(Parser, Debug)]
#[command(name = "realty")]
#[command(author, version, about = "Server-rendered property listing site", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "realty.toml")]
    config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override the listen port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(&cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // Initialize logging
    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Realty v{}", env!("CARGO_PKG_VERSION"));

    // Database handle; an unreachable database is logged, not fatal
    let db = realty::db::connect(&config.database)?;
    prepare_database(&config, &db).await;

    let state = Arc::new(AppState::new(config.clone(), db.clone()));
    let app = realty::web::create_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server is running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn prepare_database(config: &Config, db: &realty::DbPool) {
    match realty::db::check_connection(db).await {
        Ok(()) => tracing::info!("Database connected successfully"),
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Unable to connect to the database");
            return;
        }
    }

    if let Err(e) = realty::db::run_migrations(db).await {
        tracing::error!(error = %e, "Database migrations failed");
        return;
    }

    if config.database.seed_sample_data {
        if let Err(e) = realty::db::seed_sample_properties(db).await {
            tracing::error!(error = %e, "Seeding sample properties failed");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
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

    tracing::info!("Shutdown signal received");
}
