use std::future::IntoFuture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use nodal_core::seed_posts;
use nodal_server::api::AppState;
use nodal_server::config::NodalConfig;
use nodal_server::cors::OriginPolicy;
use nodal_server::lifecycle::{cancel_on_signal, install_panic_hook};
use nodal_server::media_factory::create_image_store;
use nodal_server::store_factory::create_store;

/// Nodal blog HTTP server.
#[derive(Parser, Debug)]
#[command(name = "nodal-server", about = "HTTP server for the Nodal blog backend")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "nodal.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the database schema for the configured backend, then exit.
    Migrate,
}

#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Must run before the environment is read.
    let dotenv = dotenvy::dotenv();

    let config_path = Path::new(&cli.config);
    let mut config = NodalConfig::load(config_path)?;
    config.apply_process_env()?;

    if let Some(Commands::Migrate) = cli.command {
        nodal_server::telemetry::init_fmt();
        return run_migrate(&config).await;
    }

    let telemetry_guard = nodal_server::telemetry::init(&config.telemetry);

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "failed to read .env file"),
    }
    if !config_path.exists() {
        info!(path = %cli.config, "config file not found, using defaults");
    }

    let store = create_store(&config.database)?;
    let public_dir = PathBuf::from(&config.server.public_dir);
    let images = create_image_store(&config.uploads, &public_dir)?;
    let upload_dir = config.uploads.temp_dir();
    tokio::fs::create_dir_all(&upload_dir).await?;

    info!(
        backend = %config.database.backend,
        upload_strategy = %images.strategy(),
        production = config.server.production,
        passcode_required = config.admin.passcode().is_some(),
        "nodal-server configured"
    );

    let state = AppState::new(Arc::clone(&store), images)
        .with_seed(seed_posts(Local::now().date_naive()))
        .with_passcode(config.admin.passcode())
        .with_upload_dir(upload_dir)
        .with_static_dir(public_dir)
        .with_cors(OriginPolicy::new(&config.cors, config.server.production));
    let app = nodal_server::api::router(state);

    // CLI overrides take precedence over file and environment.
    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                error!(
                    address = %addr,
                    "port is already in use; stop the other process or set PORT"
                );
            }
            return Err(e.into());
        }
    };
    info!(address = %addr, "nodal-server listening");

    let shutdown = CancellationToken::new();
    install_panic_hook(shutdown.clone());
    let signals = cancel_on_signal(shutdown.clone());

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .into_future();
    let mut server = std::pin::pin!(server);

    let served = tokio::select! {
        result = &mut server => Some(result),
        () = shutdown.cancelled() => None,
    };

    let result = if let Some(result) = served {
        result
    } else {
        let timeout_secs = config.server.shutdown_timeout_seconds;
        info!(timeout_secs, "shutting down, waiting for in-flight requests");
        if let Ok(result) = tokio::time::timeout(Duration::from_secs(timeout_secs), &mut server).await {
            result
        } else {
            error!(timeout_secs, "could not close connections in time, forcing shutdown");
            telemetry_guard.shutdown();
            std::process::exit(1);
        }
    };
    signals.abort();
    result?;

    store.close().await;
    telemetry_guard.shutdown();

    info!("nodal-server shut down");
    Ok(())
}

/// Run the `migrate` subcommand: connect, create the schema, and exit.
async fn run_migrate(config: &NodalConfig) -> Result<(), Box<dyn std::error::Error>> {
    match config.database.backend.as_str() {
        #[cfg(feature = "postgres")]
        "postgres" => {
            let pg = nodal_server::store_factory::postgres_config(&config.database)?;
            info!(schema = %pg.schema, table_prefix = %pg.table_prefix, "running migrations...");
            let connections = nodal_store_postgres::ConnectionManager::new(pg);
            connections.connect().await?;
            connections.close().await;
            info!("migrations complete");
        }
        "memory" => info!("memory backend has no schema, nothing to migrate"),
        other => return Err(format!("unknown database backend: {other}").into()),
    }
    Ok(())
}
