//! csvscope - CSV upload and quick-look analysis server
//!
//! Serves the upload, analyse and about pages plus `/health`. Uploaded files
//! live in one flat folder resolved from CLI, environment, TOML config or
//! the `./uploads` default.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use csvscope_common::config::{
    load_config_or_default, LoggingConfig, ServerConfig, UploadFolderInitializer,
    UploadFolderResolver,
};
use csvscope_web::store::FileStore;
use csvscope_web::AppState;

/// Command-line arguments for csvscope
#[derive(Parser, Debug)]
#[command(name = "csvscope")]
#[command(about = "Upload CSV files and get a preview, summary statistics and a chart")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "CSVSCOPE_PORT")]
    port: Option<u16>,

    /// Interface to bind to
    #[arg(short, long, env = "CSVSCOPE_BIND")]
    bind: Option<String>,

    /// Folder holding uploaded files (also CSVSCOPE_UPLOAD_FOLDER)
    #[arg(short, long)]
    upload_folder: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Install the global subscriber; RUST_LOG wins over the configured level
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("csvscope={0},tower_http={0}", logging.level)))
        .context("Invalid log level")?;

    match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before logging is configured; report its problems on stderr
    let toml_config = tracing::subscriber::with_default(
        tracing_subscriber::fmt().with_writer(std::io::stderr).finish(),
        || load_config_or_default(args.config.as_deref()),
    );

    init_tracing(&toml_config.logging)?;

    info!("Starting csvscope v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Build: {} ({}, {})",
        env!("GIT_HASH"),
        env!("BUILD_PROFILE"),
        env!("BUILD_TIMESTAMP")
    );

    let upload_folder = UploadFolderResolver::new(args.upload_folder)
        .with_toml_config(&toml_config)
        .resolve();
    let initializer = UploadFolderInitializer::new(upload_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize upload folder")?;
    info!("Upload folder: {}", initializer.folder().display());

    let server = ServerConfig::resolve(args.bind, args.port, &toml_config);
    let addr = server.socket_addr().context("Invalid server address")?;

    let store = FileStore::new(initializer.folder());
    let app = csvscope_web::build_router_with_limit(AppState::new(store), server.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
