//! huginnd — top-stories daemon.
//!
//! Serves the cached Hacker News front page over HTTP, sharing one
//! [`NewsCache`](huginn::NewsCache) across all requests.

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use huginn::server::{self, config::Config};

/// huginn daemon — cached Hacker News top stories.
#[derive(Parser)]
#[command(name = "huginnd")]
#[command(version = huginn::PKG_VERSION)]
#[command(about = "Cached Hacker News top stories over HTTP")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Address to bind to, overriding the config file.
    #[arg(short, long, env = "HUGINN_ADDRESS")]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;
    let address = args.address.unwrap_or_else(|| config.server.address.clone());

    let cache = config.cache_builder().build()?;

    // Warm the cache so the first visitor does not wait; failure is not fatal.
    if let Err(e) = cache.fetch().await {
        warn!(error = %e, "initial load failed, will retry on demand");
    }

    let listener = TcpListener::bind(&address).await?;
    info!(version = %huginn::version_string(), %address, "huginnd starting");

    axum::serve(listener, server::router(cache))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("huginnd stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
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
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
