//! Tally Server
//!
//! Accepts keyed updates over HTTP, queues them, and folds them into
//! per-key running aggregates with a fixed pool of workers.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::ConfigLoader;
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tally_core::processors::WorkerPool;
use tally_core::{AccumulatorStore, request_queue};
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Tally - keyed running-aggregate ingestion service
#[derive(Parser, Debug)]
#[command(name = "tally-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (defaults are used when omitted)
    #[arg(short, long, env = "TALLY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting tally-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    match config_loader.config_path() {
        Some(path) => tracing::info!("Configuration loaded from {:?}", path),
        None => tracing::info!("No configuration file given, using defaults"),
    }

    let listen_addr = loaded_config.server.listen;
    let pipeline = loaded_config.pipeline.clone();
    let shared_config = loaded_config.into_shared();

    // Build the ingestion pipeline
    let (sender, receiver) = request_queue(pipeline.queue_capacity, pipeline.overflow);
    let store = AccumulatorStore::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let pool = WorkerPool::start(
        pipeline.workers,
        receiver,
        store.clone(),
        shared_config.report.clone(),
        shutdown_rx,
    );
    tracing::info!(
        queue_capacity = pipeline.queue_capacity,
        workers = pipeline.workers,
        overflow = ?pipeline.overflow,
        "Ingestion pipeline ready"
    );

    // Create application state
    let state = AppState::new(sender, store, shared_config);

    // Spawn config reload handler (listens for SIGHUP)
    let reload_notify = spawn_config_reload_handler(state.clone(), config_loader);

    // Build the router
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Stop background tasks
    reload_notify.notify_one();
    let _ = shutdown_tx.send(true);
    pool.join().await;
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
