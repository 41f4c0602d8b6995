//! Time Series API Server
//!
//! Point time series extraction over gridded datasets.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use grid_series::ExtractorConfig;
use timeseries_api::{build_router, AppState};
use timeseries_protocol::DEFAULT_BASE_PATH;

/// Time Series API Server
#[derive(Parser, Debug)]
#[command(name = "timeseries-api")]
#[command(about = "Point time series server for gridded datasets")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8085", env = "TIMESERIES_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "TIMESERIES_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// Directory of dataset definition YAML files
    #[arg(long, default_value = "config/datasets", env = "TIMESERIES_CONFIG_DIR")]
    config_dir: String,

    /// Root directory the dataset array paths are relative to
    #[arg(long, default_value = "data", env = "TIMESERIES_DATA_DIR")]
    data_dir: String,

    /// Prefix of the API routes
    #[arg(long, default_value = DEFAULT_BASE_PATH, env = "TIMESERIES_BASE_PATH")]
    base_path: String,
}

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .expect("Failed to create Tokio runtime");

    runtime.block_on(async move {
        if let Err(e) = run_server(args).await {
            tracing::error!("Server failed: {:#}", e);
            std::process::exit(1);
        }
    });
}

async fn run_server(args: Args) -> anyhow::Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    // Initialize Prometheus metrics exporter
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()?;

    info!("Starting time series API server");

    // Initialize application state
    let extractor = ExtractorConfig::from_env();
    info!(
        max_concurrent_reads = extractor.max_concurrent_reads,
        number_format = ?extractor.number_format,
        "Extractor configured"
    );

    let state = AppState::from_dirs(&args.config_dir, &args.data_dir, extractor)?
        .with_base_path(&args.base_path)
        .with_prometheus(prometheus_handle);

    info!(
        datasets = ?state.service.catalog().dataset_ids(),
        base_path = %state.base_path,
        "Application state ready"
    );

    let app = build_router(Arc::new(state));

    // Parse listen address
    let addr: SocketAddr = args.listen.parse()?;

    info!("Time series API listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
