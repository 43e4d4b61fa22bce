//! Edge relay server.
//!
//! ```text
//!     Client ──GET /api/rss-proxy?url=..──▶ relay ──guard──▶ bounded fetch ──▶ upstream
//!            ◀──text/plain | {"error"}────        ◀───────── status + body ◀──
//!
//!     Client ──GET /api/stock────────────▶ quote ──bounded fetch──▶ chart API
//!            ◀──quote JSON (or fallback)──
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use edge_relay::config::{load_config, validate_config, RelayConfig};
use edge_relay::lifecycle::{signals, Shutdown};
use edge_relay::observability::{logging, metrics};
use edge_relay::HttpServer;

#[derive(Parser)]
#[command(name = "edge-relay")]
#[command(about = "CORS-friendly feed relay with a stock quote endpoint", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(edge_relay::config::ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability);

    tracing::info!("edge-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        fetch_timeout_ms = config.fetch.timeout_ms,
        guard_mode = ?config.guard.mode,
        config_file = ?cli.config,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
