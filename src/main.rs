//! HAProxy Runtime API bridge.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                   RUNTIME API                     │
//!                        │                                                   │
//!   POST /execute        │  ┌────────┐   ┌──────┐   ┌──────────────┐        │      admin.sock
//!  ──────────────────────┼─▶│  http  │──▶│ auth │──▶│    relay     │────────┼──▶  (unix / tcp)
//!                        │  │ server │   │ gate │   │ one conn/cmd │        │
//!   POST /reload         │  └────────┘   └──┬───┘   └──────────────┘        │
//!  ──────────────────────┼──────▶          │       ┌──────────────┐        │      reload.flag
//!                        │                 └──────▶│    reload    │────────┼──▶  "reload\n"
//!   GET /health          │                         └──────────────┘        │
//!  ──────────────────────┼──────▶ health probe (existence checks only)     │
//!                        │                                                   │
//!                        │  config · observability · lifecycle              │
//!                        └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use runtime_api::config::load_config;
use runtime_api::lifecycle::{signals, Shutdown};
use runtime_api::observability::{logging, metrics};
use runtime_api::HttpServer;

#[derive(Parser)]
#[command(name = "runtime-api")]
#[command(about = "HTTP bridge to the HAProxy runtime control socket", long_about = None)]
struct Args {
    /// Optional TOML configuration file. Environment variables override it.
    #[arg(short, long, env = "RUNTIME_API_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = Arc::new(load_config(args.config.as_deref())?);
    logging::init(&config.observability.log_level);

    tracing::info!("runtime-api v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        endpoint = %config.control.endpoint,
        read_timeout_ms = config.control.read_timeout_ms,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );
    if config.auth.secret().is_none() {
        tracing::warn!("No API token configured, accepting unauthenticated requests");
    }

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::forward_termination(shutdown.clone()));

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
