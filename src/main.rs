//! Driver matcher gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id → trace → timeout
//!                         │
//!                         ▼
//!                  bearer auth (JWT gate) ──✗──▶ 401
//!                         │
//!                         ▼
//!                  matcher: validate ──✗──▶ 400
//!                         │
//!                         ▼
//!                  circuit breaker ──open──▶ 503 / 404
//!                         │
//!                         ▼
//!                  driver client ─────────────▶ Driver Service
//!                         │                    GET /driver/api/v1/search
//!     Client Response     ▼
//!     ◀────────────── DriverRecord | {"error": ...}
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use driver_matcher::config::load_config;
use driver_matcher::http::HttpServer;
use driver_matcher::lifecycle::{wait_for_signal, Shutdown};
use driver_matcher::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "driver-matcher", version, about = "Nearest-driver search gateway")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "MATCHER_CONFIG", default_value = "config/matcher.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    logging::init_logging(&config.observability);
    tracing::info!("driver-matcher v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        path = %args.config.display(),
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        failure_threshold = config.breaker.failure_threshold,
        success_threshold = config.breaker.success_threshold,
        cooldown_secs = config.breaker.cooldown_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let stopped = shutdown.signalled();
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("Shutting down gracefully");
        shutdown.trigger();
    });

    server.run(listener, stopped).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
