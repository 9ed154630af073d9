//! call-server
//!
//! Forwards GET/POST/PUT/DELETE on `/api/call-server` to a fixed upstream
//! service and wraps the result in a JSON envelope.
//!
//! ```text
//!     Client ──▶ /api/call-server ──▶ handler ──▶ {base}/data ──▶ Upstream
//!     Client ◀── {message, data} | {error} ◀────────────────────┘
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use call_server::config::{apply_overrides, load_config, loader, ProxyConfig};
use call_server::http::HttpServer;
use call_server::lifecycle::{signals, Shutdown};
use call_server::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "call-server")]
#[command(about = "Forwarding proxy for the upstream data service", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listener bind address, e.g. 0.0.0.0:3000.
    #[arg(short, long, env = loader::ENV_BIND)]
    bind: Option<String>,

    /// Upstream base address, e.g. http://server_c:3000/api.
    #[arg(short, long, env = loader::ENV_UPSTREAM)]
    upstream: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    let config = apply_overrides(config, cli.bind, cli.upstream)?;

    logging::init(&config.observability);
    tracing::info!("call-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        upstream_timeout_secs = ?config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        if let Err(e) = metrics::init_metrics(addr) {
            tracing::error!(error = %e, "Failed to start metrics endpoint");
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.signal();
    tokio::spawn(async move {
        signals::wait_for_shutdown().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
