//! Explorer Gate
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ http (axum) ──▶ gateway ──▶ resilience::failover ──▶ blockchain::client ──▶ Node 1..N
//!                                   │                                         │
//!                                   │                                  blockchain::classify
//!                                   ▼
//!                        confirmation::waiter ◀── confirmation::bus ◀── confirmation::feed ◀── Explorer WS
//!
//!     config (TOML + notify) ──▶ load_balancer::StaticNodeSource (ArcSwap)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use explorer_gate::blockchain::HttpNodeClient;
use explorer_gate::config::watcher::apply_node_updates;
use explorer_gate::config::{load_config, ConfigWatcher, GateConfig};
use explorer_gate::confirmation::{ConfirmationFeed, NotificationBus};
use explorer_gate::gateway::Gateway;
use explorer_gate::http::tls::load_tls_config;
use explorer_gate::http::HttpServer;
use explorer_gate::lifecycle::Shutdown;
use explorer_gate::load_balancer::{NodeSource, StaticNodeSource};
use explorer_gate::observability::{logging, metrics};
use explorer_gate::resilience::OperationMode;

#[derive(Parser)]
#[command(name = "explorer-gate", version)]
#[command(about = "Gateway between explorer clients and blockchain full nodes", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };

    logging::init_tracing(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "explorer-gate starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        mode = ?config.mode(),
        nodes = config.nodes.len(),
        active_nodes = config.active_node_count(),
        confirmation_timeout_secs = config.confirmation.timeout_secs,
        "Configuration loaded"
    );
    if config.mode() == OperationMode::MultiNode && config.active_node_count() == 0 {
        tracing::warn!("Multi-node mode with no active nodes; every request will fail until the registry is updated");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let bus = Arc::new(NotificationBus::new());
    let registry = Arc::new(StaticNodeSource::new(config.nodes.clone()));
    let api = Arc::new(HttpNodeClient::new(config.node.request_timeout())?);
    let nodes: Arc<dyn NodeSource> = registry.clone();
    let gateway = Arc::new(Gateway::from_config(&config, api, Some(nodes), bus.clone())?);

    if gateway.mode() == OperationMode::MultiNode {
        match &config.confirmation.feed_url {
            Some(url) => {
                let feed = ConfirmationFeed::new(url.clone(), bus.clone(), config.confirmation.feed_reconnect());
                tokio::spawn(feed.run(shutdown.subscribe()));
            }
            None => tracing::warn!("No confirmation feed configured; pushes will time out unless hashes are published"),
        }
    }

    // Kept alive for the lifetime of the server.
    let _watcher = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            let watcher = watcher.run()?;
            tokio::spawn(apply_node_updates(updates, registry.clone(), shutdown.subscribe()));
            Some(watcher)
        }
        None => None,
    };

    let server = HttpServer::new(&config, gateway);
    match &config.listener.tls {
        Some(tls) => {
            let rustls = load_tls_config(tls).await?;
            let addr: SocketAddr = config.listener.bind_address.parse()?;
            server.run_tls(addr, rustls, shutdown.signalled()).await?;
        }
        None => {
            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            server.run(listener, shutdown.signalled()).await?;
        }
    }

    shutdown.trigger();
    tracing::info!("Shutdown complete");
    Ok(())
}
