//! Graph Store Protocol gateway.
//!
//! An HTTP gateway exposing the SPARQL 1.1 Graph Store Protocol for named
//! graphs, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                 GSP GATEWAY                   │
//!                       │                                               │
//!   GSP Request         │  ┌─────────┐    ┌───────────┐                │
//!   ────────────────────┼─▶│  http   │───▶│ registry  │ prefix match?  │
//!                       │  │ server  │    │ resolver  │                │
//!                       │  └─────────┘    └─────┬─────┘                │
//!                       │                       │                      │
//!                       │          match        │        no match      │
//!                       │            ▼          │           ▼          │
//!                       │  ┌──────────────┐     │   ┌──────────────┐   │
//!   Relayed Response    │  │ remote graph │     │   │ local engine │   │
//!   ◀───────────────────┼──│    client    │     │   │ / update svc │◀──┼── SPARQL store
//!                       │  └──────┬───────┘     │   └──────────────┘   │
//!                       │         │             │                      │
//!                       │         ▼             │                      │
//!                       │   proxied origin      │                      │
//!                       │                                               │
//!                       │  ┌────────────────────────────────────────┐  │
//!                       │  │  config │ context model │ observability │  │
//!                       │  └────────────────────────────────────────┘  │
//!                       └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gsp_gateway::config::{load_config, ContextWatcher, GatewayConfig};
use gsp_gateway::http::HttpServer;
use gsp_gateway::registry::ContextModel;

#[derive(Parser, Debug)]
#[command(name = "gsp-gateway", about = "Graph Store Protocol gateway")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gsp_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("gsp-gateway v0.1.0 starting");

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        graph_store_endpoint = %config.store.graph_store_endpoint,
        update_endpoint = %config.store.update_endpoint,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let context = match &config.context.model_path {
        Some(path) => {
            let model = ContextModel::from_turtle_file(path)?;
            tracing::info!(path = ?path, "Context model loaded");
            Arc::new(model)
        }
        None => {
            tracing::info!("No context model configured; all graphs served locally");
            Arc::new(ContextModel::empty())
        }
    };

    // Keep the watcher alive for the lifetime of the process.
    let _watcher = match (&config.context.model_path, config.context.watch) {
        (Some(path), true) => Some(ContextWatcher::new(path, context.clone()).run()?),
        _ => None,
    };

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            gsp_gateway::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(&config, context)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
