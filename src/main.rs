//! Storefront web server.
//!
//! A small product-catalog HTTP server built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 STOREFRONT                    │
//!                        │                                               │
//!   Client Request       │  ┌──────────┐   ┌─────────────┐   ┌────────┐ │
//!   ─────────────────────┼─▶│ intercep-│──▶│ rate limit  │──▶│ route  │ │
//!                        │  │ tor      │   │ (cart only) │   │handlers│ │
//!                        │  └────┬─────┘   └─────────────┘   └───┬────┘ │
//!                        │       │                               │      │
//!   Client Response      │       ▼                               ▼      │
//!   ◀────────────────────┼── exit log ◀──────────────────── response    │
//!                        │                                               │
//!                        │  ┌─────────────────────────────────────────┐ │
//!                        │  │          Cross-Cutting Concerns          │ │
//!                        │  │  ┌────────┐ ┌──────────┐ ┌───────────┐  │ │
//!                        │  │  │ config │ │ logging  │ │ resource  │  │ │
//!                        │  │  │        │ │ sinks    │ │ sampler   │  │ │
//!                        │  │  └────────┘ └──────────┘ └───────────┘  │ │
//!                        │  └─────────────────────────────────────────┘ │
//!                        └──────────────────────────────────────────────┘
//! ```
//!
//! Every request passes through the interceptor, which logs entry and exit
//! with timing and guarantees a response even when a handler panics. The
//! resource sampler runs as an independent background task writing to the
//! same log sinks.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use storefront::config::{self, ServerConfig};
use storefront::http::HttpServer;
use storefront::lifecycle::{signals, Shutdown};
use storefront::observability::logging;
use storefront::observability::sampler::{self, ResourceSampler};

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Product catalog web server")]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => ServerConfig::default(),
    };

    // Sink configuration failure is the only fatal logging error; it aborts
    // startup before any traffic is served.
    let _log_guard = logging::init(&config.logging)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "storefront starting");
    sampler::log_system_info();

    tracing::info!(
        bind_address = %config.listener.bind_address,
        sampler_enabled = config.sampler.enabled,
        sampler_interval_secs = config.sampler.interval_secs,
        rate_limit_enabled = config.rate_limit.enabled,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();

    if config.sampler.enabled {
        let sampler = ResourceSampler::new(&config.sampler);
        let rx = shutdown.subscribe();
        tokio::spawn(async move {
            sampler.run(rx).await;
        });
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config);
    let server_shutdown = shutdown.subscribe();
    let server_task = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    signals::wait_for_signal().await;
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
