//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (interceptor, rate limit, timeout, body limit,
//!   response compression)
//! - Bind the server to a listener and serve until shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::compression::predicate::SizeAbove;
use tower_http::compression::CompressionLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::config::ServerConfig;
use crate::http::handlers;
use crate::http::middleware::interceptor::{log_requests, InterceptorSettings};
use crate::http::middleware::rate_limit::{rate_limit_middleware, RateLimiterState};

/// Responses below this size are sent uncompressed.
const COMPRESSION_MIN_BYTES: u16 = 1000;

/// HTTP server for the storefront.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        let limiter = Arc::new(RateLimiterState::new(&config.rate_limit));
        let router = Self::build_router(&config, limiter);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The interceptor is the outermost layer so every response, including
    /// timeouts and body-limit rejections, gets an exit log record.
    fn build_router(config: &ServerConfig, limiter: Arc<RateLimiterState>) -> Router {
        let cart = Router::new()
            .route("/cart/{id}", post(handlers::add_to_cart))
            .route_layer(middleware::from_fn_with_state(
                limiter,
                rate_limit_middleware,
            ));

        let interceptor = InterceptorSettings {
            max_captured_body_bytes: config.listener.max_body_bytes,
        };

        Router::new()
            .route("/", get(handlers::home))
            .route("/product/{id}", get(handlers::product_detail))
            .merge(cart)
            .fallback(handlers::not_found)
            .layer(
                CompressionLayer::new().compress_when(SizeAbove::new(COMPRESSION_MIN_BYTES)),
            )
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(middleware::from_fn_with_state(interceptor, log_requests))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
