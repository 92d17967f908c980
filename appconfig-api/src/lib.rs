//! # AppConfig API Server
//!
//! REST API serving per-application configuration out of a [`ConfigCache`].
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness check
//! - `GET /api/v1/apps/:package/config` - Configuration for one app package
//! - `GET /api/v1/cache/stats` - Cache statistics
//! - `POST /api/v1/cache/refresh` - Reload the cache from the store now
//!
//! ## Example
//!
//! ```rust,ignore
//! use appconfig_api::{ApiServer, ApiConfig};
//!
//! let config = ApiConfig::from_env();
//! let server = ApiServer::new(config);
//! server.run(([0, 0, 0, 0], 3001)).await?;
//! ```
//!
//! [`ConfigCache`]: appconfig_cache::ConfigCache

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod routes;
mod handlers;
mod state;
mod dto;
mod error;

pub use routes::create_router;
pub use state::{AppState, ApiConfig, StoreFailurePolicy};
pub use error::ApiError;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server for AppConfig.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server with the given configuration.
    pub fn new(config: ApiConfig) -> Self {
        Self::with_state(Arc::new(AppState::new(config)))
    }

    /// Creates a server around existing state.
    pub fn with_state(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Creates the router with all routes configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address until Ctrl+C or a store failure
    /// under the `shutdown` policy.
    ///
    /// Returns an error when the server stopped because the config store
    /// could not be read.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!(
            policy = %self.state.config.failure_policy,
            refresh_interval = ?self.state.cache.settings().refresh_interval,
            "AppConfig API server listening on {}",
            addr
        );

        let store_failed = self.state.subscribe_shutdown();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_requested(store_failed) => {}
                    _ = tokio::signal::ctrl_c() => info!("Received Ctrl+C"),
                }
            })
            .await?;

        if self.state.shutdown_requested() {
            return Err(std::io::Error::other("config store unavailable"));
        }
        Ok(())
    }
}

/// Resolves once a shutdown has been requested on `rx`.
async fn shutdown_requested(mut rx: watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Starts the API server with configuration from the environment.
pub async fn start_server(port: u16) -> std::io::Result<()> {
    let config = ApiConfig::from_env();
    let server = ApiServer::new(config);
    server.run(([0, 0, 0, 0], port)).await
}
