//! API route configuration.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // App configuration
        .route("/api/v1/apps/:package/config", get(handlers::get_app_config))

        // Cache administration
        .route("/api/v1/cache/stats", get(handlers::get_cache_stats))
        .route("/api/v1/cache/refresh", post(handlers::refresh_cache))

        .with_state(state)
}
