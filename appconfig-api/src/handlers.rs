//! API route handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use tracing::{info, warn, Instrument};

use appconfig_core::constants::REQUEST_ID_HEADER;
use appconfig_core::error::AppConfigError;
use appconfig_core::types::{AppConfig, RequestContext};

use crate::dto::*;
use crate::error::ApiError;
use crate::state::{AppState, StoreFailurePolicy};

type Result<T> = std::result::Result<T, ApiError>;

fn request_context(headers: &HeaderMap) -> RequestContext {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(RequestContext::with_request_id)
        .unwrap_or_default()
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/v1/apps/:package/config
///
/// A package with no configuration is rejected with 404.
pub async fn get_app_config(
    State(state): State<Arc<AppState>>,
    Path(package): Path<String>,
    headers: HeaderMap,
) -> Result<Json<AppConfig>> {
    let ctx = request_context(&headers);

    let result = state
        .cache
        .app_pkg_config(&ctx, &package)
        .instrument(ctx.span())
        .await;

    match result {
        Ok(Some(config)) => Ok(Json(config.as_ref().clone())),
        Ok(None) => Err(ApiError::not_configured(&package)),
        Err(err) => serve_after_store_failure(&state, &package, err),
    }
}

/// Applies the store-failure policy to a lookup whose refresh failed.
fn serve_after_store_failure(
    state: &AppState,
    package: &str,
    err: AppConfigError,
) -> Result<Json<AppConfig>> {
    match state.config.failure_policy {
        StoreFailurePolicy::Shutdown => {
            state.request_shutdown(&err.to_string());
            Err(ApiError::from(err))
        }
        StoreFailurePolicy::ServeStale => {
            let snapshot = state.cache.snapshot();
            if snapshot.generation() == 0 {
                return Err(ApiError::from(err));
            }
            warn!(
                error = %err,
                generation = snapshot.generation(),
                "Serving stale app config"
            );
            state
                .cache
                .lookup_reporting_miss(package)
                .map(|config| Json(config.as_ref().clone()))
                .ok_or_else(|| ApiError::not_configured(package))
        }
    }
}

/// GET /api/v1/cache/stats
pub async fn get_cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStatsResponse> {
    Json(state.cache.stats().into())
}

/// POST /api/v1/cache/refresh
pub async fn refresh_cache(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>> {
    let ctx = request_context(&headers);

    state.cache.invalidate();
    let reloaded = match state.cache.refresh(&ctx).instrument(ctx.span()).await {
        Ok(reloaded) => reloaded,
        Err(err) => {
            if state.config.failure_policy == StoreFailurePolicy::Shutdown {
                state.request_shutdown(&err.to_string());
            }
            return Err(err.into());
        }
    };

    info!(reloaded, "Forced config refresh");
    Ok(Json(RefreshResponse {
        reloaded,
        stats: state.cache.stats().into(),
    }))
}
