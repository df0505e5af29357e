//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /c`        - Tracking redirect (public, always 302)
//! - `GET  /health`   - Health check: placement store, click registry (public)
//! - `/api/*`         - Management API (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging without query strings
//! - **Rate limiting** - Per-IP token bucket on `/api/*` only
//! - **Authentication** - Bearer token on `/api/*`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{click_handler, health_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// Rate limiting keys on the proxy headers when `state.behind_proxy` is set;
/// enable it only when the service runs behind a trusted reverse proxy.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::secure_layer(state.behind_proxy));

    let router = Router::new()
        .route("/c", get(click_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
