//! Router construction.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

/// Build the application router with its middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route(
            "/timeseries/:dataset/:variable",
            get(handlers::timeseries::timeseries_handler),
        )
        .route(
            "/timeseries",
            post(handlers::timeseries::timeseries_post_handler),
        )
        .route("/status", get(handlers::status::status_handler));

    let router = if state.base_path.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(&state.base_path, api)
    };

    router
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
