//! Service status handler.

use axum::{extract::Extension, Json};
use std::sync::Arc;
use timeseries_protocol::StatusResponse;

use crate::state::AppState;

/// GET {base}/status - Service name
pub async fn status_handler(Extension(state): Extension<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse::new(state.service_name.clone()))
}
