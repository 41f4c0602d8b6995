//! HTTP request handlers.

pub mod health;
pub mod status;
pub mod timeseries;

use axum::{
    http::{header, StatusCode},
    response::Response,
};
use timeseries_protocol::ExceptionResponse;

/// Build a JSON response with the given status.
pub(crate) fn json_response<T: serde::Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_string(body) {
        Ok(json) => Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(json.into())
            .unwrap_or_default(),
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            let mut response = Response::new(String::new().into());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}

/// Build an exception response.
pub(crate) fn error_response(exc: ExceptionResponse) -> Response {
    let status = exc
        .status
        .and_then(|s| StatusCode::from_u16(s).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json_response(status, &exc)
}
