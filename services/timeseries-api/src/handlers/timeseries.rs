//! Point time series handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::Response,
    Json,
};
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

use grid_series::PointSeriesQuery;
use timeseries_protocol::{
    ExceptionResponse, ProtocolError, TimeseriesBody, TimeseriesParams, TimeseriesRequest,
};

use super::{error_response, json_response};
use crate::state::AppState;

/// GET {base}/timeseries/:dataset/:variable
#[instrument(skip(state, params))]
pub async fn timeseries_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((dataset, variable)): Path<(String, String)>,
    params: Result<Query<TimeseriesParams>, QueryRejection>,
) -> Response {
    let started = Instant::now();

    let request = params
        .map_err(|e| ProtocolError::InvalidParameter(e.body_text()))
        .and_then(|Query(params)| params.into_request(&dataset, &variable));

    match request {
        Ok(request) => run_query(&state, request, started).await,
        Err(e) => protocol_error(e, started),
    }
}

/// POST {base}/timeseries
#[instrument(skip(state, body))]
pub async fn timeseries_post_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<TimeseriesBody>, JsonRejection>,
) -> Response {
    let started = Instant::now();

    let request = body
        .map_err(|e| ProtocolError::InvalidParameter(e.body_text()))
        .and_then(|Json(body)| body.into_request());

    match request {
        Ok(request) => run_query(&state, request, started).await,
        Err(e) => protocol_error(e, started),
    }
}

async fn run_query(state: &AppState, request: TimeseriesRequest, started: Instant) -> Response {
    let query = PointSeriesQuery {
        dataset: request.dataset_id,
        variable: request.variable_name,
        longitude: request.longitude,
        latitude: request.latitude,
        start: request.start,
        end: request.end,
        want_array: request.array,
        want_csv: request.csv,
    };

    match state.service.query(&query).await {
        Ok(payload) => {
            record(StatusCode::OK, started);
            json_response(StatusCode::OK, &payload)
        }
        Err(e) => {
            if e.is_client_error() {
                tracing::debug!(
                    dataset = %query.dataset,
                    variable = %query.variable,
                    error = %e,
                    "Rejected time series request"
                );
            } else {
                tracing::error!(
                    dataset = %query.dataset,
                    variable = %query.variable,
                    error = %e,
                    "Time series request failed"
                );
            }
            let exc = ExceptionResponse::for_status(e.status_code(), e.to_string());
            respond_error(exc, started)
        }
    }
}

fn protocol_error(e: ProtocolError, started: Instant) -> Response {
    tracing::debug!(error = %e, "Invalid time series request");
    respond_error(e.to_exception(), started)
}

fn respond_error(exc: ExceptionResponse, started: Instant) -> Response {
    let response = error_response(exc);
    record(response.status(), started);
    response
}

fn record(status: StatusCode, started: Instant) {
    counter!("timeseries_requests_total", "status" => status.as_u16().to_string()).increment(1);
    histogram!("timeseries_request_duration_seconds").record(started.elapsed().as_secs_f64());
}
