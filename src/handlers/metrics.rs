use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::error;

use crate::observability::Metrics;

/// Prometheus scrape endpoint
pub async fn metrics_handler(State(metrics): State<Arc<Metrics>>) -> Response {
    metrics
        .encode()
        .map(|body| ([(header::CONTENT_TYPE, Metrics::CONTENT_TYPE)], body).into_response())
        .unwrap_or_else(|e| {
            error!(error = %e, "Metrics scrape failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}
