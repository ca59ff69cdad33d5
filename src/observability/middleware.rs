use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::{sync::Arc, time::Instant};
use tracing::{error, info, Instrument};

use super::Metrics;

/// Middleware for request logging and HTTP metrics
pub async fn observability_middleware(
    metrics: Arc<Metrics>,
    request: Request,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let uri = request.uri().to_string();

    // Group by route template so ids do not explode label cardinality
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched_path| matched_path.as_str().to_string())
        .unwrap_or_else(|| uri.clone());

    let span = tracing::info_span!(
        target: "rocketshoes_cart::http",
        "request",
        http.method = %method,
        http.route = %endpoint,
        http.url = %uri,
        http.status_code = tracing::field::Empty,
    );

    async {
        metrics.increment_in_flight(&method, &endpoint);

        let response = next.run(request).await;

        let duration = start_time.elapsed();
        let status_code = response.status().as_u16();
        tracing::Span::current().record("http.status_code", status_code);

        metrics.record_http_request(&method, &endpoint, status_code, duration.as_secs_f64());
        metrics.decrement_in_flight(&method, &endpoint);

        if status_code >= 500 {
            error!(
                method = %method,
                path = %endpoint,
                status_code = status_code,
                duration_ms = duration.as_millis(),
                "Request completed with error"
            );
        } else {
            info!(
                method = %method,
                path = %endpoint,
                status_code = status_code,
                duration_ms = duration.as_millis(),
                "Request completed"
            );
        }

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_middleware_records_matched_path() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let metrics_for_middleware = metrics.clone();

        let app = Router::new()
            .route("/api/cart/items/:product_id", get(|| async { "ok" }))
            .layer(middleware::from_fn(move |req, next| {
                observability_middleware(metrics_for_middleware.clone(), req, next)
            }));

        let request = Request::builder()
            .uri("/api/cart/items/42")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let count = metrics
            .http_requests_total
            .with_label_values(&["GET", "/api/cart/items/:product_id", "200"])
            .get();
        assert_eq!(count, 1.0);
    }
}
