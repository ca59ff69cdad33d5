use prometheus::{CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use thiserror::Error;
use tracing::info;

use crate::models::CartOperation;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to register metric: {0}")]
    Registration(#[from] prometheus::Error),
    #[error("Failed to encode metrics: {0}")]
    Encoding(String),
}

/// Prometheus metrics for the cart service
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,

    // HTTP metrics
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub http_requests_in_flight: GaugeVec,

    // Business logic metrics
    pub cart_operations_total: CounterVec,
}

impl Metrics {
    /// Content type of the text exposition format produced by `encode`
    pub const CONTENT_TYPE: &'static str = "text/plain; version=0.0.4; charset=utf-8";

    /// Create a new metrics instance with all required metrics registered
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        info!("Initializing Prometheus metrics");

        let http_requests_total = CounterVec::new(
            Opts::new(
                "http_requests_total",
                "Total number of HTTP requests processed",
            ),
            &["method", "endpoint", "status_code"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "endpoint"],
        )?;

        let http_requests_in_flight = GaugeVec::new(
            Opts::new(
                "http_requests_in_flight",
                "Number of HTTP requests currently being processed",
            ),
            &["method", "endpoint"],
        )?;

        let cart_operations_total = CounterVec::new(
            Opts::new("cart_operations_total", "Total number of cart operations"),
            &["operation", "status"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(cart_operations_total.clone()))?;

        Ok(Metrics {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            cart_operations_total,
        })
    }

    /// Encode all metrics in Prometheus text format
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| MetricsError::Encoding(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| MetricsError::Encoding(e.to_string()))
    }

    pub fn record_http_request(
        &self,
        method: &str,
        endpoint: &str,
        status_code: u16,
        duration_seconds: f64,
    ) {
        self.http_requests_total
            .with_label_values(&[method, endpoint, &status_code.to_string()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, endpoint])
            .observe(duration_seconds);
    }

    pub fn increment_in_flight(&self, method: &str, endpoint: &str) {
        self.http_requests_in_flight
            .with_label_values(&[method, endpoint])
            .inc();
    }

    pub fn decrement_in_flight(&self, method: &str, endpoint: &str) {
        self.http_requests_in_flight
            .with_label_values(&[method, endpoint])
            .dec();
    }

    /// Count one cart operation by outcome
    pub fn record_cart_operation(&self, operation: CartOperation, success: bool) {
        let status = if success { "success" } else { "failure" };
        self.cart_operations_total
            .with_label_values(&[operation.as_str(), status])
            .inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert!(metrics.is_ok());
    }

    #[test]
    fn test_record_cart_operation() {
        let metrics = Metrics::new().unwrap();

        metrics.record_cart_operation(CartOperation::AddProduct, true);
        metrics.record_cart_operation(CartOperation::AddProduct, false);
        metrics.record_cart_operation(CartOperation::AddProduct, false);

        let failures = metrics
            .cart_operations_total
            .with_label_values(&["add_product", "failure"])
            .get();
        assert_eq!(failures, 2.0);
    }

    #[test]
    fn test_encode_contains_http_metrics() {
        let metrics = Metrics::new().unwrap();
        metrics.record_http_request("GET", "/api/cart", 200, 0.012);

        let encoded = metrics.encode().unwrap();
        assert!(encoded.contains("http_requests_total"));
        assert!(encoded.contains("/api/cart"));
    }

    #[test]
    fn test_in_flight_gauge() {
        let metrics = Metrics::new().unwrap();

        metrics.increment_in_flight("PUT", "/api/cart/items/:product_id");
        metrics.increment_in_flight("PUT", "/api/cart/items/:product_id");
        metrics.decrement_in_flight("PUT", "/api/cart/items/:product_id");

        let value = metrics
            .http_requests_in_flight
            .with_label_values(&["PUT", "/api/cart/items/:product_id"])
            .get();
        assert_eq!(value, 1.0);
    }
}
