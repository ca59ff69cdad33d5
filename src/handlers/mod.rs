pub mod cart;
pub mod health;
pub mod metrics;

pub use cart::*;
pub use health::*;
pub use metrics::*;

use axum::{middleware, routing::get, Router};
use std::{sync::Arc, time::Duration};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::observability::{observability_middleware, Metrics};
use crate::services::CartStore;

/// Build the application router with all endpoints and middleware
pub fn create_app(
    cart_store: Arc<CartStore>,
    metrics: Arc<Metrics>,
    request_timeout: Duration,
) -> Router {
    let metrics_for_middleware = metrics.clone();

    Router::new()
        // Health and metrics endpoints (with metrics state)
        .route("/health/status", get(health_check))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics.clone())
        .merge(create_cart_router(cart_store, metrics))
        // Outermost layer last
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(move |req, next| {
            observability_middleware(metrics_for_middleware.clone(), req, next)
        }))
}
