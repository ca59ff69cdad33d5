use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::models::{
    AddProductRequest, Cart, CartError, CartOperation, CartResponse, CartResult, CartSummary,
    ProductId, UpdateAmountRequest, UpdateProductAmount,
};
use crate::observability::Metrics;
use crate::services::CartStore;

/// State for cart handlers
#[derive(Clone)]
pub struct CartApiState {
    pub cart_store: Arc<CartStore>,
    pub metrics: Arc<Metrics>,
}

/// Create cart router with all endpoints
pub fn create_cart_router(cart_store: Arc<CartStore>, metrics: Arc<Metrics>) -> Router {
    let state = CartApiState {
        cart_store,
        metrics,
    };

    Router::new()
        .route("/api/cart", get(get_cart))
        .route("/api/cart/summary", get(get_cart_summary))
        .route("/api/cart/items", post(add_product))
        .route(
            "/api/cart/items/:product_id",
            put(update_product_amount).delete(remove_product),
        )
        .with_state(state)
}

/// Get the current cart
#[instrument(skip(state))]
pub async fn get_cart(State(state): State<CartApiState>) -> Json<CartResponse> {
    let cart = state.cart_store.cart().await;
    info!("Returning cart with {} line items", cart.len());
    Json(CartResponse::from(cart))
}

/// Get cart totals
#[instrument(skip(state))]
pub async fn get_cart_summary(State(state): State<CartApiState>) -> Json<CartSummary> {
    Json(state.cart_store.summary().await)
}

/// Add one unit of a product to the cart.
///
/// Answers 201 when a new line item was created and 200 when an existing
/// one was incremented.
#[instrument(skip(state, request), fields(product_id = request.product_id))]
pub async fn add_product(
    State(state): State<CartApiState>,
    Json(request): Json<AddProductRequest>,
) -> Result<(StatusCode, Json<CartResponse>), (StatusCode, Json<Value>)> {
    let product_id = request.product_id;
    let result = state.cart_store.add_product(product_id).await;
    let cart = record(&state, CartOperation::AddProduct, result)?;
    let status = add_product_status(&cart, product_id);

    info!("Successfully added product to cart");
    Ok((status, Json(CartResponse::from(cart))))
}

/// Set the amount of a product already in the cart
#[instrument(skip(state, request))]
pub async fn update_product_amount(
    State(state): State<CartApiState>,
    Path(product_id): Path<ProductId>,
    Json(request): Json<UpdateAmountRequest>,
) -> Result<Json<CartResponse>, (StatusCode, Json<Value>)> {
    info!(
        "Updating amount for product {} to {}",
        product_id, request.amount
    );

    let result = state
        .cart_store
        .update_product_amount(UpdateProductAmount {
            product_id,
            amount: request.amount,
        })
        .await;
    let cart = record(&state, CartOperation::UpdateProductAmount, result)?;

    Ok(Json(CartResponse::from(cart)))
}

/// Remove a product from the cart
#[instrument(skip(state))]
pub async fn remove_product(
    State(state): State<CartApiState>,
    Path(product_id): Path<ProductId>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    let result = state.cart_store.remove_product(product_id).await;
    record(&state, CartOperation::RemoveProduct, result)?;

    info!("Successfully removed product from cart");
    Ok(StatusCode::NO_CONTENT)
}

/// 201 for a freshly appended line item, 200 for an increment
fn add_product_status(cart: &Cart, product_id: ProductId) -> StatusCode {
    // An increment always leaves at least 2 units
    match cart.get_item(product_id) {
        Some(item) if item.amount > 1 => StatusCode::OK,
        _ => StatusCode::CREATED,
    }
}

fn record(
    state: &CartApiState,
    operation: CartOperation,
    result: CartResult<Cart>,
) -> Result<Cart, (StatusCode, Json<Value>)> {
    state
        .metrics
        .record_cart_operation(operation, result.is_ok());

    result.map_err(|err| {
        error!(operation = %operation, "Cart operation failed: {}", err);
        cart_error_to_response(operation, &err)
    })
}

/// Convert CartError to HTTP response
pub fn cart_error_to_response(
    operation: CartOperation,
    err: &CartError,
) -> (StatusCode, Json<Value>) {
    let status = match err {
        CartError::InsufficientStock { .. } => StatusCode::CONFLICT,
        CartError::ProductNotInCart { .. } => StatusCode::NOT_FOUND,
        CartError::StockService { .. } => StatusCode::BAD_GATEWAY,
        CartError::Repository { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(json!({
            "error": operation.failure_message(err),
            "detail": err.to_string(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CartLineItem, Product, RepositoryError, StockServiceError, ADD_PRODUCT_FAILED, AMOUNT_OUT_OF_STOCK,
        REMOVE_PRODUCT_FAILED,
    };

    #[test]
    fn test_insufficient_stock_maps_to_conflict() {
        let err = CartError::InsufficientStock {
            product_id: 1,
            requested: 5,
            available: 4,
        };

        let (status, Json(body)) =
            cart_error_to_response(CartOperation::UpdateProductAmount, &err);

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], AMOUNT_OUT_OF_STOCK);
        assert!(body["detail"].as_str().unwrap().contains("available=4"));
        assert!(body["timestamp"].is_string());
    }

    #[test]
    fn test_add_failures_share_one_message() {
        let err = CartError::InsufficientStock {
            product_id: 1,
            requested: 2,
            available: 1,
        };
        let (status, Json(body)) = cart_error_to_response(CartOperation::AddProduct, &err);

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], ADD_PRODUCT_FAILED);
    }

    #[test]
    fn test_missing_product_maps_to_not_found() {
        let err = CartError::ProductNotInCart { product_id: 9 };

        let (status, Json(body)) = cart_error_to_response(CartOperation::RemoveProduct, &err);

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], REMOVE_PRODUCT_FAILED);
    }

    #[test]
    fn test_upstream_and_storage_failures() {
        let err = CartError::from(StockServiceError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        let (status, _) = cart_error_to_response(CartOperation::AddProduct, &err);
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let err = CartError::from(RepositoryError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )));
        let (status, _) = cart_error_to_response(CartOperation::AddProduct, &err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_add_product_status() {
        let mut cart = Cart::new();
        cart.push(CartLineItem::from_product(
            Product {
                id: 1,
                title: "Tênis".to_string(),
                price: rust_decimal_macros::dec!(139.90),
                image: "tenis.jpg".to_string(),
            },
            1,
        ));
        assert_eq!(add_product_status(&cart, 1), StatusCode::CREATED);

        cart.set_amount(1, 2);
        assert_eq!(add_product_status(&cart, 1), StatusCode::OK);
    }

    #[test]
    fn test_add_product_request_deserialization() {
        let json = r#"{"product_id": 3}"#;
        let request: AddProductRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.product_id, 3);
    }

    #[test]
    fn test_update_amount_request_accepts_negative() {
        let json = r#"{"amount": -1}"#;
        let request: UpdateAmountRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.amount, -1);
    }
}
