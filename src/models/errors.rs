use thiserror::Error;

use super::ProductId;

/// User-facing message shown when adding a product fails for any reason
pub const ADD_PRODUCT_FAILED: &str = "Error adding product";
/// User-facing message shown when removing a product fails
pub const REMOVE_PRODUCT_FAILED: &str = "Error removing product";
/// User-facing message shown when a requested amount exceeds the stock
pub const AMOUNT_OUT_OF_STOCK: &str = "Requested amount is out of stock";
/// User-facing message shown when updating an amount fails for any other reason
pub const UPDATE_AMOUNT_FAILED: &str = "Error updating product amount";

/// Failures of a single cart operation.
///
/// Every variant is reported through the notifier before it is handed back to
/// the caller, so inspecting it is optional.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Insufficient stock for product {product_id}: requested={requested}, available={available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },

    #[error("Product not in cart: {product_id}")]
    ProductNotInCart { product_id: ProductId },

    #[error("Stock service error: {source}")]
    StockService {
        #[from]
        source: StockServiceError,
    },

    #[error("Repository error: {source}")]
    Repository {
        #[from]
        source: RepositoryError,
    },
}

/// Errors raised by the product/stock lookup service
#[derive(Debug, Error)]
pub enum StockServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Errors raised by the persistence slot
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Storage I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// The three mutating operations exposed by the cart store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    AddProduct,
    RemoveProduct,
    UpdateProductAmount,
}

impl CartOperation {
    /// Stable label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            CartOperation::AddProduct => "add_product",
            CartOperation::RemoveProduct => "remove_product",
            CartOperation::UpdateProductAmount => "update_product_amount",
        }
    }

    /// The single message the UI shows for a failure of this operation
    pub fn failure_message(&self, error: &CartError) -> &'static str {
        match (self, error) {
            (CartOperation::AddProduct, _) => ADD_PRODUCT_FAILED,
            (CartOperation::RemoveProduct, _) => REMOVE_PRODUCT_FAILED,
            (CartOperation::UpdateProductAmount, CartError::InsufficientStock { .. }) => {
                AMOUNT_OUT_OF_STOCK
            }
            (CartOperation::UpdateProductAmount, _) => UPDATE_AMOUNT_FAILED,
        }
    }
}

impl std::fmt::Display for CartOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type alias for cart operations
pub type CartResult<T> = Result<T, CartError>;

/// Result type alias for stock service calls
pub type StockServiceResult<T> = Result<T, StockServiceError>;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;
