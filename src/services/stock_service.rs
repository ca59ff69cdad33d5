use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::models::{Product, ProductId, Stock, StockServiceError, StockServiceResult};

/// Read-only catalog lookups the cart depends on
#[async_trait]
pub trait StockService: Send + Sync {
    /// Fetch product details for a product id
    async fn get_product(&self, product_id: ProductId) -> StockServiceResult<Product>;

    /// Fetch the current stock amount for a product id
    async fn get_stock(&self, product_id: ProductId) -> StockServiceResult<Stock>;
}

/// REST client for the catalog API (`/products/{id}` and `/stock/{id}`)
#[derive(Clone)]
pub struct HttpStockService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStockService {
    /// Create a new client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> StockServiceResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> StockServiceResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "Calling catalog API");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(url = %url, status = status.as_u16(), "Catalog API returned an error");
            return Err(StockServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| StockServiceError::Parse(e.to_string()))
    }
}

#[async_trait]
impl StockService for HttpStockService {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get_product(&self, product_id: ProductId) -> StockServiceResult<Product> {
        self.get_json(&format!("products/{}", product_id)).await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get_stock(&self, product_id: ProductId) -> StockServiceResult<Stock> {
        self.get_json(&format!("stock/{}", product_id)).await
    }
}
