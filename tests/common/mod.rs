#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rocketshoes_cart::{
    create_app,
    models::{Cart, CartLineItem, Product, ProductId, Stock, StockServiceError},
    repositories::{CartRepository, InMemorySlot, PersistenceSlot, DEFAULT_CART_KEY},
    services::{HttpStockService, RecordingNotifier, StockService},
    CartStore, Metrics,
};
use rust_decimal::Decimal;
use serde_json::json;
use tokio::net::TcpListener;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Running cart API backed by a mocked catalog server
pub struct TestEnvironment {
    pub client: Client,
    pub base_url: String,
    pub stock_server: MockServer,
    pub cart_store: Arc<CartStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        Self::with_slot(Arc::new(InMemorySlot::new())).await
    }

    pub async fn with_slot(slot: Arc<dyn PersistenceSlot>) -> Self {
        let stock_server = MockServer::start().await;

        let stock_service = Arc::new(
            HttpStockService::new(&stock_server.uri(), Some(Duration::from_secs(5)))
                .expect("Failed to build stock client"),
        );
        let notifier = Arc::new(RecordingNotifier::new());
        let repository = CartRepository::new(slot, DEFAULT_CART_KEY);
        let cart_store =
            Arc::new(CartStore::load(repository, stock_service, notifier.clone()).await);
        let metrics = Arc::new(Metrics::new().expect("Failed to create metrics"));

        let app = create_app(cart_store.clone(), metrics, Duration::from_secs(10));

        // Start server
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local address");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to serve app");
        });

        Self {
            client: Client::new(),
            base_url,
            stock_server,
            cart_store,
            notifier,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Serve `GET /products/{id}` from the mock catalog
pub async fn mount_product(server: &MockServer, id: ProductId, title: &str, price: f64) {
    Mock::given(method("GET"))
        .and(path(format!("/products/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "title": title,
            "price": price,
            "image": format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{}.jpg", id),
        })))
        .mount(server)
        .await;
}

/// Serve `GET /stock/{id}` from the mock catalog
pub async fn mount_stock(server: &MockServer, id: ProductId, amount: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/stock/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "amount": amount,
        })))
        .mount(server)
        .await;
}

/// Scratch directory unique to one test
pub fn temp_data_dir() -> PathBuf {
    std::env::temp_dir().join(format!("rocketshoes-cart-test-{}", uuid::Uuid::new_v4()))
}

pub fn create_test_product(id: ProductId) -> Product {
    Product {
        id,
        title: format!("Tênis de Caminhada {}", id),
        price: Decimal::new(17990, 2),
        image: format!("https://cdn.example.com/tenis{}.jpg", id),
    }
}

pub fn create_test_cart(items: &[(ProductId, u32)]) -> Cart {
    let mut cart = Cart::new();
    for (id, amount) in items {
        cart.push(CartLineItem::from_product(create_test_product(*id), *amount));
    }
    cart
}

/// In-process catalog with a fixed stock per product
#[derive(Default)]
pub struct FakeStockService {
    stock: HashMap<ProductId, u32>,
}

impl FakeStockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stock(mut self, product_id: ProductId, amount: u32) -> Self {
        self.stock.insert(product_id, amount);
        self
    }
}

#[async_trait]
impl StockService for FakeStockService {
    async fn get_product(&self, product_id: ProductId) -> Result<Product, StockServiceError> {
        Ok(create_test_product(product_id))
    }

    async fn get_stock(&self, product_id: ProductId) -> Result<Stock, StockServiceError> {
        self.stock
            .get(&product_id)
            .map(|amount| Stock {
                id: Some(product_id),
                amount: *amount,
            })
            .ok_or_else(|| StockServiceError::Api {
                status: 404,
                message: format!("no stock record for {}", product_id),
            })
    }
}
