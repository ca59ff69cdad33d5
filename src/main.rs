use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};

use rocketshoes_cart::{
    create_app, init_observability,
    repositories::{CartRepository, FileSlot, InMemorySlot, PersistenceSlot},
    services::{HttpStockService, TracingNotifier},
    CartStore, Config, Metrics, StorageBackend,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first (basic logging only)
    let config = Config::from_environment()?;
    println!("Configuration loaded successfully");

    init_observability(&config.observability)?;

    info!(
        "Starting {} v{}",
        config.observability.service_name, config.observability.service_version
    );
    info!("Stock API: {}", config.stock_service.stock_api_url);

    let metrics = Arc::new(Metrics::new()?);
    info!("Metrics initialized successfully");

    let slot: Arc<dyn PersistenceSlot> = match config.storage.storage_backend {
        StorageBackend::File => {
            info!("Persisting cart under {}", config.storage.data_dir.display());
            Arc::new(FileSlot::new(config.storage.data_dir.clone()))
        }
        StorageBackend::Memory => {
            info!("Persisting cart in memory only");
            Arc::new(InMemorySlot::new())
        }
    };
    let repository = CartRepository::new(slot, config.storage.cart_key.clone());

    let stock_service = Arc::new(HttpStockService::new(
        &config.stock_service.stock_api_url,
        config.stock_service.request_timeout(),
    )?);

    let cart_store = Arc::new(
        CartStore::load(repository, stock_service, Arc::new(TracingNotifier)).await,
    );
    info!("Cart store initialized successfully");

    let app = create_app(cart_store, metrics, config.server.request_timeout());

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}
