// Services module - cart state and its collaborators

pub mod cart_store;
pub mod notifier;
pub mod stock_service;

pub use cart_store::CartStore;
pub use notifier::{Notifier, RecordingNotifier, TracingNotifier};
pub use stock_service::{HttpStockService, StockService};
