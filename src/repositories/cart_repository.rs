use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::PersistenceSlot;
use crate::models::{Cart, RepositoryResult};

/// Key under which the storefront keeps its cart
pub const DEFAULT_CART_KEY: &str = "@RocketShoes:cart";

/// Loads and saves the whole cart in a single persistence slot
#[derive(Clone)]
pub struct CartRepository {
    slot: Arc<dyn PersistenceSlot>,
    key: String,
}

impl CartRepository {
    pub fn new(slot: Arc<dyn PersistenceSlot>, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the persisted cart.
    ///
    /// Never fails: an absent, unreadable or unparsable slot yields an empty
    /// cart.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn load(&self) -> Cart {
        let raw = match self.slot.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("No persisted cart, starting empty");
                return Cart::new();
            }
            Err(e) => {
                error!(error = %e, "Failed to read persisted cart, starting empty");
                return Cart::new();
            }
        };

        match serde_json::from_str::<Cart>(&raw) {
            Ok(cart) => {
                info!(items = cart.len(), "Persisted cart loaded");
                cart
            }
            Err(e) => {
                warn!(error = %e, "Persisted cart is not valid JSON, starting empty");
                Cart::new()
            }
        }
    }

    /// Serialize the full cart and overwrite the slot
    #[instrument(skip(self, cart), fields(key = %self.key, items = cart.len()))]
    pub async fn save(&self, cart: &Cart) -> RepositoryResult<()> {
        let raw = serde_json::to_string(cart)?;
        self.slot.set(&self.key, &raw).await?;

        info!("Cart persisted");
        Ok(())
    }
}
