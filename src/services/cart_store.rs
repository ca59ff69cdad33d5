use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::{Notifier, StockService};
use crate::models::{
    Cart, CartError, CartLineItem, CartOperation, CartResult, CartSummary, Product, ProductId,
    UpdateProductAmount,
};
use crate::repositories::CartRepository;

/// Owns the shopping cart and mirrors every successful mutation to storage.
///
/// Mutations are serialized: the cart lock is held for the whole operation,
/// stock lookups included, so two concurrent increments of the same product
/// are applied one after the other against fresh amounts.
pub struct CartStore {
    cart: Mutex<Cart>,
    repository: CartRepository,
    stock_service: Arc<dyn StockService>,
    notifier: Arc<dyn Notifier>,
}

impl CartStore {
    /// Create a store seeded from the persisted cart
    pub async fn load(
        repository: CartRepository,
        stock_service: Arc<dyn StockService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let cart = repository.load().await;
        Self::with_cart(cart, repository, stock_service, notifier)
    }

    /// Create a store around an already loaded cart
    pub fn with_cart(
        cart: Cart,
        repository: CartRepository,
        stock_service: Arc<dyn StockService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            cart: Mutex::new(cart),
            repository,
            stock_service,
            notifier,
        }
    }

    /// Snapshot of the current cart
    pub async fn cart(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    pub async fn summary(&self) -> CartSummary {
        self.cart.lock().await.summary()
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart is incremented if stock allows it;
    /// otherwise its details are fetched and it is appended with amount 1.
    /// Returns the cart as committed by this call.
    #[instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> CartResult<Cart> {
        let mut cart = self.cart.lock().await;
        let planned = self.plan_add_product(&cart, product_id).await;
        self.commit(&mut cart, CartOperation::AddProduct, planned)
            .await
    }

    /// Remove a product from the cart
    #[instrument(skip(self))]
    pub async fn remove_product(&self, product_id: ProductId) -> CartResult<Cart> {
        let mut cart = self.cart.lock().await;

        let mut next = cart.clone();
        let planned = if next.remove_item(product_id) {
            Ok(next)
        } else {
            Err(CartError::ProductNotInCart { product_id })
        };

        self.commit(&mut cart, CartOperation::RemoveProduct, planned)
            .await
    }

    /// Set the amount of a product already in the cart.
    ///
    /// Non-positive amounts are ignored without notification and the
    /// current cart is returned as is.
    #[instrument(skip(self, request), fields(product_id = request.product_id, amount = request.amount))]
    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> CartResult<Cart> {
        let mut cart = self.cart.lock().await;

        if request.amount <= 0 {
            info!("Ignoring non-positive amount");
            return Ok(cart.clone());
        }

        let planned = self.plan_update_amount(&cart, request).await;
        self.commit(&mut cart, CartOperation::UpdateProductAmount, planned)
            .await
    }

    async fn plan_add_product(&self, cart: &Cart, product_id: ProductId) -> CartResult<Cart> {
        let mut next = cart.clone();

        match cart.get_item(product_id) {
            Some(existing) => {
                let stock = self.stock_service.get_stock(product_id).await?;
                let requested = existing.amount.saturating_add(1);

                if requested > stock.amount {
                    return Err(CartError::InsufficientStock {
                        product_id,
                        requested: i64::from(requested),
                        available: stock.amount,
                    });
                }

                next.set_amount(product_id, requested);
            }
            None => {
                let product = self.stock_service.get_product(product_id).await?;
                // The line item is keyed by the id that was asked for
                let product = Product {
                    id: product_id,
                    ..product
                };
                next.push(CartLineItem::from_product(product, 1));
            }
        }

        Ok(next)
    }

    async fn plan_update_amount(
        &self,
        cart: &Cart,
        request: UpdateProductAmount,
    ) -> CartResult<Cart> {
        let product_id = request.product_id;
        let stock = self.stock_service.get_stock(product_id).await?;

        if request.amount > i64::from(stock.amount) {
            return Err(CartError::InsufficientStock {
                product_id,
                requested: request.amount,
                available: stock.amount,
            });
        }

        let amount = u32::try_from(request.amount).map_err(|_| CartError::InsufficientStock {
            product_id,
            requested: request.amount,
            available: stock.amount,
        })?;

        let mut next = cart.clone();
        if next.set_amount(product_id, amount) {
            Ok(next)
        } else {
            Err(CartError::ProductNotInCart { product_id })
        }
    }

    /// Persist a planned cart, then swap it in.
    ///
    /// The in-memory cart only changes once the slot write succeeded.
    async fn commit(
        &self,
        cart: &mut Cart,
        operation: CartOperation,
        planned: CartResult<Cart>,
    ) -> CartResult<Cart> {
        let saved = match planned {
            Ok(next) => self
                .repository
                .save(&next)
                .await
                .map(|()| next)
                .map_err(CartError::from),
            Err(err) => Err(err),
        };

        match saved {
            Ok(next) => {
                *cart = next;
                info!(
                    operation = %operation,
                    items = cart.len(),
                    total_items = cart.total_items(),
                    "Cart updated"
                );
                Ok(cart.clone())
            }
            Err(err) => {
                warn!(operation = %operation, error = %err, "Cart operation failed");
                self.notifier.show_error(operation.failure_message(&err));
                Err(err)
            }
        }
    }
}
