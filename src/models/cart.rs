use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier of a product in the storefront catalog
pub type ProductId = u64;

/// Product details as returned by the catalog.
///
/// Only `id` is required; display attributes the catalog omits default to
/// empty values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
}

/// Stock record for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub amount: u32,
}

/// One product entry in the cart plus its requested quantity.
///
/// Serialized flat (`id`, `title`, `price`, `image`, `amount`) so a persisted
/// cart reads as a plain list of products with amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub image: String,
    pub amount: u32,
}

/// Ordered sequence of line items, in the order products were first added
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

/// Totals derived from a cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSummary {
    pub distinct_items: usize,
    pub total_items: u64,
    pub subtotal: Decimal,
}

/// Request to set the amount of a product already in the cart.
///
/// `amount` is signed: non-positive values are accepted and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Request body for adding a product to the cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddProductRequest {
    pub product_id: ProductId,
}

/// Request body for changing a line item's amount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAmountRequest {
    pub amount: i64,
}

/// Response model for cart reads and mutations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartResponse {
    pub items: Vec<CartLineItem>,
    pub summary: CartSummary,
}

impl CartLineItem {
    /// Create a line item from product details
    pub fn from_product(product: Product, amount: u32) -> Self {
        Self {
            product_id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            amount,
        }
    }

    /// Get the total price for this line item (price * amount), saturating
    pub fn total_price(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.amount))
    }
}

impl Cart {
    /// Create a new empty cart
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Append a line item. Callers must check `contains_item` first.
    pub fn push(&mut self, item: CartLineItem) {
        debug_assert!(!self.contains_item(item.product_id));
        self.items.push(item);
    }

    /// Set the amount of an existing line item
    pub fn set_amount(&mut self, product_id: ProductId, amount: u32) -> bool {
        match self.get_item_mut(product_id) {
            Some(item) => {
                item.amount = amount;
                true
            }
            None => false,
        }
    }

    /// Remove a line item, keeping the order of the others
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let original_len = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        self.items.len() != original_len
    }

    /// Get a specific item from the cart
    pub fn get_item(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    fn get_item_mut(&mut self, product_id: ProductId) -> Option<&mut CartLineItem> {
        self.items
            .iter_mut()
            .find(|item| item.product_id == product_id)
    }

    /// Check if a specific product is in the cart
    pub fn contains_item(&self, product_id: ProductId) -> bool {
        self.get_item(product_id).is_some()
    }

    /// Get the number of distinct products in the cart
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the total number of units in the cart
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Get the total price of all items in the cart, saturating
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |total, item| total.saturating_add(item.total_price()))
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary {
            distinct_items: self.len(),
            total_items: self.total_items(),
            subtotal: self.subtotal(),
        }
    }
}

impl From<Vec<CartLineItem>> for Cart {
    fn from(items: Vec<CartLineItem>) -> Self {
        Self { items }
    }
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        let summary = cart.summary();
        Self {
            items: cart.items,
            summary,
        }
    }
}
