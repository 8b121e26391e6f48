//! # Cart Module
//!
//! The in-progress sale: line items, stock ceilings, totals, and checkout.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operator Action          Cart Method             Effect                │
//! │  ───────────────          ───────────             ──────                │
//! │                                                                         │
//! │  Scan / add product ─────► add_item() ──────────► qty += n (≤ stock)   │
//! │                                                                         │
//! │  Change quantity ────────► set_quantity() ──────► qty = n (≤ stock)    │
//! │                                                   n ≤ 0 removes line    │
//! │                                                                         │
//! │  Remove line ────────────► remove_item() ───────► line dropped         │
//! │                                                                         │
//! │  Checkout ───────────────► complete_sale() ─────► Sale + decrements    │
//! │                                                   (cart unchanged)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by product id (adding again increases quantity)
//! - Every line quantity is in `1..=min(stock, MAX_ITEM_QUANTITY)` of the
//!   line's product snapshot
//! - At most `MAX_CART_ITEMS` lines
//!
//! The cart never touches the product store. Checkout returns
//! [`StockDecrement`]s for the store to apply.

use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CompletedSale, Product, Sale, SaleItem, StockDecrement};
use crate::validation;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Highest quantity a line for this product may hold.
fn ceiling(product: &Product) -> i64 {
    product.stock.min(MAX_ITEM_QUANTITY)
}

// =============================================================================
// Cart Item
// =============================================================================

/// A product snapshot plus the quantity being bought.
///
/// The snapshot freezes name and price at the moment the product was last
/// added, and its `stock` is the ceiling for this line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    product: Product,
    quantity: i64,
}

impl CartItem {
    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.product.price().multiply_quantity(self.quantity)
    }

    fn to_sale_item(&self) -> SaleItem {
        SaleItem {
            product_id: self.product.id.clone(),
            product_name: self.product.name.clone(),
            quantity: self.quantity,
            price_cents: self.product.price_cents,
            total_cents: self.line_total().cents(),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Adds `qty` units of a product, or increases an existing line.
    ///
    /// The resulting quantity is clamped to the product's stock, so asking
    /// for more than is on hand quietly caps the line. The line's product
    /// snapshot is refreshed from `product`.
    ///
    /// ## Returns
    /// - `Ok(quantity)` - the line's quantity after the add
    /// - `Err(Validation)` - `qty` not positive or above the per-line maximum,
    ///   or the product's price is outside `0..=MAX_PRICE_CENTS`
    /// - `Err(OutOfStock)` - product has no stock (an existing line is dropped)
    /// - `Err(CartTooLarge)` - a new line would exceed `MAX_CART_ITEMS`
    ///
    /// ## User Workflow
    /// ```text
    /// Eggs (stock: 3) in cart x2
    ///      │
    ///      ▼
    /// add_item(eggs, 5) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// min(2 + 5, 3) = 3 → UI shows "Eggs x3"
    /// ```
    pub fn add_item(&mut self, product: &Product, qty: i64) -> CoreResult<i64> {
        validation::validate_quantity(qty)?;
        validation::validate_price_cents(product.price_cents)?;

        if let Some(pos) = self.position(&product.id) {
            if !product.in_stock() {
                self.items.remove(pos);
                return Err(CoreError::OutOfStock {
                    product: product.name.clone(),
                });
            }

            let item = &mut self.items[pos];
            item.product = product.clone();
            item.quantity = (item.quantity + qty).min(ceiling(product));
            return Ok(item.quantity);
        }

        if !product.in_stock() {
            return Err(CoreError::OutOfStock {
                product: product.name.clone(),
            });
        }

        if validation::validate_cart_size(self.items.len()).is_err() {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        let quantity = qty.min(ceiling(product));
        self.items.push(CartItem {
            product: product.clone(),
            quantity,
        });
        Ok(quantity)
    }

    /// Sets a line's quantity.
    ///
    /// ## Behavior
    /// - `qty <= 0`: removes the line (no error if it wasn't there)
    /// - otherwise: quantity becomes `min(qty, stock ceiling)`
    ///
    /// ## Returns
    /// The line's new quantity (0 when removed), or `ItemNotInCart`.
    pub fn set_quantity(&mut self, product_id: &str, qty: i64) -> CoreResult<i64> {
        if qty <= 0 {
            self.remove_item(product_id);
            return Ok(0);
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.product.id == product_id)
            .ok_or_else(|| CoreError::ItemNotInCart(product_id.to_string()))?;

        item.quantity = qty.min(ceiling(&item.product));
        Ok(item.quantity)
    }

    /// Re-reads a line's product from the catalog.
    ///
    /// Replaces the snapshot and re-clamps the quantity to the new stock;
    /// a product that has sold out elsewhere (or now carries a price out of
    /// range) loses its line. Returns the new quantity, or `None` when the
    /// product has no line (any more).
    pub fn refresh_product(&mut self, product: &Product) -> Option<i64> {
        let pos = self.position(&product.id)?;

        if !product.in_stock() || validation::validate_price_cents(product.price_cents).is_err() {
            self.items.remove(pos);
            return None;
        }

        let item = &mut self.items[pos];
        item.product = product.clone();
        item.quantity = item.quantity.min(ceiling(product));
        Some(item.quantity)
    }

    /// Drops a line unconditionally, returning it if it existed.
    pub fn remove_item(&mut self, product_id: &str) -> Option<CartItem> {
        self.position(product_id).map(|pos| self.items.remove(pos))
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `price × quantity` over all lines.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Builds the sale record with a fresh id and the current time.
    pub fn complete_sale(&self) -> CoreResult<CompletedSale> {
        self.complete_sale_at(Uuid::new_v4().to_string(), Utc::now())
    }

    /// Builds the sale record and the stock changes it implies.
    ///
    /// The cart is left as-is; clear it once the store has applied the sale.
    ///
    /// ## Checkout Flow
    /// ```text
    /// Cart [Apples x3 @ $2.50, Bread x2 @ $1.00]
    ///      │
    ///      ▼
    /// complete_sale_at() ← THIS FUNCTION
    ///      │
    ///      ├── Sale { items: [$7.50, $2.00], total_amount: $9.50 }
    ///      └── StockDecrement [apples -3, bread -2]
    ///      │
    ///      ▼
    /// Store applies both atomically, register clears the cart
    /// ```
    pub fn complete_sale_at(
        &self,
        sale_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> CoreResult<CompletedSale> {
        if self.items.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let items = self.items.iter().map(CartItem::to_sale_item).collect();
        let stock_decrements = self
            .items
            .iter()
            .map(|item| StockDecrement {
                product_id: item.product.id.clone(),
                quantity: item.quantity,
            })
            .collect();

        Ok(CompletedSale {
            sale: Sale::from_items(sale_id.into(), items, timestamp),
            stock_decrements,
        })
    }

    /// Lines in the order they were first added.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks up a line by product id.
    pub fn get(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    /// Returns the number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity across lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.product.id == product_id)
    }
}

/// Cart totals summary for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub total_cents: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total_cents: cart.total().cents(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
