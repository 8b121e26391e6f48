//! # Domain Types
//!
//! Core domain types used throughout Farmstand POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │ StockDecrement  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  product_id     │       │
//! │  │  name           │   │  items[]        │   │  quantity       │       │
//! │  │  price_cents    │   │  total_amount   │   └─────────────────┘       │
//! │  │  stock          │   │  timestamp      │                              │
//! │  │  barcode        │   └─────────────────┘                              │
//! │  └─────────────────┘    (immutable once                                 │
//! │                          created)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names serialize as camelCase; these are the shapes stored in the
//! `farm_products` / `farm_sales` blobs and exported to TypeScript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::barcode::{self, Barcode};
use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::validation;

// =============================================================================
// Product
// =============================================================================

/// A product in the farm catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to the cashier and on the sale record.
    pub name: String,

    /// Price in cents, stored under `price`.
    #[serde(rename = "price")]
    pub price_cents: i64,

    /// Units on hand. Never negative.
    pub stock: i64,

    pub description: String,

    /// UPC-A code printed on the shelf label.
    #[ts(type = "string")]
    pub barcode: Barcode,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Validates operator input and builds a new catalog product.
    ///
    /// A fresh barcode is generated unless the input carries one, in which
    /// case it must pass UPC-A validation.
    pub fn create(input: NewProduct, now: DateTime<Utc>) -> CoreResult<Product> {
        validation::validate_product_name(&input.name)?;
        validation::validate_price_cents(input.price_cents)?;
        validation::validate_stock(input.stock)?;
        validation::validate_description(&input.description)?;

        let barcode = match input.barcode.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => barcode::validate(code)?,
            _ => barcode::generate(),
        };

        Ok(Product {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            price_cents: input.price_cents,
            stock: input.stock,
            description: input.description.trim().to_string(),
            barcode,
            created_at: now,
        })
    }

    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// True when at least one unit can be sold.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Changes the price after validating it.
    pub fn set_price_cents(&mut self, cents: i64) -> Result<(), ValidationError> {
        validation::validate_price_cents(cents)?;
        self.price_cents = cents;
        Ok(())
    }

    /// Changes the stock level after validating it.
    pub fn set_stock(&mut self, stock: i64) -> Result<(), ValidationError> {
        validation::validate_stock(stock)?;
        self.stock = stock;
        Ok(())
    }
}

/// Operator input for a new product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub stock: i64,
    #[serde(default)]
    pub description: String,
    /// Existing label code; generated when absent.
    #[serde(default)]
    pub barcode: Option<String>,
}

// =============================================================================
// Sale
// =============================================================================

/// One line of a completed sale.
///
/// Name and price are snapshots taken at checkout, so later catalog edits
/// don't rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    /// Unit price in cents at time of sale.
    #[serde(rename = "price")]
    pub price_cents: i64,
    /// `price_cents * quantity`.
    #[serde(rename = "total")]
    pub total_cents: i64,
}

impl SaleItem {
    /// Returns the line total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A completed sale.
///
/// Fields are private: a `Sale` is built once at checkout (or read back
/// from storage) and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    id: String,
    items: Vec<SaleItem>,
    #[serde(rename = "totalAmount")]
    total_amount_cents: i64,
    #[ts(as = "String")]
    timestamp: DateTime<Utc>,
}

impl Sale {
    /// Builds a sale from its lines; the grand total is the sum of line totals.
    pub(crate) fn from_items(id: String, items: Vec<SaleItem>, timestamp: DateTime<Utc>) -> Self {
        let total_amount_cents = items.iter().map(|item| item.total_cents).sum();
        Sale {
            id,
            items,
            total_amount_cents,
            timestamp,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn items(&self) -> &[SaleItem] {
        &self.items
    }

    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }

    pub fn total_amount_cents(&self) -> i64 {
        self.total_amount_cents
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Units sold across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

// =============================================================================
// Checkout Output
// =============================================================================

/// Instruction for the product store: subtract `quantity` from a product's
/// stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockDecrement {
    pub product_id: String,
    pub quantity: i64,
}

/// What checkout produces: the sale record and the stock changes it
/// implies. The core never touches the store; the caller hands this to
/// the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CompletedSale {
    pub sale: Sale,
    pub stock_decrements: Vec<StockDecrement>,
}

// =============================================================================
// Unit Tests
// =============================================================================
