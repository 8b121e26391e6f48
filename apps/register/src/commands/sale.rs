//! # Sale Commands
//!
//! Checkout and sales history.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout                                             │
//! │                                                                         │
//! │  cart.complete_sale()  ── empty? ──► EMPTY_CART (nothing happens)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.apply_sale()       ── stock changed? ──► INSUFFICIENT_STOCK        │
//! │       │                   (cart kept so the operator can adjust)       │
//! │       ▼                                                                 │
//! │  cart.clear()  ──► receipt                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::commands::read_or_empty;
use crate::error::ApiError;
use farmstand_core::{Cart, Sale, SaleItem};
use farmstand_db::Database;

/// Sale as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: String,
    pub items: Vec<SaleItem>,
    pub total_amount_cents: i64,
    pub total_quantity: i64,
    pub timestamp: DateTime<Utc>,
}

impl From<Sale> for SaleDto {
    fn from(sale: Sale) -> Self {
        SaleDto {
            id: sale.id().to_string(),
            items: sale.items().to_vec(),
            total_amount_cents: sale.total_amount_cents(),
            total_quantity: sale.total_quantity(),
            timestamp: sale.timestamp(),
        }
    }
}

/// Completes the sale in the cart.
///
/// The sale record and the stock decrements are applied in one store
/// transaction; the cart is only cleared once that succeeds.
pub async fn checkout(db: &Database, cart: &mut Cart) -> Result<SaleDto, ApiError> {
    let completed = cart.complete_sale()?;
    db.apply_sale(&completed).await?;
    cart.clear();

    let sale = completed.sale;
    info!(
        sale_id = %sale.id(),
        total = %sale.total_amount(),
        units = sale.total_quantity(),
        "Sale completed"
    );
    Ok(sale.into())
}

/// Lists recorded sales, oldest first. An unreadable history lists as empty.
pub async fn list_sales(db: &Database) -> Vec<SaleDto> {
    read_or_empty(db.sales().list().await, "sales")
        .into_iter()
        .map(SaleDto::from)
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
