//! # farmstand-core: Pure Business Logic for Farmstand POS
//!
//! This crate holds the logic of the farm shop register as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Farmstand POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Register (apps/register)                     │   │
//! │  │    scan ──► add ──► qty/remove ──► checkout ──► sales          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ farmstand-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  barcode  │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  UPC-A    │  │   Money   │  │   Cart    │  │   rules   │  │   │
//! │  │   │  check    │  │  (cents)  │  │ CartItem  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CAMERA • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  farmstand-db (Persistence)                     │   │
//! │  │          farm_products / farm_sales JSON blobs in SQLite        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`barcode`] - UPC-A generation, check digit, validation, display
//! - [`cart`] - Cart lines, stock clamping, totals, sale completion
//! - [`types`] - Domain types (Product, Sale, StockDecrement)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Product input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use farmstand_core::barcode;
//!
//! let code = barcode::generate();
//! assert!(barcode::validate(code.as_str()).is_ok());
//! assert_eq!(barcode::format_for_display("123456789012"), "1 23456 78901 2");
//! ```

pub mod barcode;
pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use barcode::{Barcode, BarcodeCheck, BarcodeError, FormatError};
pub use cart::{Cart, CartItem, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// Guards against typing 1000 instead of 10; stock usually clamps first.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price accepted, in cents ($1,000,000.00).
///
/// A full cart at this price stays far inside `i64`:
/// `MAX_PRICE_CENTS * MAX_ITEM_QUANTITY * MAX_CART_ITEMS` is about 10^13.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;
