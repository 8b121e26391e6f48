//! # Repository Module
//!
//! Storage repositories for Farmstand POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  Register command                                                      │
//! │       │                                                                 │
//! │       │  db.products().find_by_barcode(&code)                          │
//! │       ▼                                                                 │
//! │  ProductRepository / SaleRepository                                    │
//! │  ├── list / get_by_id                                                  │
//! │  └── save / delete        (products; sales via apply_sale)             │
//! │       │                                                                 │
//! │       │  whole-collection JSON read/write                              │
//! │       ▼                                                                 │
//! │  kv  ──►  kv_store(key, value, updated_at)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog lookup and edits
//! - [`SaleRepository`](sale::SaleRepository) - Sales history

pub mod kv;
pub mod product;
pub mod sale;
