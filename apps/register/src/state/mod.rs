//! # State Module
//!
//! Everything a register session holds between commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │   Database   │  │     Cart     │  │   ConfigState    │              │
//! │  │              │  │              │  │                  │              │
//! │  │  SQLite pool │  │  lines being │  │  store_name      │              │
//! │  │  (cheap to   │  │  rung up     │  │  currency_symbol │              │
//! │  │   clone)     │  │              │  │  db_path         │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  One session task owns all three; commands borrow only what they need. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;

pub use config::ConfigState;

use farmstand_core::Cart;
use farmstand_db::Database;

/// Session state passed explicitly to every command.
#[derive(Debug)]
pub struct AppState {
    pub db: Database,
    pub cart: Cart,
    pub config: ConfigState,
}

impl AppState {
    /// Starts a session with an empty cart.
    pub fn new(db: Database, config: ConfigState) -> Self {
        AppState {
            db,
            cart: Cart::new(),
            config,
        }
    }
}
