//! # Farmstand Register Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Farmstand Register                               │
//! │                                                                         │
//! │   stdin ──► parse ──► commands/ ──► render ──► stdout                  │
//! │                           │                                             │
//! │                           ▼                                             │
//! │              farmstand-core (cart, barcodes, money)                    │
//! │                           │                                             │
//! │                           ▼                                             │
//! │              farmstand-db (SQLite, WAL mode)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The actual setup is in lib.rs so the session loop can be tested.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match farmstand_register::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("farmstand-register: {}", e);
            ExitCode::FAILURE
        }
    }
}
