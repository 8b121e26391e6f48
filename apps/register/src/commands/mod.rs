//! # Commands Module
//!
//! Everything the operator can ask the register to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (dispatch)
//! ├── parse.rs    ◄─── Line → Command
//! ├── product.rs  ◄─── Catalog, scanning, barcodes
//! ├── cart.rs     ◄─── Cart manipulation
//! └── sale.rs     ◄─── Checkout, history
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  "add 3f2c… 2"                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse_command() ──► Command::Add { id, qty: Some(2) }                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  execute(&mut AppState, command)                                       │
//! │       │                                                                 │
//! │       │  cart::add_to_cart(&state.db, &mut state.cart, …)              │
//! │       │  ◄── each command borrows only the state it needs              │
//! │       ▼                                                                 │
//! │  Result<CartResponse, ApiError> ──► render::cart() ──► stdout          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod parse;
pub mod product;
pub mod sale;

use tracing::error;

use crate::error::ApiError;
use crate::render;
use crate::state::AppState;
use farmstand_db::DbResult;
use parse::Command;

/// What the session should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// Runs one command against the session state.
pub async fn execute(state: &mut AppState, command: Command) -> Result<Reply, ApiError> {
    let AppState { db, cart, config } = state;

    let text = match command {
        Command::Products { filter } => render::products(
            config,
            &product::list_products(db, filter.as_deref()).await,
        ),
        Command::Product { id } => render::product(config, &product::get_product(db, &id).await?),
        Command::NewProduct(input) => {
            render::product(config, &product::create_product(db, input).await?)
        }
        Command::Price { id, price_cents } => {
            render::product(config, &product::update_price(db, &id, price_cents).await?)
        }
        Command::Stock { id, stock } => {
            render::product(config, &product::update_stock(db, cart, &id, stock).await?)
        }
        Command::Delete { id } => {
            let removed = product::delete_product(db, cart, &id).await?;
            format!("Deleted {}", removed.name)
        }
        Command::Scan { code } => render::cart(config, &product::scan_barcode(db, cart, &code).await?),
        Command::Check { code } => render::check(&code, &product::check_barcode(&code)),
        Command::Barcode { count } => render::barcodes(&product::generate_barcodes(count)),
        Command::Add { id, qty } => {
            render::cart(config, &cart::add_to_cart(db, cart, &id, qty).await?)
        }
        Command::Qty { id, qty } => {
            render::cart(config, &cart::update_cart_item(db, cart, &id, qty).await?)
        }
        Command::Remove { id } => render::cart(config, &cart::remove_from_cart(cart, &id)),
        Command::Cart => render::cart(config, &cart::get_cart(cart)),
        Command::Clear => render::cart(config, &cart::clear_cart(cart)),
        Command::Checkout => render::receipt(config, &sale::checkout(db, cart).await?),
        Command::Sales => render::sales(config, &sale::list_sales(db).await),
        Command::Help => render::HELP.to_string(),
        Command::Quit => return Ok(Reply::Quit),
    };

    Ok(Reply::Output(text))
}

/// Listing views degrade to an empty collection when storage can't be
/// read; the failure is logged rather than shown as data.
pub(crate) fn read_or_empty<T>(result: DbResult<Vec<T>>, what: &str) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            error!(collection = what, error = %e, "Failed to read collection, showing none");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ConfigState;
    use farmstand_db::{Database, DbConfig};

    async fn test_state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState::new(db, ConfigState::default())
    }

    async fn run(state: &mut AppState, line: &str) -> Result<Reply, ApiError> {
        let command = parse::parse_command(line)?.expect("non-blank line");
        execute(state, command).await
    }

    fn output(reply: Reply) -> String {
        match reply {
            Reply::Output(text) => text,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    #[tokio::test]
    async fn test_ring_up_and_checkout() {
        let mut state = test_state().await;
        run(&mut state, "new Apples 2.50 10").await.unwrap();
        run(&mut state, "new Bread 1.00 4").await.unwrap();

        let products = state.db.products().list().await.unwrap();
        let (apples, bread) = (&products[0], &products[1]);

        run(&mut state, &format!("add {} 3", apples.id)).await.unwrap();
        run(&mut state, &format!("scan {}", bread.barcode)).await.unwrap();
        let text = output(run(&mut state, &format!("qty {} 2", bread.id)).await.unwrap());
        assert!(text.contains("$9.50"));

        let receipt = output(run(&mut state, "checkout").await.unwrap());
        assert!(receipt.contains("TOTAL"));
        assert!(receipt.contains("$9.50"));
        assert!(state.cart.is_empty());

        let history = output(run(&mut state, "sales").await.unwrap());
        assert!(history.ends_with("1 sale(s), $9.50"));
    }

    #[tokio::test]
    async fn test_errors_leave_state_alone() {
        let mut state = test_state().await;

        let err = run(&mut state, "checkout").await.unwrap_err();
        assert_eq!(err.message, "Cannot complete a sale with an empty cart");

        let err = run(&mut state, "scan 123456789013").await.unwrap_err();
        assert_eq!(err.message, "Invalid check digit. Expected 2, got 3");

        assert!(state.cart.is_empty());
    }

    #[tokio::test]
    async fn test_quit_and_help() {
        let mut state = test_state().await;
        assert_eq!(run(&mut state, "quit").await.unwrap(), Reply::Quit);

        let help = output(run(&mut state, "help").await.unwrap());
        assert!(help.contains("checkout"));
    }
}
