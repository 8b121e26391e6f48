//! # Cart Commands
//!
//! Commands for ringing items up.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐                        │
//! │  │  Empty   │────►│ In Cart  │────►│ Recorded │                        │
//! │  │  Cart    │     │          │     │   Sale   │                        │
//! │  └──────────┘     └──────────┘     └──────────┘                        │
//! │       ▲                │                 │                              │
//! │       │           add / scan         checkout                          │
//! │       │           qty / remove       (sale.rs)                         │
//! │       │                │                 │                              │
//! │       └──── clear ─────┘◄────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use farmstand_core::{Cart, CartItem, CartTotals, CoreError};
use farmstand_db::Database;

/// One cart line as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineDto {
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    /// Stock the line is clamped to.
    pub stock: i64,
    pub line_total_cents: i64,
}

impl From<&CartItem> for CartLineDto {
    fn from(item: &CartItem) -> Self {
        let product = item.product();
        CartLineDto {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity: item.quantity(),
            stock: product.stock,
            line_total_cents: item.line_total().cents(),
        }
    }
}

/// Cart response including items and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLineDto>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items().iter().map(CartLineDto::from).collect(),
            totals: CartTotals::from(cart),
        }
    }
}

/// Gets the current cart contents.
pub fn get_cart(cart: &Cart) -> CartResponse {
    CartResponse::from(cart)
}

/// Adds a product to the cart by id.
///
/// ## Behavior
/// - If product already in cart: quantity increases
/// - Quantity is clamped to the product's current stock
/// - Price is frozen at the time of adding
///
/// ## Arguments
/// * `product_id` - Product UUID to add
/// * `quantity` - Quantity to add (default: 1)
pub async fn add_to_cart(
    db: &Database,
    cart: &mut Cart,
    product_id: &str,
    quantity: Option<i64>,
) -> Result<CartResponse, ApiError> {
    let quantity = quantity.unwrap_or(1);
    debug!(product_id = %product_id, quantity = %quantity, "add_to_cart command");

    let product = db
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    cart.add_item(&product, quantity)?;
    Ok(CartResponse::from(&*cart))
}

/// Sets the quantity of a cart line.
///
/// ## Behavior
/// - Quantity 0 or less: removes the line
/// - Otherwise clamped to the product's current stock, re-read from the
///   catalog so a sale made elsewhere is respected
pub async fn update_cart_item(
    db: &Database,
    cart: &mut Cart,
    product_id: &str,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = %product_id, quantity = %quantity, "update_cart_item command");

    if quantity > 0 && cart.get(product_id).is_some() {
        match db.products().get_by_id(product_id).await? {
            Some(product) => {
                if cart.refresh_product(&product).is_none() {
                    return Err(CoreError::OutOfStock {
                        product: product.name,
                    }
                    .into());
                }
            }
            None => {
                cart.remove_item(product_id);
                return Err(ApiError::not_found("Product", product_id));
            }
        }
    }

    cart.set_quantity(product_id, quantity)?;
    Ok(CartResponse::from(&*cart))
}

/// Removes a line from the cart. Removing an absent line is not an error.
pub fn remove_from_cart(cart: &mut Cart, product_id: &str) -> CartResponse {
    debug!(product_id = %product_id, "remove_from_cart command");
    cart.remove_item(product_id);
    CartResponse::from(&*cart)
}

/// Clears all items from the cart.
pub fn clear_cart(cart: &mut Cart) -> CartResponse {
    debug!("clear_cart command");
    cart.clear();
    CartResponse::from(&*cart)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::Utc;
    use farmstand_core::{NewProduct, Product};
    use farmstand_db::DbConfig;

    async fn setup() -> (Database, Product, Product) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let make = |name: &str, price_cents: i64, stock: i64| {
            Product::create(
                NewProduct {
                    name: name.to_string(),
                    price_cents,
                    stock,
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap()
        };
        let apples = make("Apples", 250, 10);
        let bread = make("Bread", 100, 4);
        db.products().save(&apples).await.unwrap();
        db.products().save(&bread).await.unwrap();
        (db, apples, bread)
    }

    #[tokio::test]
    async fn test_add_to_cart_totals() {
        let (db, apples, bread) = setup().await;
        let mut cart = Cart::new();

        add_to_cart(&db, &mut cart, &apples.id, Some(3)).await.unwrap();
        let response = add_to_cart(&db, &mut cart, &bread.id, Some(2)).await.unwrap();

        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[0].line_total_cents, 750);
        assert_eq!(response.totals.total_cents, 950);
        assert_eq!(response.totals.total_quantity, 5);
    }

    #[tokio::test]
    async fn test_add_defaults_to_one() {
        let (db, apples, _) = setup().await;
        let mut cart = Cart::new();

        let response = add_to_cart(&db, &mut cart, &apples.id, None).await.unwrap();
        assert_eq!(response.items[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let (db, _, _) = setup().await;
        let mut cart = Cart::new();

        let err = add_to_cart(&db, &mut cart, "nope", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_update_uses_current_stock() {
        let (db, _, mut bread) = setup().await;
        let mut cart = Cart::new();
        add_to_cart(&db, &mut cart, &bread.id, Some(1)).await.unwrap();

        // Stock drops after the line was added
        bread.set_stock(2).unwrap();
        db.products().save(&bread).await.unwrap();

        let response = update_cart_item(&db, &mut cart, &bread.id, 4).await.unwrap();
        assert_eq!(response.items[0].quantity, 2);
        assert_eq!(response.items[0].stock, 2);
    }

    #[tokio::test]
    async fn test_update_zero_removes() {
        let (db, apples, bread) = setup().await;
        let mut cart = Cart::new();
        add_to_cart(&db, &mut cart, &apples.id, Some(3)).await.unwrap();
        add_to_cart(&db, &mut cart, &bread.id, Some(2)).await.unwrap();

        let response = update_cart_item(&db, &mut cart, &bread.id, 0).await.unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.totals.total_cents, 750);
    }

    #[tokio::test]
    async fn test_update_line_not_in_cart() {
        let (db, apples, _) = setup().await;
        let mut cart = Cart::new();

        let err = update_cart_item(&db, &mut cart, &apples.id, 2).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_update_deleted_product_drops_line() {
        let (db, apples, _) = setup().await;
        let mut cart = Cart::new();
        add_to_cart(&db, &mut cart, &apples.id, Some(1)).await.unwrap();
        db.products().delete(&apples.id).await.unwrap();

        let err = update_cart_item(&db, &mut cart, &apples.id, 2).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let (db, apples, bread) = setup().await;
        let mut cart = Cart::new();
        add_to_cart(&db, &mut cart, &apples.id, Some(1)).await.unwrap();
        add_to_cart(&db, &mut cart, &bread.id, Some(1)).await.unwrap();

        let response = remove_from_cart(&mut cart, &apples.id);
        assert_eq!(response.items.len(), 1);
        let response = remove_from_cart(&mut cart, &apples.id);
        assert_eq!(response.items.len(), 1);

        let response = clear_cart(&mut cart);
        assert!(response.items.is_empty());
        assert_eq!(response.totals.total_cents, 0);
    }

    #[test]
    fn test_cart_response_json_shape() {
        let json = serde_json::to_value(get_cart(&Cart::new())).unwrap();
        assert_eq!(json["totals"]["totalCents"], 0);
        assert!(json["items"].as_array().unwrap().is_empty());
    }
}
