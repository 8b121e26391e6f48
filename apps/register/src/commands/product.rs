//! # Product Commands
//!
//! Catalog commands and barcode scanning.
//!
//! ## Scan Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Scan Flow                                            │
//! │                                                                         │
//! │  Scanner "types" 036000291452⏎                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  barcode::validate()  ── bad length / digit / check digit? ──► error   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  products().find_by_barcode()  ── no match? ──► NOT_FOUND              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cart.add_item(product, 1)  (clamped to stock)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::commands::cart::CartResponse;
use crate::commands::read_or_empty;
use crate::error::ApiError;
use farmstand_core::barcode::{self, BarcodeCheck};
use farmstand_core::{Cart, NewProduct, Product};
use farmstand_db::Database;

/// Product as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    pub stock: i64,
    pub description: String,
    pub barcode: String,
    /// `D DDDDD DDDDD D` grouping for shelf labels.
    pub barcode_display: String,
    pub in_stock: bool,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            in_stock: p.in_stock(),
            barcode_display: p.barcode.formatted(),
            barcode: p.barcode.into(),
            id: p.id,
            name: p.name,
            price_cents: p.price_cents,
            stock: p.stock,
            description: p.description,
        }
    }
}

async fn fetch(db: &Database, id: &str) -> Result<Product, ApiError> {
    db.products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))
}

/// Lists the catalog. An unreadable catalog lists as empty.
///
/// With a `filter`, only products whose name contains it are listed,
/// ignoring case. A blank filter lists everything.
pub async fn list_products(db: &Database, filter: Option<&str>) -> Vec<ProductDto> {
    let needle = filter
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty());

    read_or_empty(db.products().list().await, "products")
        .into_iter()
        .filter(|p| match &needle {
            Some(term) => p.name.to_lowercase().contains(term.as_str()),
            None => true,
        })
        .map(ProductDto::from)
        .collect()
}

/// Gets a product by its ID.
pub async fn get_product(db: &Database, id: &str) -> Result<ProductDto, ApiError> {
    debug!(product_id = %id, "get_product command");
    Ok(fetch(db, id).await?.into())
}

/// Adds a product to the catalog.
///
/// A barcode is generated unless `input.barcode` carries an existing label.
pub async fn create_product(db: &Database, input: NewProduct) -> Result<ProductDto, ApiError> {
    let product = Product::create(input, Utc::now())?;
    db.products().save(&product).await?;

    info!(product_id = %product.id, barcode = %product.barcode, "Product created");
    Ok(product.into())
}

/// Changes a product's price.
///
/// Lines already in the cart keep the price they were rung up at until the
/// product is added again.
pub async fn update_price(
    db: &Database,
    id: &str,
    price_cents: i64,
) -> Result<ProductDto, ApiError> {
    let mut product = fetch(db, id).await?;
    product.set_price_cents(price_cents)?;
    db.products().save(&product).await?;

    info!(product_id = %id, price_cents, "Price updated");
    Ok(product.into())
}

/// Sets a product's stock level and re-clamps its cart line.
pub async fn update_stock(
    db: &Database,
    cart: &mut Cart,
    id: &str,
    stock: i64,
) -> Result<ProductDto, ApiError> {
    let mut product = fetch(db, id).await?;
    product.set_stock(stock)?;
    db.products().save(&product).await?;
    cart.refresh_product(&product);

    info!(product_id = %id, stock, "Stock updated");
    Ok(product.into())
}

/// Removes a product from the catalog and from the cart.
pub async fn delete_product(
    db: &Database,
    cart: &mut Cart,
    id: &str,
) -> Result<ProductDto, ApiError> {
    let removed = db.products().delete(id).await?;
    cart.remove_item(id);
    Ok(removed.into())
}

/// Validates a scanned code, looks it up, and adds one unit to the cart.
pub async fn scan_barcode(
    db: &Database,
    cart: &mut Cart,
    raw: &str,
) -> Result<CartResponse, ApiError> {
    let code = barcode::validate(raw)?;
    debug!(barcode = %code, "scan_barcode command");

    let product = db
        .products()
        .find_by_barcode(&code)
        .await?
        .ok_or_else(|| ApiError::not_found("Product with barcode", code.as_str()))?;

    cart.add_item(&product, 1)?;
    Ok(CartResponse::from(&*cart))
}

/// Reports whether a code is a valid UPC-A, without touching the catalog.
pub fn check_barcode(raw: &str) -> BarcodeCheck {
    barcode::check(raw)
}

/// Generates fresh label codes, e.g. for printing ahead of time.
pub fn generate_barcodes(count: usize) -> Vec<String> {
    barcode::generate_batch(count)
        .into_iter()
        .map(|code| code.formatted())
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use farmstand_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn input(name: &str, price_cents: i64, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price_cents,
            stock,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let db = test_db().await;

        let eggs = create_product(&db, input("Eggs", 450, 12)).await.unwrap();
        assert!(barcode::validate(&eggs.barcode).is_ok());
        assert_eq!(eggs.barcode_display.len(), 15);

        let listed = list_products(&db, None).await;
        assert_eq!(listed, vec![eggs]);
    }

    #[tokio::test]
    async fn test_list_filters_by_name() {
        let db = test_db().await;
        let honey = create_product(&db, input("Raw Honey", 1200, 5)).await.unwrap();
        let comb = create_product(&db, input("Honeycomb", 1800, 2)).await.unwrap();
        create_product(&db, input("Sweet Corn", 75, 40)).await.unwrap();

        let found = list_products(&db, Some("HONEY")).await;
        assert_eq!(found, vec![honey, comb]);

        let found = list_products(&db, Some(" corn ")).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Sweet Corn");

        assert!(list_products(&db, Some("pumpkin")).await.is_empty());
        assert_eq!(list_products(&db, Some("  ")).await.len(), 3);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let db = test_db().await;

        let err = create_product(&db, input("", 450, 12)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let mut bad_label = input("Jam", 650, 3);
        bad_label.barcode = Some("123456789013".to_string());
        let err = create_product(&db, bad_label).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidBarcode);

        assert!(list_products(&db, None).await.is_empty());
    }

    #[tokio::test]
    async fn test_update_price_and_stock() {
        let db = test_db().await;
        let mut cart = Cart::new();
        let kale = create_product(&db, input("Kale", 300, 10)).await.unwrap();

        let product = fetch(&db, &kale.id).await.unwrap();
        cart.add_item(&product, 8).unwrap();

        update_price(&db, &kale.id, 350).await.unwrap();
        let updated = update_stock(&db, &mut cart, &kale.id, 5).await.unwrap();

        assert_eq!(updated.price_cents, 350);
        assert_eq!(updated.stock, 5);
        assert_eq!(cart.get(&kale.id).unwrap().quantity(), 5);

        let err = update_stock(&db, &mut cart, &kale.id, -1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_delete_removes_cart_line() {
        let db = test_db().await;
        let mut cart = Cart::new();
        let beets = create_product(&db, input("Beets", 200, 4)).await.unwrap();
        cart.add_item(&fetch(&db, &beets.id).await.unwrap(), 1).unwrap();

        delete_product(&db, &mut cart, &beets.id).await.unwrap();

        assert!(cart.is_empty());
        let err = get_product(&db, &beets.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_scan_adds_one_unit() {
        let db = test_db().await;
        let mut cart = Cart::new();
        let honey = create_product(&db, input("Honey", 1200, 2)).await.unwrap();

        // Scanners may send surrounding whitespace
        let scanned = format!(" {}\n", honey.barcode);
        scan_barcode(&db, &mut cart, &scanned).await.unwrap();
        scan_barcode(&db, &mut cart, &honey.barcode).await.unwrap();
        let response = scan_barcode(&db, &mut cart, &honey.barcode).await.unwrap();

        // Third scan is clamped to stock
        assert_eq!(response.items[0].quantity, 2);
        assert_eq!(response.totals.total_cents, 2400);
    }

    #[tokio::test]
    async fn test_scan_errors() {
        let db = test_db().await;
        let mut cart = Cart::new();

        let err = scan_barcode(&db, &mut cart, "123456789013").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidBarcode);
        assert_eq!(err.message, "Invalid check digit. Expected 2, got 3");

        let err = scan_barcode(&db, &mut cart, "123456789012").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let sold_out = create_product(&db, input("Pickled Beets", 550, 0)).await.unwrap();
        let err = scan_barcode(&db, &mut cart, &sold_out.barcode).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfStock);

        assert!(cart.is_empty());
    }

    #[test]
    fn test_check_and_generate() {
        assert!(check_barcode("123456789012").valid);

        let report = check_barcode("12345");
        assert!(!report.valid);
        assert_eq!(
            report.error.as_deref(),
            Some("Barcode must be exactly 12 digits, got 5")
        );

        let codes = generate_barcodes(3);
        assert_eq!(codes.len(), 3);
        for code in codes {
            assert!(barcode::validate(&barcode::strip_display(&code)).is_ok());
        }
    }
}
