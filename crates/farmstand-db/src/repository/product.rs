//! # Product Repository
//!
//! Catalog operations over the `farm_products` collection.
//!
//! ## Key Operations
//! - Lookup by id or by scanned barcode
//! - Upsert and delete
//!
//! ## Scan Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How a Scan Finds a Product                           │
//! │                                                                         │
//! │  Scanner reads: " 036000291452\n"                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  barcode::validate() → Barcode("036000291452")  (register)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  find_by_barcode(&barcode) ← THIS MODULE                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  farm_products: [Eggs 0360…1452 ← MATCH!, Honey 5123…0098, …]          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes are read-modify-write of the whole collection inside one
//! transaction.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::kv::{self, PRODUCTS_KEY};
use farmstand_core::{Barcode, Product};

/// Repository for catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.get_by_id("uuid-here").await?;
/// let scanned = repo.find_by_barcode(&barcode).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        kv::load(&self.pool, PRODUCTS_KEY).await
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let products = self.list().await?;
        Ok(products.into_iter().find(|p| p.id == id))
    }

    /// Finds the product carrying a (validated) barcode.
    pub async fn find_by_barcode(&self, barcode: &Barcode) -> DbResult<Option<Product>> {
        debug!(barcode = %barcode, "Looking up product by barcode");

        let products = self.list().await?;
        Ok(products.into_iter().find(|p| &p.barcode == barcode))
    }

    /// Inserts a product, or replaces the stored product with the same id.
    ///
    /// ## Errors
    /// * `UniqueViolation` - another product already carries this barcode
    pub async fn save(&self, product: &Product) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        let mut products: Vec<Product> = kv::load(&mut *tx, PRODUCTS_KEY).await?;

        if products
            .iter()
            .any(|p| p.barcode == product.barcode && p.id != product.id)
        {
            return Err(DbError::duplicate("barcode", product.barcode.as_str()));
        }

        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => {
                *existing = product.clone();
                debug!(product_id = %product.id, "Product updated");
            }
            None => {
                products.push(product.clone());
                info!(product_id = %product.id, name = %product.name, "Product added");
            }
        }

        kv::store(&mut *tx, PRODUCTS_KEY, &products).await?;
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        Ok(())
    }

    /// Removes a product and returns it.
    ///
    /// Past sales keep their own name and price snapshots, so history is
    /// unaffected.
    pub async fn delete(&self, id: &str) -> DbResult<Product> {
        let mut tx = self.pool.begin().await?;
        let mut products: Vec<Product> = kv::load(&mut *tx, PRODUCTS_KEY).await?;

        let pos = products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DbError::not_found("Product", id))?;
        let removed = products.remove(pos);

        kv::store(&mut *tx, PRODUCTS_KEY, &products).await?;
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(product_id = %id, name = %removed.name, "Product deleted");
        Ok(removed)
    }

    /// Counts products in the catalog.
    pub async fn count(&self) -> DbResult<usize> {
        Ok(self.list().await?.len())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use farmstand_core::NewProduct;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn product(name: &str, price_cents: i64, stock: i64) -> Product {
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
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let db = test_db().await;
        let eggs = product("Eggs (dozen)", 450, 12);

        db.products().save(&eggs).await.unwrap();

        let found = db.products().get_by_id(&eggs.id).await.unwrap();
        assert_eq!(found, Some(eggs));
        assert!(db.products().get_by_id("missing").await.unwrap().is_none());
        assert_eq!(db.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_save_replaces_existing() {
        let db = test_db().await;
        let mut honey = product("Raw Honey", 1200, 5);
        db.products().save(&honey).await.unwrap();

        honey.set_stock(2).unwrap();
        db.products().save(&honey).await.unwrap();

        let all = db.products().list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].stock, 2);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let db = test_db().await;
        for name in ["Kale", "Beets", "Apples"] {
            db.products().save(&product(name, 300, 1)).await.unwrap();
        }

        let names: Vec<String> = db
            .products()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Kale", "Beets", "Apples"]);
    }

    #[tokio::test]
    async fn test_find_by_barcode() {
        let db = test_db().await;
        let jam = product("Strawberry Jam", 650, 8);
        db.products().save(&jam).await.unwrap();
        db.products().save(&product("Bread", 500, 3)).await.unwrap();

        let found = db.products().find_by_barcode(&jam.barcode).await.unwrap();
        assert_eq!(found.map(|p| p.id), Some(jam.id));

        let unknown: Barcode = "036000291452".parse().unwrap();
        assert!(db.products().find_by_barcode(&unknown).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_barcode_rejected() {
        let db = test_db().await;
        let first = product("Eggs", 450, 12);
        let mut second = product("Duck Eggs", 700, 6);
        second.barcode = first.barcode.clone();

        db.products().save(&first).await.unwrap();
        let err = db.products().save(&second).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(db.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let kale = product("Kale", 300, 4);
        db.products().save(&kale).await.unwrap();

        let removed = db.products().delete(&kale.id).await.unwrap();
        assert_eq!(removed.name, "Kale");
        assert_eq!(db.products().count().await.unwrap(), 0);

        let err = db.products().delete(&kale.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
