//! # Sale Repository
//!
//! Read access to the `farm_sales` history.
//!
//! Sales are only ever written by
//! [`Database::apply_sale`](crate::Database::apply_sale), together with
//! their stock changes.

use sqlx::SqlitePool;

use crate::error::DbResult;
use crate::repository::kv::{self, SALES_KEY};
use farmstand_core::Sale;

/// Repository for the sales history.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists sales in the order they were recorded.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        kv::load(&self.pool, SALES_KEY).await
    }

    /// Gets a sale by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sales = self.list().await?;
        Ok(sales.into_iter().find(|s| s.id() == id))
    }

    /// Counts recorded sales.
    pub async fn count(&self) -> DbResult<usize> {
        Ok(self.list().await?.len())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
