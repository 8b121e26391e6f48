//! # Collection Store
//!
//! Reads and writes whole collections as JSON arrays in `kv_store`.
//!
//! ```text
//! kv_store
//! ┌───────────────┬──────────────────────────────┬──────────────────────┐
//! │ key           │ value                        │ updated_at           │
//! ├───────────────┼──────────────────────────────┼──────────────────────┤
//! │ farm_products │ [{"id":"…","name":"Eggs"…}]  │ 2024-06-01T09:00:00Z │
//! │ farm_sales    │ [{"id":"…","items":[…]…}]    │ 2024-06-01T09:05:12Z │
//! └───────────────┴──────────────────────────────┴──────────────────────┘
//! ```
//!
//! A missing row reads as an empty collection. Both helpers take any SQLite
//! executor so they run equally against the pool or inside a transaction.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Executor, Sqlite};
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Storage key for the product catalog.
pub const PRODUCTS_KEY: &str = "farm_products";

/// Storage key for the sales history.
pub const SALES_KEY: &str = "farm_sales";

/// Loads the collection stored under `key`.
pub async fn load<'e, E, T>(executor: E, key: &str) -> DbResult<Vec<T>>
where
    E: Executor<'e, Database = Sqlite>,
    T: DeserializeOwned,
{
    let raw: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
        .bind(key.to_string())
        .fetch_optional(executor)
        .await?;

    match raw {
        Some(json) => serde_json::from_str(&json).map_err(|e| DbError::corrupt(key, e)),
        None => Ok(Vec::new()),
    }
}

/// Replaces the collection stored under `key`.
pub async fn store<'e, E, T>(executor: E, key: &str, items: &[T]) -> DbResult<()>
where
    E: Executor<'e, Database = Sqlite>,
    T: Serialize,
{
    let json = serde_json::to_string(items).map_err(|e| DbError::Internal(e.to_string()))?;
    let bytes = json.len();

    sqlx::query(
        r#"
        INSERT INTO kv_store (key, value, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(key.to_string())
    .bind(json)
    .bind(Utc::now().to_rfc3339())
    .execute(executor)
    .await?;

    debug!(key = %key, count = items.len(), bytes, "Collection written");
    Ok(())
}
