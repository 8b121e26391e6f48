//! # Migrations
//!
//! The schema is one table, `kv_store`, so the migration list is short.
//! It still goes through `sqlx::migrate!` so later schema changes (an
//! index, a per-sale table) land the same way on every register.
//!
//! ```text
//! Database::new ──► MIGRATOR.run ──► _sqlx_migrations
//!                                     └── 001_key_value_store ✓
//! ```
//!
//! New migrations get the next `NNN_` prefix in `migrations/sqlite/`.
//! Applied files are checksummed, so never edit one after release.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies whatever hasn't been applied yet, in filename order.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;

    let (known, applied) = migration_status(pool).await?;
    info!(known, applied, "Schema up to date");
    Ok(())
}

/// `(known, applied)`. A database that was never migrated reports 0
/// applied rather than an error.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}
