//! # Database Handle
//!
//! Opens the register's SQLite file and hands out repositories.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      farmstand.db                                       │
//! │                                                                         │
//! │  kv_store                                                               │
//! │  ┌───────────────┬──────────────────────────────┬────────────────────┐ │
//! │  │ key           │ value                        │ updated_at         │ │
//! │  ├───────────────┼──────────────────────────────┼────────────────────┤ │
//! │  │ farm_products │ [Product, Product, …] (JSON) │ 2024-06-01T09:05Z  │ │
//! │  │ farm_sales    │ [Sale, Sale, …]       (JSON) │ 2024-06-01T09:05Z  │ │
//! │  └───────────────┴──────────────────────────────┴────────────────────┘ │
//! │                                                                         │
//! │  products() ──► ProductRepository   (read/modify/write farm_products)  │
//! │  sales()    ──► SaleRepository      (read farm_sales)                  │
//! │  apply_sale ──► both keys in one transaction                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File-backed databases use SQLite WAL (Write-Ahead Logging) so a second
//! register process can read while the first writes. In-memory databases
//! keep SQLite's default journal.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::kv::{self, PRODUCTS_KEY, SALES_KEY};
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use farmstand_core::{CompletedSale, Product, Sale};

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the register keeps its data and how the pool is sized.
///
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/farmstand.db").max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, or `:memory:`.
    pub database_path: PathBuf,

    /// Default 4. A register does one thing at a time; the rest serve
    /// a concurrent reader such as the seed tool.
    pub max_connections: u32,

    /// How long to wait for a free connection before giving up.
    pub acquire_timeout: Duration,

    /// Default true.
    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed config. The file is created on first connect.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 4,
            acquire_timeout: Duration::from_secs(10),
            run_migrations: true,
        }
    }

    /// Throwaway database for tests. Every connection to `:memory:` is a
    /// separate database, so the pool is pinned to one.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cheap to clone; clones share the pool.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./farmstand.db")).await?;
///
/// let catalog = db.products().list().await?;
/// db.apply_sale(&cart.complete_sale()?).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl Database {
    /// Connects and, unless disabled, brings the schema up to date.
    ///
    /// ## Returns
    /// * `Ok(Database)` - connected and migrated
    /// * `Err(DbError::ConnectionFailed)` - file unreadable, bad path
    /// * `Err(DbError::MigrationFailed)` - schema could not be applied
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening database");

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&config.database_path)
                // Readers don't block the writer
                .journal_mode(SqliteJournalMode::Wal)
                // May lose the last transaction on power loss, never corrupts
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        let pool_options = SqlitePoolOptions::new().acquire_timeout(config.acquire_timeout);
        // An in-memory database lives and dies with its one connection,
        // whatever the config asked for
        let (pool_options, max_connections) = if config.is_in_memory() {
            let options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            (options, 1)
        } else {
            let max = config.max_connections.max(1);
            (pool_options.max_connections(max), max)
        };

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(max_connections, "Pool ready");

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Raw pool, for callers that need the key/value layer directly.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    /// Records a completed sale and takes its units out of stock, atomically.
    ///
    /// ## Apply Flow
    /// ```text
    /// BEGIN
    ///   farm_products ──► stock -= qty for each decrement
    ///                     (missing product: skipped, logged)
    ///                     (stock < qty: InsufficientStock, ROLLBACK)
    ///   farm_sales    ──► push sale
    /// COMMIT
    /// ```
    ///
    /// Either both collections change or neither does.
    pub async fn apply_sale(&self, completed: &CompletedSale) -> DbResult<()> {
        let sale = &completed.sale;
        let mut tx = self.pool.begin().await?;

        let mut products: Vec<Product> = kv::load(&mut *tx, PRODUCTS_KEY).await?;
        for decrement in &completed.stock_decrements {
            let Some(product) = products.iter_mut().find(|p| p.id == decrement.product_id) else {
                warn!(
                    sale_id = %sale.id(),
                    product_id = %decrement.product_id,
                    "Sold product no longer in catalog, stock not adjusted"
                );
                continue;
            };

            if product.stock < decrement.quantity {
                return Err(DbError::InsufficientStock {
                    product_id: product.id.clone(),
                    available: product.stock,
                    requested: decrement.quantity,
                });
            }
            product.stock -= decrement.quantity;
        }

        let mut sales: Vec<Sale> = kv::load(&mut *tx, SALES_KEY).await?;
        if sales.iter().any(|s| s.id() == sale.id()) {
            return Err(DbError::duplicate("sale id", sale.id()));
        }
        sales.push(sale.clone());

        kv::store(&mut *tx, PRODUCTS_KEY, &products).await?;
        kv::store(&mut *tx, SALES_KEY, &sales).await?;
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            sale_id = %sale.id(),
            total = %sale.total_amount(),
            lines = sale.items().len(),
            "Sale applied"
        );
        Ok(())
    }

    /// Waits for in-flight queries, then closes every connection.
    pub async fn close(&self) {
        debug!("Closing database pool");
        self.pool.close().await;
    }

    /// True when a trivial query round-trips.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
