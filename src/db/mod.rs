use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{NewProduct, Product};

pub mod memory;
pub mod postgres;

pub use memory::MemoryGateway;
pub use postgres::PgGateway;

/// Data access for the `products` table. Each write commits on its own.
#[async_trait]
pub trait ProductGateway: Send + Sync {
    async fn insert(&self, product: &NewProduct) -> AppResult<Product>;

    /// Every product, in id order.
    async fn fetch_all(&self) -> AppResult<Vec<Product>>;

    /// `None` when no row has this id.
    async fn fetch_by_id(&self, id: i64) -> AppResult<Option<Product>>;

    /// Write a modified, previously fetched product back to the store.
    async fn update(&self, product: &Product) -> AppResult<Product>;

    /// Returns `false` if no row was removed.
    async fn delete(&self, id: i64) -> AppResult<bool>;

    /// Trivial round trip used by the readiness probe.
    async fn ping(&self) -> AppResult<()>;
}

pub const MEMORY_URL: &str = "memory://";

/// Open the gateway named by `DATABASE_URL`.
pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn ProductGateway>> {
    if config.database_url == MEMORY_URL {
        info!("Using in-process product store.");
        return Ok(Arc::new(MemoryGateway::new()));
    }

    info!("Connecting to PostgreSQL...");
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    info!("Database connection pool established.");

    info!("Running migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations complete.");

    Ok(Arc::new(PgGateway::new(pool)))
}
