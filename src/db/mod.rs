// Database module - the catalog store over SQLite

use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::ids::{IdGenerator, UlidGenerator};

pub mod models;
pub use models::*;

mod migrations;
mod question;
mod seed;
mod theme;

/// Handle to the catalog store.
///
/// Cloning is cheap and clones share the pool. Every operation borrows a
/// pooled connection for its own duration only, so two calls never share a
/// transaction.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
    ids: Arc<dyn IdGenerator>,
    // Serializes `seed_if_empty` across clones.
    seed_guard: Arc<Mutex<()>>,
}

impl Db {
    /// Opens (creating if missing) the database at `url`, which is an
    /// `sqlite:` URL, a `file:` path or a plain file path, and applies
    /// pending migrations.
    pub async fn new(url: &str) -> Result<Self> {
        Self::with_id_generator(url, Arc::new(UlidGenerator)).await
    }

    pub async fn with_id_generator(url: &str, ids: Arc<dyn IdGenerator>) -> Result<Self> {
        let options = if url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(url)?
        } else {
            let path = url.strip_prefix("file:").unwrap_or(url);
            SqliteConnectOptions::new().filename(path)
        };
        let options = options.create_if_missing(true).foreign_keys(true);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        // Verify connection
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await?;
        debug_assert_eq!(one, 1);

        migrations::run(&pool).await?;

        tracing::info!("database connection has been verified");

        Ok(Self {
            pool,
            ids,
            seed_guard: Arc::new(Mutex::new(())),
        })
    }

    pub async fn migration_applied(&self, version: &str) -> Result<bool> {
        Ok(migrations::is_applied(&self.pool, version).await?)
    }

    /// Waits for in-flight operations and closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
