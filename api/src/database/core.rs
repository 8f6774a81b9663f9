use super::types::Database;
use anyhow::{Context, Result};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::str::FromStr;

impl Database {
    /// Open the catalog at `database_url` and bring its schema up to date
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("Failed to open catalog at {}", database_url))?;
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, running pending migrations on it
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!()
            .run(&pool)
            .await
            .context("Failed to run catalog migrations")?;
        tracing::debug!("Catalog migrations applied");
        Ok(Self { pool })
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
