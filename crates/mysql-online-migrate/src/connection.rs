//! Database access seam used by the chunked copy engine.
//!
//! The chunker only ever needs two operations: a single-value read (key
//! range discovery, sparse boundary lookup) and a write returning the
//! affected-row count. Both are expressed as a trait so tests can script a
//! fake connection, and so a caller wanting timeouts or cancellation can
//! wrap the real one.

use async_trait::async_trait;
use mysql_async::prelude::*;
use mysql_async::{Opts, OptsBuilder, Pool, PoolConstraints, PoolOpts};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::{MigrateError, Result};

/// Executes SQL on behalf of the chunker.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Run a single-value query, e.g. a min/max key lookup.
    ///
    /// "No rows" and SQL `NULL` both map to `None`, never an error.
    async fn select_scalar(&self, sql: &str) -> Result<Option<u64>>;

    /// Run a write statement and report the number of affected rows.
    ///
    /// Failures surface as errors, never a silent zero.
    async fn execute(&self, sql: &str) -> Result<u64>;
}

/// [`Connection`] implementation over a mysql_async pool.
pub struct MysqlConnection {
    pool: Pool,
}

impl MysqlConnection {
    /// Connect to MySQL and verify the connection with a ping.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let builder = OptsBuilder::default()
            .ip_or_hostname(&config.host)
            .tcp_port(config.port)
            .db_name(Some(&config.database))
            .user(Some(&config.user))
            .pass(Some(&config.password))
            // Use utf8mb4 for full Unicode support
            .init(vec!["SET NAMES utf8mb4"]);

        let constraints = PoolConstraints::new(1, config.max_connections.max(1))
            .ok_or_else(|| MigrateError::Config("invalid connection pool bounds".to_string()))?;
        let pool_opts = PoolOpts::new().with_constraints(constraints);

        let opts: Opts = builder.pool_opts(pool_opts).into();
        let pool = Pool::new(opts);

        // Test connection
        let mut conn = pool
            .get_conn()
            .await
            .map_err(|e| MigrateError::pool(e.to_string(), "creating MySQL pool"))?;
        conn.query_drop("SELECT 1")
            .await
            .map_err(|e| MigrateError::pool(e.to_string(), "testing MySQL connection"))?;
        drop(conn);

        info!(
            "Connected to MySQL: {}:{}/{}",
            config.host, config.port, config.database
        );

        Ok(Self { pool })
    }

    /// Close the connection pool.
    pub async fn close(&self) {
        self.pool.clone().disconnect().await.ok();
    }
}

#[async_trait]
impl Connection for MysqlConnection {
    async fn select_scalar(&self, sql: &str) -> Result<Option<u64>> {
        let mut conn = self
            .pool
            .get_conn()
            .await
            .map_err(|e| MigrateError::pool(e.to_string(), "getting MySQL connection"))?;

        // One row with a NULL value (e.g. MIN over an empty table) and zero
        // rows are the same "no value" outcome for callers.
        let value: Option<Option<u64>> = conn.query_first(sql).await?;
        Ok(value.flatten())
    }

    async fn execute(&self, sql: &str) -> Result<u64> {
        let mut conn = self
            .pool
            .get_conn()
            .await
            .map_err(|e| MigrateError::pool(e.to_string(), "getting MySQL connection"))?;

        conn.query_drop(sql).await?;
        Ok(conn.affected_rows())
    }
}
