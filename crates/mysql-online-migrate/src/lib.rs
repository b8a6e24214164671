//! # mysql-online-migrate
//!
//! Chunked copy engine for online MySQL table migrations.
//!
//! This library moves all rows from a live origin table into a
//! schema-migrated destination table while the origin stays writable, with
//! support for:
//!
//! - **Chunked transfer**: the primary-key space is walked in bounded
//!   `[lowest, highest]` intervals, dense (arithmetic) or sparse
//!   (boundary-discovered) depending on the key distribution
//! - **Idempotent copy**: each chunk is a single duplicate-tolerant
//!   `INSERT IGNORE ... SELECT`, safe to rerun and safe alongside
//!   concurrent trigger replication
//! - **Throttling**: configurable stride and pacing between non-empty
//!   chunks to protect the live database
//! - **Resumability**: explicit start/limit overrides re-enter an
//!   interrupted run without recopying damage
//!
//! ## Example
//!
//! ```rust,no_run
//! use mysql_online_migrate::{Chunker, ChunkerOptions, Config, MysqlConnection};
//!
//! #[tokio::main]
//! async fn main() -> mysql_online_migrate::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let connection = MysqlConnection::connect(&config.database).await?;
//!     let migration = config.copy.migration()?;
//!     let throttler = config.copy.throttler();
//!
//!     let chunker = Chunker::new(
//!         &migration,
//!         &connection,
//!         ChunkerOptions {
//!             start: config.copy.start,
//!             limit: config.copy.limit,
//!             throttler: Some(&throttler),
//!             autoincrementing: config.copy.autoincrementing,
//!         },
//!     )
//!     .await?;
//!
//!     let stats = chunker.run().await?;
//!     println!("Copied {} rows in {} chunks", stats.rows_copied, stats.chunks);
//!     Ok(())
//! }
//! ```

pub mod chunker;
pub mod config;
pub mod connection;
pub mod error;
pub mod identifier;
pub mod migration;
pub mod throttler;

// Re-exports for convenient access
pub use chunker::{ChunkRange, Chunker, ChunkerOptions, ChunkerStats};
pub use config::{ColumnSpec, Config, CopyConfig, DatabaseConfig};
pub use connection::{Connection, MysqlConnection};
pub use error::{MigrateError, Result};
pub use migration::{ColumnIntersection, CopyColumn, Migration, TableRef};
pub use throttler::{Throttler, TimeThrottler};
