//! Configuration types.

use serde::{Deserialize, Serialize};

use crate::throttler;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// MySQL connection coordinates.
    pub database: DatabaseConfig,

    /// What to copy and how hard to push the live database.
    pub copy: CopyConfig,
}

/// MySQL connection coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub database: String,

    pub user: String,

    /// Never serialized back out.
    #[serde(default, skip_serializing)]
    pub password: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

/// Parameters of one chunked copy run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyConfig {
    /// Origin (live) table.
    pub origin: String,

    /// Destination (schema-migrated) table.
    pub destination: String,

    /// Integer primary-key column shared by both tables.
    #[serde(default = "default_primary_key")]
    pub primary_key: String,

    /// Columns present in both tables.
    pub columns: Vec<ColumnSpec>,

    /// Optional row filter; rows failing it are not copied.
    #[serde(default)]
    pub conditions: Option<String>,

    /// Resume from this key instead of the origin minimum.
    #[serde(default)]
    pub start: Option<u64>,

    /// Stop at this key instead of the origin maximum.
    #[serde(default)]
    pub limit: Option<u64>,

    /// Dense arithmetic boundaries (auto-increment keys) when true,
    /// per-chunk boundary discovery when false.
    #[serde(default = "default_autoincrementing")]
    pub autoincrementing: bool,

    /// Keys per chunk.
    #[serde(default = "default_stride")]
    pub stride: u64,

    /// Pause between non-empty chunks, in milliseconds.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
}

/// A copied column: a plain name, or a name plus an origin-side select
/// expression for columns whose definition changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSpec {
    Name(String),
    Cast { name: String, select_expr: String },
}

fn default_port() -> u16 {
    3306
}

fn default_max_connections() -> usize {
    4
}

fn default_primary_key() -> String {
    "id".to_string()
}

fn default_autoincrementing() -> bool {
    true
}

fn default_stride() -> u64 {
    throttler::DEFAULT_STRIDE
}

fn default_throttle_ms() -> u64 {
    100
}
