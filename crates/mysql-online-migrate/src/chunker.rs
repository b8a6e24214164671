//! Chunk-wise copy of an origin table into its migrated destination.
//!
//! The chunker walks the origin table's primary-key space in bounded
//! `[lowest, highest]` intervals and copies each interval with a single
//! duplicate-tolerant `INSERT IGNORE ... SELECT`. The origin stays writable
//! throughout: concurrent trigger replication and chunk retries are both
//! safe because re-inserting a row that already exists is a no-op and never
//! overwrites it.
//!
//! Two boundary strategies cover the two kinds of key spaces:
//!
//! - **Dense** (`autoincrementing = true`): boundaries are pure arithmetic
//!   over `[start, limit]`. No extra queries; gaps just produce chunks that
//!   copy zero rows.
//! - **Sparse**: each chunk's bounds are discovered from the keys that
//!   actually exist, at the cost of scalar boundary queries per chunk.
//!   Correct under arbitrary gaps, including filtered or non-sequential
//!   key spaces.

use tracing::{debug, info};

use crate::connection::Connection;
use crate::error::{MigrateError, Result};
use crate::migration::Migration;
use crate::throttler::{Throttler, DEFAULT_STRIDE};

/// Closed interval of primary-key values copied by one statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub lowest: u64,
    pub highest: u64,
}

/// Options for a chunked copy run.
pub struct ChunkerOptions<'a> {
    /// First key to copy. Defaults to the origin's minimum key.
    pub start: Option<u64>,

    /// Last key to copy. Defaults to the origin's maximum key.
    pub limit: Option<u64>,

    /// Pacing collaborator. Absent means the default stride and no pacing.
    pub throttler: Option<&'a dyn Throttler>,

    /// Whether keys can be assumed contiguous. Turn off only when the key
    /// space has large gaps.
    pub autoincrementing: bool,
}

impl Default for ChunkerOptions<'_> {
    fn default() -> Self {
        Self {
            start: None,
            limit: None,
            throttler: None,
            autoincrementing: true,
        }
    }
}

/// Totals reported by a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkerStats {
    /// Number of copy statements issued.
    pub chunks: u64,
    /// Total rows inserted into the destination.
    pub rows_copied: u64,
}

/// Copies origin rows into the destination in chunks of `stride` keys.
///
/// A chunker is constructed once per migration run (or once per resumed
/// segment) and consumed by [`run`](Chunker::run); it is not reused across
/// table pairs.
pub struct Chunker<'a, C: Connection> {
    migration: &'a Migration,
    connection: &'a C,
    throttler: Option<&'a dyn Throttler>,
    autoincrementing: bool,
    start: Option<u64>,
    limit: Option<u64>,
}

impl<'a, C: Connection> Chunker<'a, C> {
    /// Build a chunker, resolving the key range to copy.
    ///
    /// Explicit `start`/`limit` overrides win; otherwise the bounds come
    /// from `SELECT MIN/MAX` on the origin's primary key. An empty table
    /// leaves a bound unset, which is not an error - the run is a no-op.
    pub async fn new(
        migration: &'a Migration,
        connection: &'a C,
        options: ChunkerOptions<'a>,
    ) -> Result<Chunker<'a, C>> {
        let start = match options.start {
            Some(start) => Some(start),
            None => {
                connection
                    .select_scalar(&select_start_sql(migration))
                    .await?
            }
        };
        let limit = match options.limit {
            Some(limit) => Some(limit),
            None => {
                connection
                    .select_scalar(&select_limit_sql(migration))
                    .await?
            }
        };

        Ok(Self {
            migration,
            connection,
            throttler: options.throttler,
            autoincrementing: options.autoincrementing,
            start,
            limit,
        })
    }

    /// Resolved first key, if the origin has one.
    pub fn start(&self) -> Option<u64> {
        self.start
    }

    /// Resolved last key, if the origin has one.
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Copy every origin row in `[start, limit]` that passes the row filter.
    ///
    /// Fails fast: an impossible range is rejected before any chunk is
    /// computed, and the first SQL error aborts the remaining sequence.
    /// Retry of an interrupted run is the caller's concern - re-invoking
    /// with an explicit `start` is safe because the copy is idempotent.
    pub async fn run(self) -> Result<ChunkerStats> {
        self.validate()?;

        let (start, limit) = match (self.start, self.limit) {
            (Some(start), Some(limit)) => (start, limit),
            _ => {
                info!(
                    "{}: origin table is empty, nothing to copy",
                    self.migration.origin_name()
                );
                return Ok(ChunkerStats::default());
            }
        };

        let stride = self
            .throttler
            .map(|t| t.stride())
            .unwrap_or(DEFAULT_STRIDE);
        if stride == 0 {
            return Err(MigrateError::Config(
                "throttler stride must be greater than zero".to_string(),
            ));
        }

        debug!(
            "{}: copying keys [{}, {}] to {} (stride {}, {})",
            self.migration.origin_name(),
            start,
            limit,
            self.migration.destination_name(),
            stride,
            if self.autoincrementing {
                "dense"
            } else {
                "sparse"
            },
        );

        let mut stats = ChunkerStats::default();
        let mut cursor = Some(start);

        while let Some(lowest) = cursor {
            if lowest > limit {
                break;
            }

            let range = if self.autoincrementing {
                Some(ChunkRange {
                    lowest,
                    highest: dense_top(lowest, stride, limit),
                })
            } else {
                self.next_sparse_range(lowest, limit, stride).await?
            };

            // Sparse mode: no remaining key in range means a trailing gap;
            // the run is complete even though the cursor is below the limit.
            let Some(range) = range else {
                break;
            };

            let affected = self.connection.execute(&self.copy_sql(range)).await?;
            stats.chunks += 1;
            stats.rows_copied += affected;

            debug!(
                "{}: chunk {} [{}, {}] copied {} rows",
                self.migration.origin_name(),
                stats.chunks,
                range.lowest,
                range.highest,
                affected
            );

            // Empty chunks placed no load on the database and take no pause.
            if affected > 0 {
                if let Some(throttler) = self.throttler {
                    throttler.pace().await;
                }
            }

            cursor = range.highest.checked_add(1);
        }

        info!(
            "{}: copy complete, {} rows in {} chunks",
            self.migration.origin_name(),
            stats.rows_copied,
            stats.chunks
        );

        Ok(stats)
    }

    fn validate(&self) -> Result<()> {
        if let (Some(start), Some(limit)) = (self.start, self.limit) {
            if start > limit {
                return Err(MigrateError::Config(
                    "impossible chunk options (limit must be greater than start)".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Discover the next chunk from the keys that actually exist.
    ///
    /// The lower bound snaps to the smallest remaining key so that both
    /// bounds always name real rows; the upper bound is the largest key
    /// among the next `stride` rows from there, never past `limit`.
    async fn next_sparse_range(
        &self,
        lowest: u64,
        limit: u64,
        stride: u64,
    ) -> Result<Option<ChunkRange>> {
        let next_key = self
            .connection
            .select_scalar(&self.next_key_sql(lowest, limit))
            .await?;
        let Some(bottom) = next_key else {
            return Ok(None);
        };

        // A concurrent delete can race the two lookups; falling back to a
        // single-key chunk keeps the cursor moving.
        let highest = self
            .connection
            .select_scalar(&self.boundary_sql(bottom, limit, stride))
            .await?
            .unwrap_or(bottom);

        Ok(Some(ChunkRange {
            lowest: bottom,
            highest,
        }))
    }

    fn next_key_sql(&self, lowest: u64, limit: u64) -> String {
        let key = self.migration.origin_key();
        format!(
            "SELECT MIN({key}) FROM {origin} WHERE {key} >= {lowest} AND {key} <= {limit}",
            key = key,
            origin = self.migration.origin_table(),
            lowest = lowest,
            limit = limit,
        )
    }

    fn boundary_sql(&self, bottom: u64, limit: u64, stride: u64) -> String {
        let key = self.migration.origin_key();
        format!(
            "SELECT MAX({key}) FROM (SELECT {key} FROM {origin} WHERE {key} >= {bottom} \
             AND {key} <= {limit} ORDER BY {key} LIMIT {stride}) AS chunk",
            key = key,
            origin = self.migration.origin_table(),
            bottom = bottom,
            limit = limit,
            stride = stride,
        )
    }

    fn copy_sql(&self, range: ChunkRange) -> String {
        let filter = match self.migration.conditions() {
            Some(conditions) => format!("WHERE ({}) AND ", conditions),
            None => "WHERE ".to_string(),
        };
        format!(
            "INSERT IGNORE INTO {destination} ({columns}) SELECT {select_columns} \
             FROM {origin} {filter}{origin}.{key} BETWEEN {lowest} AND {highest}",
            destination = self.migration.destination_table(),
            columns = self.migration.insert_columns(),
            select_columns = self.migration.select_columns(),
            origin = self.migration.origin_table(),
            filter = filter,
            key = self.migration.origin_key(),
            lowest = range.lowest,
            highest = range.highest,
        )
    }
}

/// Upper bound of a dense chunk starting at `lowest`, clamped to `limit`.
fn dense_top(lowest: u64, stride: u64, limit: u64) -> u64 {
    lowest.saturating_add(stride - 1).min(limit)
}

fn select_start_sql(migration: &Migration) -> String {
    format!(
        "SELECT MIN({key}) FROM {origin}",
        key = migration.origin_key(),
        origin = migration.origin_table(),
    )
}

fn select_limit_sql(migration: &Migration) -> String {
    format!(
        "SELECT MAX({key}) FROM {origin}",
        key = migration.origin_key(),
        origin = migration.origin_table(),
    )
}
