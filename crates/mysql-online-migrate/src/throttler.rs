//! Pacing between chunks.
//!
//! The throttler owns two knobs: the stride (how many keys one chunk may
//! span) and the pause taken after each chunk that actually moved rows.
//! Passing it in as an explicit collaborator keeps the chunker testable
//! with a deterministic fake.

use std::time::Duration;

use async_trait::async_trait;

/// Default chunk size in keys.
pub const DEFAULT_STRIDE: u64 = 40_000;

/// Default pause between non-empty chunks.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// Supplies the chunk size and a pacing call invoked after non-empty chunks.
#[async_trait]
pub trait Throttler: Send + Sync {
    /// Maximum number of keys per chunk. Must be greater than zero.
    fn stride(&self) -> u64;

    /// Block until the next chunk may start. May be a no-op.
    async fn pace(&self);
}

/// Fixed-rate throttler: constant stride, constant pause.
#[derive(Debug, Clone)]
pub struct TimeThrottler {
    stride: u64,
    delay: Duration,
}

impl TimeThrottler {
    pub fn new(stride: u64, delay: Duration) -> Self {
        Self { stride, delay }
    }
}

impl Default for TimeThrottler {
    fn default() -> Self {
        Self::new(DEFAULT_STRIDE, DEFAULT_DELAY)
    }
}

#[async_trait]
impl Throttler for TimeThrottler {
    fn stride(&self) -> u64 {
        self.stride
    }

    async fn pace(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_throttler() {
        let throttler = TimeThrottler::default();
        assert_eq!(throttler.stride(), 40_000);
        assert_eq!(throttler.delay, Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_pace_sleeps_for_configured_delay() {
        tokio::time::pause();
        let throttler = TimeThrottler::new(1_000, Duration::from_secs(5));
        let before = tokio::time::Instant::now();
        throttler.pace().await;
        assert!(before.elapsed() >= Duration::from_secs(5));
    }
}
