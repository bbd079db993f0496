//! Call pacing for rate-limited partner APIs.
//!
//! A fixed per-call gap plus a longer pause each time a new batch starts, approximating a
//! token bucket of roughly one call per second. Waiting is done with
//! `tokio::time::sleep_until` against a scheduled deadline, so no runtime thread is held.
//!
//! For `N` calls with item delay `D`, batch size `B` and batch delay `S`, the first call is
//! immediate and the last one starts no earlier than `(N-1)*D + floor((N-1)/B)*S`.

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacingConfig {
    pub batch_size: usize,
    pub item_delay: Duration,
    pub batch_delay: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            item_delay: Duration::from_secs(1),
            batch_delay: Duration::from_secs(10),
        }
    }
}

impl PacingConfig {
    /// No waiting at all (tests, dry runs).
    pub fn immediate() -> Self {
        Self {
            batch_size: usize::MAX,
            item_delay: Duration::ZERO,
            batch_delay: Duration::ZERO,
        }
    }
}

pub struct Pacer {
    config: PacingConfig,
    issued: usize,
    next_at: Option<Instant>,
}

impl Pacer {
    pub fn new(config: PacingConfig) -> Self {
        Self {
            config,
            issued: 0,
            next_at: None,
        }
    }

    /// Wait until the next call may start, then reserve the slot after it.
    pub async fn ready(&mut self) {
        if let Some(at) = self.next_at {
            sleep_until(at).await;
        }

        self.issued += 1;

        let mut gap = self.config.item_delay;
        if self.issued % self.config.batch_size.max(1) == 0 {
            tracing::debug!(issued = self.issued, "Batch complete, pausing before next batch");
            gap += self.config.batch_delay;
        }
        self.next_at = Some(Instant::now() + gap);
    }

    /// Number of calls let through so far.
    pub fn issued(&self) -> usize {
        self.issued
    }
}
