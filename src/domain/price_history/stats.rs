//! Lookup counters for diagnostics.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counters shared by all clones of a client.
#[derive(Debug, Default)]
pub struct FetchStats {
    cache_hits: AtomicU64,
    fetches: AtomicU64,
    fetch_failures: AtomicU64,
    stale_served: AtomicU64,
    points_malformed: AtomicU64,
    outliers_removed: AtomicU64,
}

/// Point-in-time copy of [`FetchStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub cache_hits: u64,
    pub fetches: u64,
    pub fetch_failures: u64,
    pub stale_served: u64,
    pub points_malformed: u64,
    pub outliers_removed: u64,
}

impl FetchStats {
    pub(crate) fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stale(&self) {
        self.stale_served.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_malformed(&self, n: usize) {
        self.points_malformed.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_outliers(&self, n: usize) {
        self.outliers_removed.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            stale_served: self.stale_served.load(Ordering::Relaxed),
            points_malformed: self.points_malformed.load(Ordering::Relaxed),
            outliers_removed: self.outliers_removed.load(Ordering::Relaxed),
        }
    }
}
