//! Price history domain: time-series points, parsing, outlier filtering, cache.

pub mod client;
pub mod filter;
pub mod range;
pub mod state;
pub mod stats;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use filter::{filter_outliers, FilterOutcome};
pub use range::PriceRange;
pub use state::{CacheEntry, Freshness, PriceHistoryCache};
pub use stats::{FetchStats, StatsSnapshot};
pub use wire::{parse_timeseries, ParsedSeries};

/// One bucket of the remote time series.
///
/// Both prices are always positive once a point has left the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    /// Bucket start, whole seconds.
    #[serde(with = "crate::shared::serde_util::timestamp_secs")]
    pub timestamp: DateTime<Utc>,
    pub avg_high_price: u64,
    pub avg_low_price: u64,
    #[serde(rename = "highPriceVolume")]
    pub high_volume: u64,
    #[serde(rename = "lowPriceVolume")]
    pub low_volume: u64,
}

impl PricePoint {
    /// Spread between the instant-buy and instant-sell averages.
    pub fn margin(&self) -> i64 {
        self.avg_high_price as i64 - self.avg_low_price as i64
    }

    pub fn total_volume(&self) -> u64 {
        self.high_volume.saturating_add(self.low_volume)
    }
}

/// Where the points of a lookup came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupSource {
    /// Fresh cache hit, no network call.
    Cache,
    /// Fetched during this call.
    Fresh,
    /// Fetch failed; an expired entry was served.
    Stale,
    /// Fetch failed and nothing was cached.
    Empty,
}

/// Result of a price history lookup, with provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistoryLookup {
    pub points: Vec<PricePoint>,
    pub source: LookupSource,
    /// When the served data was fetched. `None` for [`LookupSource::Empty`].
    pub fetched_at: Option<DateTime<Utc>>,
}

impl PriceHistoryLookup {
    pub(crate) fn empty() -> Self {
        Self {
            points: Vec::new(),
            source: LookupSource::Empty,
            fetched_at: None,
        }
    }

    pub(crate) fn from_entry(entry: &CacheEntry, source: LookupSource) -> Self {
        Self {
            points: entry.data.clone(),
            source,
            fetched_at: Some(entry.fetched_at),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
