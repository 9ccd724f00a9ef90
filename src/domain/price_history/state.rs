//! Per-item price history cache: owned by the client, lazily expired.

use super::PricePoint;
use crate::config::DEFAULT_CACHE_TTL;
use crate::shared::ItemId;

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// One fetched batch and when it was fetched. Replaced wholesale on refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub data: Vec<PricePoint>,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.fetched_at)
    }

    /// Fresh iff `now < fetched_at + ttl`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age(now) < ttl
    }
}

/// Cache state of one item, evaluated at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Freshness {
    Absent,
    Fresh,
    Stale,
}

/// Item id → last fetched batch. No size-based eviction; expiry is purely
/// time-driven and checked on read.
#[derive(Debug, Clone)]
pub struct PriceHistoryCache {
    entries: HashMap<ItemId, CacheEntry>,
    ttl: Duration,
}

impl Default for PriceHistoryCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_CACHE_TTL.as_secs() as i64))
    }
}

impl PriceHistoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The entry regardless of age.
    pub fn get(&self, item_id: &ItemId) -> Option<&CacheEntry> {
        self.entries.get(item_id)
    }

    /// The entry only if it is still fresh at `now`.
    pub fn get_fresh(&self, item_id: &ItemId, now: DateTime<Utc>) -> Option<&CacheEntry> {
        self.entries
            .get(item_id)
            .filter(|entry| entry.is_fresh(now, self.ttl))
    }

    pub fn freshness(&self, item_id: &ItemId, now: DateTime<Utc>) -> Freshness {
        match self.entries.get(item_id) {
            None => Freshness::Absent,
            Some(entry) if entry.is_fresh(now, self.ttl) => Freshness::Fresh,
            Some(_) => Freshness::Stale,
        }
    }

    /// Replace the entry for `item_id`.
    pub fn store(&mut self, item_id: ItemId, data: Vec<PricePoint>, fetched_at: DateTime<Utc>) {
        self.entries
            .insert(item_id, CacheEntry { data, fetched_at });
    }

    pub fn remove(&mut self, item_id: &ItemId) -> Option<CacheEntry> {
        self.entries.remove(item_id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
