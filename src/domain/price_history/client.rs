//! Price history sub-client: cached lookups with stale fallback.

use super::{filter, wire, CacheEntry, Freshness, LookupSource, PriceHistoryLookup, PricePoint};
use crate::client::PriceHistoryClient;
use crate::error::PriceHistoryError;
use crate::shared::ItemId;

use chrono::{DateTime, Utc};

/// Sub-client for price history operations.
pub struct PriceHistory<'a> {
    pub(crate) client: &'a PriceHistoryClient,
}

impl<'a> PriceHistory<'a> {
    /// Price history for `item_id`, ascending by timestamp.
    ///
    /// Total: a fresh cache hit is returned without a network call; otherwise
    /// the series is refetched, and if that fails the last cached series (or
    /// an empty one) is returned instead of an error.
    pub async fn get(&self, item_id: ItemId) -> Vec<PricePoint> {
        self.get_detailed(item_id).await.points
    }

    /// Like [`get`](Self::get), but reports where the points came from.
    pub async fn get_detailed(&self, item_id: ItemId) -> PriceHistoryLookup {
        if let Some(hit) = self.fresh_hit(item_id).await {
            return hit;
        }

        // Concurrent misses for the same item queue here; whoever gets the
        // gate second finds the first caller's result in the cache.
        let gate = self.client.gate(item_id);
        let _guard = gate.lock().await;
        match self.fresh_hit(item_id).await {
            Some(hit) => hit,
            None => self.refresh(item_id).await,
        }
    }

    /// Cached entry regardless of age. Never touches the network.
    pub async fn peek(&self, item_id: ItemId) -> Option<CacheEntry> {
        self.client.cache.read().await.get(&item_id).cloned()
    }

    pub async fn freshness(&self, item_id: ItemId) -> Freshness {
        let now = self.client.clock.now();
        self.client.cache.read().await.freshness(&item_id, now)
    }

    /// Drop the cached entry for one item so the next lookup refetches.
    pub async fn invalidate(&self, item_id: ItemId) {
        self.client.cache.write().await.remove(&item_id);
    }

    pub async fn clear_cache(&self) {
        self.client.cache.write().await.clear();
    }

    async fn fresh_hit(&self, item_id: ItemId) -> Option<PriceHistoryLookup> {
        let now = self.client.clock.now();
        let cache = self.client.cache.read().await;
        let entry = cache.get_fresh(&item_id, now)?;
        tracing::debug!(item_id = item_id.get(), points = entry.data.len(), "price history cache hit");
        self.client.stats.record_hit();
        Some(PriceHistoryLookup::from_entry(entry, LookupSource::Cache))
    }

    async fn refresh(&self, item_id: ItemId) -> PriceHistoryLookup {
        match self.fetch(item_id).await {
            Ok((points, fetched_at)) => {
                self.client
                    .cache
                    .write()
                    .await
                    .store(item_id, points.clone(), fetched_at);
                PriceHistoryLookup {
                    points,
                    source: LookupSource::Fresh,
                    fetched_at: Some(fetched_at),
                }
            }
            Err(e) => {
                self.client.stats.record_failure();
                let cache = self.client.cache.read().await;
                match cache.get(&item_id) {
                    Some(entry) => {
                        tracing::warn!(
                            item_id = item_id.get(),
                            error = %e,
                            fetched_at = %entry.fetched_at,
                            "price history fetch failed, serving stale data"
                        );
                        self.client.stats.record_stale();
                        PriceHistoryLookup::from_entry(entry, LookupSource::Stale)
                    }
                    None => {
                        tracing::warn!(
                            item_id = item_id.get(),
                            error = %e,
                            "price history fetch failed, nothing cached"
                        );
                        PriceHistoryLookup::empty()
                    }
                }
            }
        }
    }

    /// fetch → parse → filter. Returns the points and the fetch instant.
    async fn fetch(
        &self,
        item_id: ItemId,
    ) -> Result<(Vec<PricePoint>, DateTime<Utc>), PriceHistoryError> {
        let config = &self.client.config;
        tracing::debug!(
            item_id = item_id.get(),
            timestep = %config.timestep,
            "fetching price history"
        );
        self.client.stats.record_fetch();

        let raw = self.client.source.fetch_timeseries(item_id).await?;
        let now = self.client.clock.now();

        let parsed = wire::parse_timeseries(&raw, now, config.retention_window())?;
        self.client.stats.record_malformed(parsed.malformed);

        let filtered = filter::filter_outliers(parsed.points, config.max_deviation);
        self.client.stats.record_outliers(filtered.removed);

        tracing::debug!(
            item_id = item_id.get(),
            points = filtered.points.len(),
            malformed = parsed.malformed,
            expired = parsed.expired,
            unpriced = parsed.unpriced,
            outliers = filtered.removed,
            "fetched price history"
        );
        Ok((filtered.points, now))
    }
}
