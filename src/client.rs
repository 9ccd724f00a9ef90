//! High-level client: `PriceHistoryClient` with nested sub-client accessors.
//!
//! The lookup logic lives in `domain/price_history/client.rs`. This module
//! keeps the builder, shared cache state, and accessor methods.

use crate::clock::{Clock, SystemClock};
use crate::config::PriceHistoryConfig;
use crate::domain::price_history::client::PriceHistory;
use crate::domain::price_history::{FetchStats, PriceHistoryCache, PricePoint, StatsSnapshot};
use crate::error::SdkError;
use crate::shared::{ItemId, Timestep};
use crate::source::PriceSource;

use async_lock::{Mutex, MutexGuard, RwLock};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::domain::price_history::client::PriceHistory as PriceHistorySubClient;

/// The primary entry point.
///
/// Cheap to clone: every clone shares the same cache, source and counters.
/// Create one per session and hand clones to whatever needs price history.
pub struct PriceHistoryClient {
    pub(crate) source: Arc<dyn PriceSource>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: PriceHistoryConfig,
    /// Price history cache: item → (points, fetched_at)
    pub(crate) cache: Arc<RwLock<PriceHistoryCache>>,
    /// Per-item gates serializing check → fetch → store. The map lock is
    /// never held across an await.
    pub(crate) in_flight: Arc<std::sync::Mutex<GateMap>>,
    pub(crate) stats: Arc<FetchStats>,
}

impl PriceHistoryClient {
    pub fn builder() -> PriceHistoryClientBuilder {
        PriceHistoryClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn price_history(&self) -> PriceHistory<'_> {
        PriceHistory { client: self }
    }

    /// Price history for one item. Never fails; see [`PriceHistory::get`].
    pub async fn get_price_history(&self, item_id: ItemId) -> Vec<PricePoint> {
        self.price_history().get(item_id).await
    }

    pub fn config(&self) -> &PriceHistoryConfig {
        &self.config
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Clear all cached price history.
    pub async fn clear_all_caches(&self) {
        self.cache.write().await.clear();
    }

    // ── Request coalescing ───────────────────────────────────────────────

    /// Handle on the gate for `item_id`. The gate is forgotten when its last
    /// handle drops, including when a lookup is cancelled mid-await.
    pub(crate) fn gate(&self, item_id: ItemId) -> GateHandle<'_> {
        let gate = lock_gates(&self.in_flight)
            .entry(item_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        GateHandle {
            gates: &self.in_flight,
            item_id,
            gate,
        }
    }

    #[cfg(test)]
    pub(crate) fn gate_count(&self) -> usize {
        lock_gates(&self.in_flight).len()
    }
}

type GateMap = HashMap<ItemId, Arc<Mutex<()>>>;

fn lock_gates(gates: &std::sync::Mutex<GateMap>) -> std::sync::MutexGuard<'_, GateMap> {
    // Nothing panics while holding the lock, so the map is never half-updated.
    gates.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One caller's share of a per-item gate.
pub(crate) struct GateHandle<'a> {
    gates: &'a std::sync::Mutex<GateMap>,
    item_id: ItemId,
    gate: Arc<Mutex<()>>,
}

impl GateHandle<'_> {
    pub(crate) async fn lock(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }
}

impl Drop for GateHandle<'_> {
    fn drop(&mut self) {
        let mut gates = lock_gates(self.gates);
        // Handles are only cloned under the map lock, so two references
        // (the map's and ours) means we are the last holder.
        let last = gates
            .get(&self.item_id)
            .is_some_and(|g| Arc::ptr_eq(g, &self.gate) && Arc::strong_count(g) == 2);
        if last {
            gates.remove(&self.item_id);
        }
    }
}

impl Clone for PriceHistoryClient {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            clock: self.clock.clone(),
            config: self.config.clone(),
            cache: self.cache.clone(),
            in_flight: self.in_flight.clone(),
            stats: self.stats.clone(),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct PriceHistoryClientBuilder {
    config: PriceHistoryConfig,
    source: Option<Arc<dyn PriceSource>>,
    clock: Option<Arc<dyn Clock>>,
}

impl PriceHistoryClientBuilder {
    /// Replace the whole configuration at once.
    pub fn config(mut self, config: PriceHistoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.config.base_url = url.to_string();
        self
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.config.user_agent = user_agent.to_string();
        self
    }

    pub fn timestep(mut self, timestep: Timestep) -> Self {
        self.config.timestep = timestep;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    pub fn retention(mut self, retention: Duration) -> Self {
        self.config.retention = retention;
        self
    }

    pub fn max_deviation(mut self, max_deviation: f64) -> Self {
        self.config.max_deviation = max_deviation;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    /// Fetch through `source` instead of the built-in HTTP client.
    pub fn source(mut self, source: Arc<dyn PriceSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<PriceHistoryClient, SdkError> {
        self.config.validate()?;

        let source = match self.source {
            Some(source) => source,
            None => default_source(&self.config)?,
        };

        Ok(PriceHistoryClient {
            source,
            clock: self
                .clock
                .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>),
            cache: Arc::new(RwLock::new(PriceHistoryCache::new(self.config.ttl()))),
            config: self.config,
            in_flight: Arc::new(std::sync::Mutex::new(HashMap::new())),
            stats: Arc::new(FetchStats::default()),
        })
    }
}

#[cfg(feature = "http")]
fn default_source(config: &PriceHistoryConfig) -> Result<Arc<dyn PriceSource>, SdkError> {
    Ok(Arc::new(crate::http::WikiPricesHttp::from_config(config)?))
}

#[cfg(not(feature = "http"))]
fn default_source(_config: &PriceHistoryConfig) -> Result<Arc<dyn PriceSource>, SdkError> {
    Err(SdkError::Config(
        "no price source: enable the `http` feature or call `.source(..)`".into(),
    ))
}
