//! # OSRS Price History
//!
//! Cached item price history from the OSRS Wiki real-time prices API.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core**: Item ids, time-series points, parsing, filtering, cache state
//! 2. **Source**: `PriceSource` (single-attempt fetch) and its `reqwest` implementation
//! 3. **High-Level Client**: `PriceHistoryClient`: TTL cache, stale fallback, request coalescing
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use osrs_price_history::prelude::*;
//!
//! let client = PriceHistoryClient::builder().build()?;
//!
//! // Never fails: stale or empty data is served when the API is unreachable.
//! let points = client.get_price_history(ItemId::new(4151).unwrap()).await;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire parsing, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

/// Client configuration and defaults.
pub mod config;

/// Injectable time source.
pub mod clock;

// ── Layer 2: Source ──────────────────────────────────────────────────────────

/// Remote time-series source trait.
pub mod source;

/// HTTP implementation of the time-series source.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 3: High-Level Client ───────────────────────────────────────────────

/// `PriceHistoryClient`: the primary entry point.
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{ItemId, Timestep};

    // Domain types: price history
    pub use crate::domain::price_history::{
        CacheEntry, Freshness, LookupSource, PriceHistoryLookup, PricePoint, PriceRange,
        StatsSnapshot,
    };

    // Errors
    pub use crate::error::{HttpError, PointError, PriceHistoryError, SdkError};

    // Network + configuration
    pub use crate::config::PriceHistoryConfig;
    pub use crate::network::{DEFAULT_API_URL, DEFAULT_USER_AGENT};

    // Clock + source seams
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::source::PriceSource;

    // Client + sub-clients
    pub use crate::client::{PriceHistoryClient, PriceHistoryClientBuilder, PriceHistorySubClient};
    #[cfg(feature = "http")]
    pub use crate::http::WikiPricesHttp;
}
