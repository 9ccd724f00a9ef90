//! Network constants for the OSRS Wiki real-time prices API.

/// Default REST API base URL. `/timeseries` is appended per request.
pub const DEFAULT_API_URL: &str = "https://prices.runescape.wiki/api/v1/osrs";

/// `User-Agent` sent with every request. The Wiki API rejects generic agents.
pub const DEFAULT_USER_AGENT: &str =
    concat!("osrs-price-history/", env!("CARGO_PKG_VERSION"), " (price history graph)");
