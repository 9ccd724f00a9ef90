//! Tunables shared by the HTTP layer and the cache.

use crate::error::SdkError;
use crate::network::{DEFAULT_API_URL, DEFAULT_USER_AGENT};
use crate::shared::Timestep;
use std::time::Duration;

/// Cache entries older than this are stale.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Points older than this, relative to fetch time, are dropped.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(18 * 60 * 60);

/// Maximum relative distance from the batch median before a point is an outlier.
pub const DEFAULT_MAX_DEVIATION: f64 = 0.5;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistoryConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timestep: Timestep,
    pub cache_ttl: Duration,
    pub retention: Duration,
    pub max_deviation: f64,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for PriceHistoryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timestep: Timestep::default(),
            cache_ttl: DEFAULT_CACHE_TTL,
            retention: DEFAULT_RETENTION,
            max_deviation: DEFAULT_MAX_DEVIATION,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl PriceHistoryConfig {
    pub fn validate(&self) -> Result<(), SdkError> {
        if self.base_url.trim().is_empty() {
            return Err(SdkError::Config("base_url must not be empty".into()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(SdkError::Config("user_agent must not be empty".into()));
        }
        if self.cache_ttl.is_zero() {
            return Err(SdkError::Config("cache_ttl must be greater than zero".into()));
        }
        if !self.max_deviation.is_finite() || self.max_deviation < 0.0 {
            return Err(SdkError::Config(format!(
                "max_deviation must be a finite non-negative ratio, got {}",
                self.max_deviation
            )));
        }
        if self.connect_timeout.is_zero() || self.read_timeout.is_zero() {
            return Err(SdkError::Config("timeouts must be greater than zero".into()));
        }
        Ok(())
    }

    /// Cache TTL as a chrono duration, for comparisons against clock readings.
    pub(crate) fn ttl(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.cache_ttl).unwrap_or(chrono::Duration::MAX)
    }

    pub(crate) fn retention_window(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.retention).unwrap_or(chrono::Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PriceHistoryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.retention, Duration::from_secs(64_800));
        assert_eq!(config.timestep, Timestep::FiveMinutes);
    }

    #[test]
    fn test_rejects_zero_ttl() {
        let config = PriceHistoryConfig {
            cache_ttl: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SdkError::Config(_))));
    }

    #[test]
    fn test_rejects_bad_deviation() {
        for bad in [f64::NAN, f64::INFINITY, -0.1] {
            let config = PriceHistoryConfig {
                max_deviation: bad,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "accepted {}", bad);
        }
    }
}
