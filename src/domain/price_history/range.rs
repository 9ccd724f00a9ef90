//! Axis bounds for charting a series.

use super::PricePoint;
use chrono::{DateTime, Utc};

/// Vertical headroom added above and below the price extremes.
pub const DEFAULT_PRICE_PADDING: f64 = 0.05;

/// Time and price extent of a series, across both high and low prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min_time: DateTime<Utc>,
    pub max_time: DateTime<Utc>,
    pub min_price: u64,
    pub max_price: u64,
}

impl PriceRange {
    /// `None` for an empty series.
    pub fn from_points(points: &[PricePoint]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min_time: first.timestamp,
            max_time: first.timestamp,
            min_price: first.avg_low_price.min(first.avg_high_price),
            max_price: first.avg_low_price.max(first.avg_high_price),
        };

        Some(points.iter().fold(init, |acc, p| Self {
            min_time: acc.min_time.min(p.timestamp),
            max_time: acc.max_time.max(p.timestamp),
            min_price: acc.min_price.min(p.avg_low_price).min(p.avg_high_price),
            max_price: acc.max_price.max(p.avg_low_price).max(p.avg_high_price),
        }))
    }

    pub fn price_span(&self) -> u64 {
        self.max_price - self.min_price
    }

    /// Widen the price bounds by `fraction` of the span on each side.
    pub fn padded(&self, fraction: f64) -> Self {
        let pad = (self.price_span() as f64 * fraction) as u64;
        Self {
            min_price: self.min_price.saturating_sub(pad),
            max_price: self.max_price.saturating_add(pad),
            ..*self
        }
    }
}
