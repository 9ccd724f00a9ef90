//! Median-deviation outlier filter for freshly fetched batches.
//!
//! One global median per batch, not a rolling window: a batch that contains
//! a sustained price regime shift can lose legitimate points from the side
//! of the shift that holds the minority of buckets. Cache hits are never
//! re-filtered.

use super::PricePoint;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    /// Surviving points in their original order.
    pub points: Vec<PricePoint>,
    pub removed: usize,
    /// `None` when the batch had no basis for outlier detection.
    pub median_high: Option<u64>,
    pub median_low: Option<u64>,
}

/// Drop points whose prices stray more than `max_deviation` (relative) from
/// the batch medians, and points whose low exceeds their high.
pub fn filter_outliers(points: Vec<PricePoint>, max_deviation: f64) -> FilterOutcome {
    let (Some(median_high), Some(median_low)) = (
        median(points.iter().map(|p| p.avg_high_price)),
        median(points.iter().map(|p| p.avg_low_price)),
    ) else {
        return FilterOutcome {
            points,
            ..FilterOutcome::default()
        };
    };

    let before = points.len();
    let kept: Vec<PricePoint> = points
        .into_iter()
        .filter(|p| is_valid(p, median_high, median_low, max_deviation))
        .collect();

    FilterOutcome {
        removed: before - kept.len(),
        points: kept,
        median_high: Some(median_high),
        median_low: Some(median_low),
    }
}

/// Middle element of the positive values; even counts take the upper one.
fn median(prices: impl Iterator<Item = u64>) -> Option<u64> {
    let mut sorted: Vec<u64> = prices.filter(|&p| p > 0).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_unstable();
    Some(sorted[sorted.len() / 2])
}

fn is_valid(point: &PricePoint, median_high: u64, median_low: u64, max_deviation: f64) -> bool {
    let high = point.avg_high_price;
    let low = point.avg_low_price;

    if high == 0 || low == 0 || low > high {
        return false;
    }

    deviation(high, median_high) <= max_deviation && deviation(low, median_low) <= max_deviation
}

fn deviation(price: u64, median: u64) -> f64 {
    price.abs_diff(median) as f64 / median as f64
}
