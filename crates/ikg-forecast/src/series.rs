//! Time-series ingestion: `spec.md` §4.5's `{timestamp, totalCost, nodeCount,
//! provider?}` input shape, sanitized on the way in.

use chrono::{DateTime, Utc};
use ikg_core::{Provider, Snapshot};

/// One observation in the cost time series, day-indexed relative to the
/// first point once a series is built (`CostSeries::day_offsets`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub total_cost: f64,
    pub node_count: u64,
    pub provider: Option<Provider>,
}

impl From<Snapshot> for TimeSeriesPoint {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            timestamp: snapshot.created_at,
            total_cost: sanitize_cost(snapshot.total_cost_monthly),
            node_count: snapshot.node_count,
            provider: snapshot.provider,
        }
    }
}

/// Any non-finite cost value is replaced by zero on ingestion.
#[must_use]
pub fn sanitize_cost(cost: f64) -> f64 {
    if cost.is_finite() {
        cost
    } else {
        0.0
    }
}

/// Builds a sanitized, time-ordered series from raw snapshots, optionally
/// narrowed to a single provider (`spec.md` §4.5 forecast options).
#[must_use]
pub fn build_series(mut snapshots: Vec<Snapshot>, provider: Option<Provider>) -> Vec<TimeSeriesPoint> {
    if let Some(provider) = provider {
        snapshots.retain(|s| s.provider == Some(provider));
    }
    snapshots.sort_by_key(|s| s.created_at);
    snapshots.into_iter().map(TimeSeriesPoint::from).collect()
}

/// Day offsets of each point relative to the first, as `f64` x-values for
/// regression-style fits.
#[must_use]
pub fn day_offsets(points: &[TimeSeriesPoint]) -> Vec<f64> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    points.iter().map(|p| (p.timestamp - first.timestamp).num_seconds() as f64 / 86_400.0).collect()
}

#[must_use]
pub fn costs(points: &[TimeSeriesPoint]) -> Vec<f64> {
    points.iter().map(|p| p.total_cost).collect()
}
