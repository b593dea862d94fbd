//! Velocity statistics derived from a demand series.

use serde::{Deserialize, Serialize};

use stocksense_core::stats;
use stocksense_core::{EngineError, EngineResult, ItemId, TenantId};

use crate::snapshot::DemandSnapshot;

const TREND_UP_RATIO: f64 = 1.15;
const TREND_DOWN_RATIO: f64 = 0.85;

/// Direction of recent demand relative to the earlier half of the window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Per-item demand velocity over a daily window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandVelocity {
    pub tenant_id: TenantId,
    pub item_id: ItemId,
    pub avg_daily: f64,
    pub avg_weekly: f64,
    /// 7-period simple moving average of the most recent window, when the
    /// series is long enough.
    pub sma_7: Option<f64>,
    pub sma_30: Option<f64>,
    pub stddev_daily: f64,
    /// Population coefficient of variation. `None` when the series is too
    /// short or has non-positive mean.
    pub coefficient_of_variation: Option<f64>,
    pub trend: Trend,
    pub total_consumed: f64,
    pub total_lost: f64,
    pub periods: usize,
}

/// Mean of the trailing `periods` values. `None` when the series is shorter
/// than the window.
pub fn simple_moving_average(values: &[f64], periods: usize) -> Option<f64> {
    if periods == 0 || values.len() < periods {
        return None;
    }
    Some(stats::mean(&values[values.len() - periods..]))
}

fn trend(values: &[f64]) -> Trend {
    let half = values.len() / 2;
    if half == 0 {
        return Trend::Stable;
    }
    let earlier = stats::mean(&values[..half]);
    let recent = stats::mean(&values[values.len() - half..]);
    if earlier <= 0.0 {
        return if recent > 0.0 { Trend::Up } else { Trend::Stable };
    }
    let ratio = recent / earlier;
    if ratio > TREND_UP_RATIO {
        Trend::Up
    } else if ratio < TREND_DOWN_RATIO {
        Trend::Down
    } else {
        Trend::Stable
    }
}

/// Derive velocity statistics from a daily demand series for one item.
///
/// Snapshots must all belong to the same item and are expected in ascending
/// period order, as produced by the aggregator.
pub fn demand_velocity(
    tenant_id: TenantId,
    item_id: ItemId,
    snapshots: &[DemandSnapshot],
) -> EngineResult<DemandVelocity> {
    if snapshots.is_empty() {
        return Err(EngineError::insufficient_data(
            "demand velocity needs at least one period",
        ));
    }
    if snapshots.iter().any(|s| s.item_id != item_id) {
        return Err(EngineError::validation(
            "demand series contains snapshots for a different item",
        ));
    }

    let series: Vec<f64> = snapshots.iter().map(|s| s.total_demand()).collect();
    let avg_daily = stats::mean(&series);

    Ok(DemandVelocity {
        tenant_id,
        item_id,
        avg_daily,
        avg_weekly: avg_daily * 7.0,
        sma_7: simple_moving_average(&series, 7),
        sma_30: simple_moving_average(&series, 30),
        stddev_daily: stats::stddev_population(&series),
        coefficient_of_variation: stats::coefficient_of_variation(&series),
        trend: trend(&series),
        total_consumed: snapshots.iter().map(|s| s.quantity_consumed).sum(),
        total_lost: snapshots.iter().map(|s| s.quantity_lost).sum(),
        periods: series.len(),
    })
}
