use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use stocksense_core::{EngineError, EngineResult, ItemId, TenantId};

use crate::snapshot::{ConsumptionEvent, ConsumptionKind, DemandSnapshot, Granularity, SnapshotKey};

/// Inclusive date window the aggregator recomputes over.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AggregationWindow {
    /// Window covering `lookback_days` days ending at `end` (inclusive).
    pub fn ending_at(end: NaiveDate, lookback_days: u32) -> EngineResult<Self> {
        if lookback_days == 0 {
            return Err(EngineError::validation("lookback_days must be >= 1"));
        }
        Ok(Self {
            start: end - Duration::days(lookback_days as i64 - 1),
            end,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Period starts covering this window at the given granularity, ascending.
    pub fn period_starts(&self, granularity: Granularity) -> Vec<NaiveDate> {
        let mut starts = Vec::new();
        let mut cursor = granularity.bucket_start(self.start);
        while cursor <= self.end {
            starts.push(cursor);
            cursor += Duration::days(granularity.period_days());
        }
        starts
    }
}

/// Bucket consumption events into one snapshot per (item, period) over the
/// window, emitting explicit zero snapshots for empty periods.
///
/// Pure recompute: the output covers every item in `item_ids` and every period
/// in the window, so a caller replacing the window's rows with this output
/// cannot double-count. Events outside the window or for items not listed are
/// ignored.
pub fn aggregate(
    tenant_id: TenantId,
    item_ids: &[ItemId],
    events: &[ConsumptionEvent],
    window: AggregationWindow,
    granularity: Granularity,
) -> EngineResult<Vec<DemandSnapshot>> {
    if window.end < window.start {
        return Err(EngineError::validation("window end precedes window start"));
    }

    let mut buckets: HashMap<SnapshotKey, (f64, f64, f64)> = HashMap::new();
    for event in events {
        if !window.contains(event.occurred_on) {
            continue;
        }
        if !event.quantity.is_finite() || event.quantity < 0.0 {
            return Err(EngineError::validation(format!(
                "event quantity must be finite and non-negative, got {}",
                event.quantity
            )));
        }
        let key = SnapshotKey {
            item_id: event.item_id,
            period_start: granularity.bucket_start(event.occurred_on),
            granularity,
        };
        let entry = buckets.entry(key).or_insert((0.0, 0.0, 0.0));
        match event.kind {
            ConsumptionKind::Sale => {
                entry.0 += event.quantity;
                if let Some(price) = event.unit_price {
                    entry.2 += event.quantity * price;
                }
            }
            ConsumptionKind::StockOut => entry.1 += event.quantity,
        }
    }

    let period_starts = window.period_starts(granularity);
    let mut snapshots = Vec::with_capacity(item_ids.len() * period_starts.len());
    let mut ordered_items = item_ids.to_vec();
    ordered_items.sort();
    ordered_items.dedup();

    for item_id in ordered_items {
        for &period_start in &period_starts {
            let key = SnapshotKey {
                item_id,
                period_start,
                granularity,
            };
            let (consumed, lost, revenue) = buckets.get(&key).copied().unwrap_or((0.0, 0.0, 0.0));
            snapshots.push(DemandSnapshot {
                tenant_id,
                item_id,
                period_start,
                granularity,
                quantity_consumed: consumed,
                quantity_lost: lost,
                revenue,
            });
        }
    }

    Ok(snapshots)
}
