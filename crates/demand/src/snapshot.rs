use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use stocksense_core::{ItemId, TenantId};

/// Period granularity of a demand series.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
}

impl Granularity {
    /// Calendar days covered by one period.
    pub fn period_days(&self) -> i64 {
        match self {
            Granularity::Daily => 1,
            Granularity::Weekly => 7,
        }
    }

    /// Start of the period containing `date`. Weekly periods start on Monday.
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Daily => date,
            Granularity::Weekly => {
                let back = date.weekday().num_days_from_monday() as i64;
                date - Duration::days(back)
            }
        }
    }
}

/// What kind of consumption an event records.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsumptionKind {
    /// Fulfilled demand.
    Sale,
    /// Demand that could not be met (stock-out proxy for lost sales).
    StockOut,
}

/// A raw consumption event read from the transaction-history collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionEvent {
    pub item_id: ItemId,
    pub occurred_on: NaiveDate,
    pub quantity: f64,
    /// Unit price at the time of sale, when known. Feeds the revenue basis
    /// used by ABC classification.
    pub unit_price: Option<f64>,
    pub kind: ConsumptionKind,
}

/// Natural key of a demand snapshot. Upserting by this key is what makes
/// aggregation idempotent.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotKey {
    pub item_id: ItemId,
    pub period_start: NaiveDate,
    pub granularity: Granularity,
}

/// One closed period of demand for one item. Immutable once the period has
/// closed; recomputable by re-running the aggregator over the same window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandSnapshot {
    pub tenant_id: TenantId,
    pub item_id: ItemId,
    pub period_start: NaiveDate,
    pub granularity: Granularity,
    pub quantity_consumed: f64,
    /// Quantity demanded but not fulfilled (stock-out proxy).
    pub quantity_lost: f64,
    /// Revenue realized in the period (Σ quantity × unit price where known).
    pub revenue: f64,
}

impl DemandSnapshot {
    pub fn key(&self) -> SnapshotKey {
        SnapshotKey {
            item_id: self.item_id,
            period_start: self.period_start,
            granularity: self.granularity,
        }
    }

    /// Total demand signal for the period, fulfilled or not.
    pub fn total_demand(&self) -> f64 {
        self.quantity_consumed + self.quantity_lost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_buckets_start_on_monday() {
        // 2026-08-27 is a Thursday.
        let d = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
        let start = Granularity::Weekly.bucket_start(d);
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 8, 24).unwrap());
        assert_eq!(start.weekday(), Weekday::Mon);
        // A Monday maps to itself.
        assert_eq!(Granularity::Weekly.bucket_start(start), start);
    }

    #[test]
    fn daily_buckets_are_identity() {
        let d = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        assert_eq!(Granularity::Daily.bucket_start(d), d);
    }
}
