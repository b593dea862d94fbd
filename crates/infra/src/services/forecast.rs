use chrono::NaiveDate;
use tracing::{info, warn};

use stocksense_core::{EngineError, EngineResult, ItemId, TenantId};
use stocksense_demand::Granularity;
use stocksense_forecast::{ForecastMethod, ForecastRecord, generate, generate_auto};

use crate::outcome::{BatchReport, ItemOutcome};
use crate::services::{ForecastStore, SnapshotStore};
use crate::store::TenantStore;

/// Generates and stores demand forecasts from the stored daily series.
pub struct ForecastService {
    snapshots: SnapshotStore,
    forecasts: ForecastStore,
}

impl ForecastService {
    pub fn new(snapshots: SnapshotStore, forecasts: ForecastStore) -> Self {
        Self {
            snapshots,
            forecasts,
        }
    }

    /// Trailing daily history for one item, capped at `lookback_days` values,
    /// with the end date of the series.
    fn history(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        lookback_days: u32,
    ) -> (Vec<f64>, Option<NaiveDate>) {
        let mut series: Vec<_> = self
            .snapshots
            .list(tenant_id)
            .into_iter()
            .filter(|s| s.item_id == item_id && s.granularity == Granularity::Daily)
            .collect();
        series.sort_by_key(|s| s.period_start);
        let end = series.last().map(|s| s.period_start);
        let skip = series.len().saturating_sub(lookback_days as usize);
        (
            series[skip..].iter().map(|s| s.total_demand()).collect(),
            end,
        )
    }

    /// Generate a forecast for one item, fitting on the trailing
    /// `lookback_days` of its daily history. With an explicit method only that
    /// method runs; without one every applicable method is generated and
    /// stored, and the best-scoring record is returned.
    pub fn generate_item(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        method: Option<ForecastMethod>,
        horizon_days: u32,
        lookback_days: u32,
        as_of: NaiveDate,
    ) -> EngineResult<ForecastRecord> {
        if lookback_days == 0 {
            return Err(EngineError::validation("lookback_days must be at least 1"));
        }
        let (history, end) = self.history(tenant_id, item_id, lookback_days);
        let end = end.ok_or_else(|| {
            EngineError::insufficient_data(format!("no demand history for {item_id}"))
        })?;

        match method {
            Some(method) => {
                let record =
                    generate(tenant_id, item_id, method, &history, end, horizon_days, as_of)?;
                self.forecasts
                    .upsert(tenant_id, (item_id, method), record.clone());
                Ok(record)
            }
            None => {
                let (selected, records) =
                    generate_auto(tenant_id, item_id, &history, end, horizon_days, as_of)?;
                let mut best = None;
                for record in records {
                    if record.method == selected {
                        best = Some(record.clone());
                    }
                    self.forecasts
                        .upsert(tenant_id, (item_id, record.method), record);
                }
                // generate_auto always returns the selected record.
                best.ok_or_else(|| {
                    EngineError::dependency_unavailable("auto selection produced no record")
                })
            }
        }
    }

    /// Forecast every item with stored history. Items whose history is too
    /// short for any method are skipped, not failed.
    pub fn generate_all(
        &self,
        tenant_id: TenantId,
        horizon_days: u32,
        lookback_days: u32,
        as_of: NaiveDate,
    ) -> EngineResult<BatchReport> {
        let mut item_ids: Vec<ItemId> = self
            .snapshots
            .list(tenant_id)
            .into_iter()
            .filter(|s| s.granularity == Granularity::Daily)
            .map(|s| s.item_id)
            .collect();
        item_ids.sort();
        item_ids.dedup();

        let mut outcomes = Vec::with_capacity(item_ids.len());
        for item_id in item_ids {
            match self.generate_item(tenant_id, item_id, None, horizon_days, lookback_days, as_of) {
                Ok(_) => outcomes.push(ItemOutcome::ok(item_id)),
                Err(err) => {
                    warn!(tenant = %tenant_id, item = %item_id, error = %err,
                          "forecast generation did not produce a record");
                    outcomes.push(ItemOutcome::from_error(item_id, &err));
                }
            }
        }
        let report = BatchReport::new(outcomes);
        info!(
            tenant = %tenant_id,
            ok = report.ok_count(),
            skipped = report.skipped_count(),
            failed = report.failed_count(),
            "bulk forecast complete"
        );
        Ok(report)
    }

    pub fn get(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        method: ForecastMethod,
    ) -> EngineResult<ForecastRecord> {
        self.forecasts
            .get(tenant_id, &(item_id, method))
            .ok_or_else(|| {
                EngineError::not_found(format!("forecast for {item_id} with {method:?}"))
            })
    }

    /// All stored forecasts for one item.
    pub fn list_for_item(&self, tenant_id: TenantId, item_id: ItemId) -> Vec<ForecastRecord> {
        let mut records: Vec<ForecastRecord> = self
            .forecasts
            .list(tenant_id)
            .into_iter()
            .filter(|r| r.item_id == item_id)
            .collect();
        records.sort_by_key(|r| r.method as u8);
        records
    }
}
