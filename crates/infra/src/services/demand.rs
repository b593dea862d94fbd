use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use stocksense_core::{EngineResult, ItemId, Page, PageRequest, TenantId};
use stocksense_demand::{
    AggregationWindow, DemandSnapshot, DemandVelocity, Granularity, aggregate, demand_velocity,
};

use crate::collaborators::{Catalog, TransactionHistory};
use crate::outcome::{BatchReport, ItemOutcome};
use crate::services::SnapshotStore;
use crate::store::TenantStore;

/// Maintains the per-item demand series and derives velocity statistics.
pub struct DemandService {
    history: Arc<dyn TransactionHistory>,
    catalog: Arc<dyn Catalog>,
    snapshots: SnapshotStore,
}

impl DemandService {
    pub fn new(
        history: Arc<dyn TransactionHistory>,
        catalog: Arc<dyn Catalog>,
        snapshots: SnapshotStore,
    ) -> Self {
        Self {
            history,
            catalog,
            snapshots,
        }
    }

    /// Recompute the daily demand series for every active item over the
    /// lookback window and replace the stored snapshots. Idempotent: the
    /// snapshots are keyed by (item, period, granularity).
    pub fn refresh(
        &self,
        tenant_id: TenantId,
        as_of: NaiveDate,
        lookback_days: u32,
        granularity: Granularity,
    ) -> EngineResult<BatchReport> {
        let items = self.catalog.active_items(tenant_id)?;
        let item_ids: Vec<ItemId> = items.iter().map(|i| i.item_id).collect();
        let window = AggregationWindow::ending_at(as_of, lookback_days)?;
        let events = self
            .history
            .consumption_events(tenant_id, window.start, window.end)?;

        let snapshots = aggregate(tenant_id, &item_ids, &events, window, granularity)?;
        for snapshot in &snapshots {
            self.snapshots
                .upsert(tenant_id, snapshot.key(), snapshot.clone());
        }
        info!(
            tenant = %tenant_id,
            items = item_ids.len(),
            snapshots = snapshots.len(),
            "demand series refreshed"
        );

        Ok(BatchReport::new(
            item_ids.into_iter().map(ItemOutcome::ok).collect(),
        ))
    }

    /// The stored daily series for one item, ascending by period.
    pub fn daily_series(&self, tenant_id: TenantId, item_id: ItemId) -> Vec<DemandSnapshot> {
        let mut series: Vec<DemandSnapshot> = self
            .snapshots
            .list(tenant_id)
            .into_iter()
            .filter(|s| s.item_id == item_id && s.granularity == Granularity::Daily)
            .collect();
        series.sort_by_key(|s| s.period_start);
        series
    }

    /// Velocity statistics for every item with stored daily history, paged
    /// in item-id order.
    pub fn velocities(
        &self,
        tenant_id: TenantId,
        request: PageRequest,
    ) -> EngineResult<Page<DemandVelocity>> {
        let mut by_item: BTreeMap<ItemId, Vec<DemandSnapshot>> = BTreeMap::new();
        for snapshot in self.snapshots.list(tenant_id) {
            if snapshot.granularity == Granularity::Daily {
                by_item.entry(snapshot.item_id).or_default().push(snapshot);
            }
        }

        let mut velocities = Vec::with_capacity(by_item.len());
        for (item_id, mut series) in by_item {
            series.sort_by_key(|s| s.period_start);
            velocities.push(demand_velocity(tenant_id, item_id, &series)?);
        }
        Ok(Page::from_all(velocities, request))
    }

    /// Velocity for a single item.
    pub fn velocity(&self, tenant_id: TenantId, item_id: ItemId) -> EngineResult<DemandVelocity> {
        let series = self.daily_series(tenant_id, item_id);
        demand_velocity(tenant_id, item_id, &series)
    }
}
