use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use stocksense_core::stats::{mean, stddev_sample};
use stocksense_core::{EngineError, EngineResult, ItemId, TenantId};
use stocksense_demand::{DemandSnapshot, Granularity};
use stocksense_reorder::{
    CostInputs, DemandStats, ManualOverride, ParamSource, ReorderParams, compute_params,
};

use crate::collaborators::Catalog;
use crate::outcome::{BatchReport, ItemOutcome};
use crate::services::{ReorderParamsStore, SnapshotStore, SupplierScoreStore};
use crate::store::TenantStore;

/// Computes and stores replenishment parameters, honoring manual overrides.
pub struct ReorderService {
    snapshots: SnapshotStore,
    catalog: Arc<dyn Catalog>,
    params: ReorderParamsStore,
    supplier_scores: SupplierScoreStore,
}

impl ReorderService {
    pub fn new(
        snapshots: SnapshotStore,
        catalog: Arc<dyn Catalog>,
        params: ReorderParamsStore,
        supplier_scores: SupplierScoreStore,
    ) -> Self {
        Self {
            snapshots,
            catalog,
            params,
            supplier_scores,
        }
    }

    pub fn get(&self, tenant_id: TenantId, item_id: ItemId) -> EngineResult<ReorderParams> {
        self.params
            .get(tenant_id, &item_id)
            .ok_or_else(|| EngineError::not_found(format!("reorder parameters for {item_id}")))
    }

    /// Apply a planner override on top of the stored parameters. Fails with
    /// `NotFound` when no parameters exist yet; an override pins values, it
    /// does not invent them.
    pub fn override_params(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        patch: ManualOverride,
        as_of: NaiveDate,
    ) -> EngineResult<ReorderParams> {
        let current = self.get(tenant_id, item_id)?;
        let next = patch.apply(&current, as_of)?;
        self.params.upsert(tenant_id, item_id, next.clone());
        info!(tenant = %tenant_id, item = %item_id, "reorder parameters overridden");
        Ok(next)
    }

    fn demand_stats(&self, tenant_id: TenantId, item_id: ItemId) -> DemandStats {
        let mut series: Vec<DemandSnapshot> = self
            .snapshots
            .list(tenant_id)
            .into_iter()
            .filter(|s| s.item_id == item_id && s.granularity == Granularity::Daily)
            .collect();
        series.sort_by_key(|s| s.period_start);
        let values: Vec<f64> = series.iter().map(|s| s.total_demand()).collect();
        DemandStats {
            mean_daily: mean(&values),
            stddev_daily: stddev_sample(&values),
            periods: values.len(),
        }
    }

    /// Recompute one item's parameters from its stored demand series and
    /// catalog data.
    pub fn recompute_item(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        service_level: f64,
        as_of: NaiveDate,
    ) -> EngineResult<ReorderParams> {
        let catalog_item = self.catalog.item(tenant_id, item_id)?;
        let demand = self.demand_stats(tenant_id, item_id);
        let costs = CostInputs {
            unit_cost: catalog_item.unit_cost,
            ..CostInputs::default()
        };
        // Plan with the supplier's penalty-inflated lead time when we have a
        // scorecard for them.
        let lead_time_days = catalog_item
            .supplier_id
            .and_then(|supplier_id| self.supplier_scores.get(tenant_id, &supplier_id))
            .map(|score| score.effective_lead_time_days())
            .filter(|lead| *lead > 0.0)
            .unwrap_or(catalog_item.lead_time_days);
        let params = compute_params(
            tenant_id,
            item_id,
            &demand,
            lead_time_days,
            service_level,
            &costs,
            as_of,
        )?;
        self.params.upsert(tenant_id, item_id, params.clone());
        Ok(params)
    }

    /// Recompute every active item. Items pinned by a manual override are
    /// skipped unless `force` is set; items with too little history are
    /// skipped rather than failed.
    pub fn recompute_all(
        &self,
        tenant_id: TenantId,
        service_level: f64,
        as_of: NaiveDate,
        force: bool,
    ) -> EngineResult<BatchReport> {
        let items = self.catalog.active_items(tenant_id)?;
        let mut outcomes = Vec::with_capacity(items.len());
        for item in items {
            let pinned = self
                .params
                .get(tenant_id, &item.item_id)
                .is_some_and(|p| p.source == ParamSource::Manual);
            if pinned && !force {
                outcomes.push(ItemOutcome::skipped(
                    item.item_id,
                    "pinned by manual override",
                ));
                continue;
            }
            match self.recompute_item(tenant_id, item.item_id, service_level, as_of) {
                Ok(_) => outcomes.push(ItemOutcome::ok(item.item_id)),
                Err(err) => {
                    warn!(tenant = %tenant_id, item = %item.item_id, error = %err,
                          "reorder recompute did not produce parameters");
                    outcomes.push(ItemOutcome::from_error(item.item_id, &err));
                }
            }
        }
        let report = BatchReport::new(outcomes);
        info!(
            tenant = %tenant_id,
            ok = report.ok_count(),
            skipped = report.skipped_count(),
            failed = report.failed_count(),
            "reorder recompute complete"
        );
        Ok(report)
    }
}
