use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::info;

use stocksense_classification::{
    ClassificationInput, ClassificationResult, ClassificationSummary, classify_tenant,
};
use stocksense_core::{EngineResult, ItemId, Page, PageRequest, TenantId};
use stocksense_demand::Granularity;

use crate::outcome::{BatchReport, ItemOutcome};
use crate::services::{ClassificationStore, SnapshotStore};
use crate::store::TenantStore;

/// Runs ABC/XYZ classification over the stored demand series.
pub struct ClassificationService {
    snapshots: SnapshotStore,
    results: ClassificationStore,
}

impl ClassificationService {
    pub fn new(snapshots: SnapshotStore, results: ClassificationStore) -> Self {
        Self { snapshots, results }
    }

    fn inputs(&self, tenant_id: TenantId) -> Vec<ClassificationInput> {
        let mut by_item: BTreeMap<ItemId, (f64, f64, Vec<(NaiveDate, f64)>)> = BTreeMap::new();
        for snapshot in self.snapshots.list(tenant_id) {
            if snapshot.granularity != Granularity::Daily {
                continue;
            }
            let entry = by_item.entry(snapshot.item_id).or_default();
            entry.0 += snapshot.revenue;
            entry.1 += snapshot.quantity_consumed;
            entry.2.push((snapshot.period_start, snapshot.total_demand()));
        }

        // One basis for the whole assortment so cumulative shares compare
        // like with like: revenue when the tenant carries prices at all,
        // consumed quantity otherwise. Under the revenue basis an unpriced
        // item ranks at zero rather than switching to a quantity basis.
        let use_revenue = by_item.values().any(|(revenue, _, _)| *revenue > 0.0);

        by_item
            .into_iter()
            .map(|(item_id, (revenue, consumed, mut series))| {
                series.sort_by_key(|(d, _)| *d);
                ClassificationInput {
                    item_id,
                    basis_value: if use_revenue { revenue } else { consumed },
                    demand_series: series.into_iter().map(|(_, v)| v).collect(),
                }
            })
            .collect()
    }

    /// Classify the whole assortment and replace the stored results.
    pub fn run(&self, tenant_id: TenantId, as_of: NaiveDate) -> EngineResult<BatchReport> {
        let inputs = self.inputs(tenant_id);
        let results = classify_tenant(tenant_id, &inputs, as_of)?;

        let mut outcomes = Vec::with_capacity(results.len());
        for result in results {
            outcomes.push(ItemOutcome::ok(result.item_id));
            self.results.upsert(tenant_id, result.item_id, result);
        }
        info!(tenant = %tenant_id, items = outcomes.len(), "classification run complete");
        Ok(BatchReport::new(outcomes))
    }

    pub fn get(&self, tenant_id: TenantId, item_id: ItemId) -> Option<ClassificationResult> {
        self.results.get(tenant_id, &item_id)
    }

    /// Stored results in item-id order.
    pub fn list(
        &self,
        tenant_id: TenantId,
        request: PageRequest,
    ) -> EngineResult<Page<ClassificationResult>> {
        let mut results = self.results.list(tenant_id);
        results.sort_by_key(|r| r.item_id);
        Ok(Page::from_all(results, request))
    }

    pub fn summary(&self, tenant_id: TenantId) -> ClassificationSummary {
        let results = self.results.list(tenant_id);
        ClassificationSummary::from_results(tenant_id, &results)
    }
}
