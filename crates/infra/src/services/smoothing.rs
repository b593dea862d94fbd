use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use stocksense_core::{EngineResult, ItemId, TenantId};
use stocksense_demand::Granularity;
use stocksense_smoothing::{SmoothedOrder, SmoothingConfig, smooth_order};

use crate::collaborators::{Catalog, StockLevels, TransactionHistory};
use crate::services::{ReorderParamsStore, SmoothedOrderStore, SmoothingConfigStore, SnapshotStore};
use crate::store::TenantStore;

/// Computes smoothed order recommendations against the tenant's config.
pub struct SmoothingService {
    snapshots: SnapshotStore,
    history: Arc<dyn TransactionHistory>,
    catalog: Arc<dyn Catalog>,
    stock: Arc<dyn StockLevels>,
    reorder_params: ReorderParamsStore,
    configs: SmoothingConfigStore,
    orders: SmoothedOrderStore,
}

impl SmoothingService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        snapshots: SnapshotStore,
        history: Arc<dyn TransactionHistory>,
        catalog: Arc<dyn Catalog>,
        stock: Arc<dyn StockLevels>,
        reorder_params: ReorderParamsStore,
        configs: SmoothingConfigStore,
        orders: SmoothedOrderStore,
    ) -> Self {
        Self {
            snapshots,
            history,
            catalog,
            stock,
            reorder_params,
            configs,
            orders,
        }
    }

    /// The tenant's smoothing config, falling back to the defaults when none
    /// has been stored.
    pub fn get_config(&self, tenant_id: TenantId) -> SmoothingConfig {
        self.configs.get(tenant_id, &()).unwrap_or_default()
    }

    /// Store a new config. Invalid configs are rejected and the stored one
    /// is untouched.
    pub fn put_config(&self, tenant_id: TenantId, config: SmoothingConfig) -> EngineResult<()> {
        config.validate()?;
        self.configs.upsert(tenant_id, (), config);
        info!(tenant = %tenant_id, alpha = config.alpha,
              review_days = config.review_period_days, "smoothing config updated");
        Ok(())
    }

    /// Compute and store a smoothed order recommendation for one item.
    pub fn compute(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        as_of: NaiveDate,
    ) -> EngineResult<SmoothedOrder> {
        let config = self.get_config(tenant_id);
        let catalog_item = self.catalog.item(tenant_id, item_id)?;

        let mut series: Vec<_> = self
            .snapshots
            .list(tenant_id)
            .into_iter()
            .filter(|s| s.item_id == item_id && s.granularity == Granularity::Daily)
            .collect();
        series.sort_by_key(|s| s.period_start);
        let demand: Vec<f64> = series.iter().map(|s| s.total_demand()).collect();

        let order_history = self.history.order_series(tenant_id, item_id)?;
        let on_hand = self.stock.on_hand(tenant_id, item_id)?;
        let on_order = self.stock.on_order(tenant_id, item_id)?;
        // Without computed reorder parameters the recommendation carries no
        // safety buffer.
        let safety_stock = self
            .reorder_params
            .get(tenant_id, &item_id)
            .map(|p| p.safety_stock)
            .unwrap_or(0.0);

        let order = smooth_order(
            tenant_id,
            item_id,
            &demand,
            &order_history,
            on_hand,
            on_order,
            catalog_item.lead_time_days,
            safety_stock,
            &config,
            as_of,
        )?;
        self.orders.upsert(tenant_id, item_id, order.clone());
        Ok(order)
    }

    pub fn get(&self, tenant_id: TenantId, item_id: ItemId) -> Option<SmoothedOrder> {
        self.orders.get(tenant_id, &item_id)
    }
}
