//! Data collaborators the engine reads from.
//!
//! The engine does not own transactional data: sales, purchase orders, stock
//! levels, and the item catalog live elsewhere. These traits are the seams;
//! a failing collaborator surfaces as `DependencyUnavailable` rather than
//! taking the whole engine down. The in-memory implementations back the
//! integration tests.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stocksense_core::{EngineError, EngineResult, ItemId, SupplierId, TenantId};
use stocksense_demand::ConsumptionEvent;
use stocksense_echelon::LocationStock;
use stocksense_supplier::ReceiptRecord;

/// One catalog row as the engine sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub item_id: ItemId,
    pub name: String,
    pub unit_cost: Option<f64>,
    pub unit_price: Option<f64>,
    pub lead_time_days: f64,
    pub supplier_id: Option<SupplierId>,
    pub active: bool,
}

/// Sales and ordering history.
pub trait TransactionHistory: Send + Sync {
    /// Consumption events in the inclusive date range, all items.
    fn consumption_events(
        &self,
        tenant_id: TenantId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<ConsumptionEvent>>;

    /// Per-period quantities the tenant ordered for one item, ascending.
    fn order_series(&self, tenant_id: TenantId, item_id: ItemId) -> EngineResult<Vec<f64>>;
}

/// The item master.
pub trait Catalog: Send + Sync {
    fn active_items(&self, tenant_id: TenantId) -> EngineResult<Vec<CatalogItem>>;

    /// `NotFound` when the item does not exist for this tenant.
    fn item(&self, tenant_id: TenantId, item_id: ItemId) -> EngineResult<CatalogItem>;
}

/// Current inventory positions.
pub trait StockLevels: Send + Sync {
    fn stock_by_location(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
    ) -> EngineResult<Vec<LocationStock>>;

    fn on_hand(&self, tenant_id: TenantId, item_id: ItemId) -> EngineResult<f64>;

    /// Quantity already ordered but not yet received.
    fn on_order(&self, tenant_id: TenantId, item_id: ItemId) -> EngineResult<f64>;
}

/// Purchase-order receipt history.
pub trait ReceivingHistory: Send + Sync {
    fn receipts(
        &self,
        tenant_id: TenantId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<ReceiptRecord>>;

    fn suppliers(&self, tenant_id: TenantId) -> EngineResult<Vec<SupplierId>>;
}

#[derive(Debug, Default)]
pub struct InMemoryTransactionHistory {
    events: RwLock<Vec<(TenantId, ConsumptionEvent)>>,
    orders: RwLock<HashMap<(TenantId, ItemId), Vec<f64>>>,
}

impl InMemoryTransactionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&self, tenant_id: TenantId, event: ConsumptionEvent) {
        if let Ok(mut events) = self.events.write() {
            events.push((tenant_id, event));
        }
    }

    pub fn set_order_series(&self, tenant_id: TenantId, item_id: ItemId, series: Vec<f64>) {
        if let Ok(mut orders) = self.orders.write() {
            orders.insert((tenant_id, item_id), series);
        }
    }
}

impl TransactionHistory for InMemoryTransactionHistory {
    fn consumption_events(
        &self,
        tenant_id: TenantId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<ConsumptionEvent>> {
        let events = self
            .events
            .read()
            .map_err(|_| EngineError::dependency_unavailable("transaction history poisoned"))?;
        Ok(events
            .iter()
            .filter(|(t, e)| *t == tenant_id && e.occurred_on >= from && e.occurred_on <= to)
            .map(|(_, e)| e.clone())
            .collect())
    }

    fn order_series(&self, tenant_id: TenantId, item_id: ItemId) -> EngineResult<Vec<f64>> {
        let orders = self
            .orders
            .read()
            .map_err(|_| EngineError::dependency_unavailable("transaction history poisoned"))?;
        Ok(orders.get(&(tenant_id, item_id)).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    items: RwLock<HashMap<(TenantId, ItemId), CatalogItem>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_item(&self, tenant_id: TenantId, item: CatalogItem) {
        if let Ok(mut items) = self.items.write() {
            items.insert((tenant_id, item.item_id), item);
        }
    }
}

impl Catalog for InMemoryCatalog {
    fn active_items(&self, tenant_id: TenantId) -> EngineResult<Vec<CatalogItem>> {
        let items = self
            .items
            .read()
            .map_err(|_| EngineError::dependency_unavailable("catalog poisoned"))?;
        let mut active: Vec<CatalogItem> = items
            .iter()
            .filter(|((t, _), item)| *t == tenant_id && item.active)
            .map(|(_, item)| item.clone())
            .collect();
        active.sort_by_key(|item| item.item_id);
        Ok(active)
    }

    fn item(&self, tenant_id: TenantId, item_id: ItemId) -> EngineResult<CatalogItem> {
        let items = self
            .items
            .read()
            .map_err(|_| EngineError::dependency_unavailable("catalog poisoned"))?;
        items
            .get(&(tenant_id, item_id))
            .cloned()
            .ok_or_else(|| EngineError::not_found(format!("item {item_id}")))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStockLevels {
    stocks: RwLock<HashMap<(TenantId, ItemId), Vec<LocationStock>>>,
    on_order: RwLock<HashMap<(TenantId, ItemId), f64>>,
}

impl InMemoryStockLevels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_stock(&self, tenant_id: TenantId, item_id: ItemId, stocks: Vec<LocationStock>) {
        if let Ok(mut map) = self.stocks.write() {
            map.insert((tenant_id, item_id), stocks);
        }
    }

    pub fn set_on_order(&self, tenant_id: TenantId, item_id: ItemId, qty: f64) {
        if let Ok(mut map) = self.on_order.write() {
            map.insert((tenant_id, item_id), qty);
        }
    }
}

impl StockLevels for InMemoryStockLevels {
    fn stock_by_location(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
    ) -> EngineResult<Vec<LocationStock>> {
        let stocks = self
            .stocks
            .read()
            .map_err(|_| EngineError::dependency_unavailable("stock levels poisoned"))?;
        Ok(stocks.get(&(tenant_id, item_id)).cloned().unwrap_or_default())
    }

    fn on_hand(&self, tenant_id: TenantId, item_id: ItemId) -> EngineResult<f64> {
        Ok(self
            .stock_by_location(tenant_id, item_id)?
            .iter()
            .map(|s| s.on_hand)
            .sum())
    }

    fn on_order(&self, tenant_id: TenantId, item_id: ItemId) -> EngineResult<f64> {
        let map = self
            .on_order
            .read()
            .map_err(|_| EngineError::dependency_unavailable("stock levels poisoned"))?;
        Ok(map.get(&(tenant_id, item_id)).copied().unwrap_or(0.0))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryReceivingHistory {
    receipts: RwLock<Vec<(TenantId, ReceiptRecord)>>,
}

impl InMemoryReceivingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_receipt(&self, tenant_id: TenantId, receipt: ReceiptRecord) {
        if let Ok(mut receipts) = self.receipts.write() {
            receipts.push((tenant_id, receipt));
        }
    }
}

impl ReceivingHistory for InMemoryReceivingHistory {
    fn receipts(
        &self,
        tenant_id: TenantId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<ReceiptRecord>> {
        let receipts = self
            .receipts
            .read()
            .map_err(|_| EngineError::dependency_unavailable("receiving history poisoned"))?;
        Ok(receipts
            .iter()
            .filter(|(t, r)| *t == tenant_id && r.ordered_on >= from && r.ordered_on <= to)
            .map(|(_, r)| r.clone())
            .collect())
    }

    fn suppliers(&self, tenant_id: TenantId) -> EngineResult<Vec<SupplierId>> {
        let receipts = self
            .receipts
            .read()
            .map_err(|_| EngineError::dependency_unavailable("receiving history poisoned"))?;
        let mut ids: Vec<SupplierId> = receipts
            .iter()
            .filter(|(t, _)| *t == tenant_id)
            .map(|(_, r)| r.supplier_id)
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}
