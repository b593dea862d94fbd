use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use stocksense_core::{EngineError, EngineResult, SupplierId, TenantId};
use stocksense_supplier::{SlaDefinition, SupplierScore, score_supplier};

use crate::collaborators::ReceivingHistory;
use crate::services::{SlaStore, SupplierScoreStore};
use crate::store::TenantStore;

/// Manages SLA definitions and scores suppliers against them.
pub struct SlaService {
    receiving: Arc<dyn ReceivingHistory>,
    definitions: SlaStore,
    scores: SupplierScoreStore,
}

impl SlaService {
    pub fn new(
        receiving: Arc<dyn ReceivingHistory>,
        definitions: SlaStore,
        scores: SupplierScoreStore,
    ) -> Self {
        Self {
            receiving,
            definitions,
            scores,
        }
    }

    pub fn get_definition(
        &self,
        tenant_id: TenantId,
        supplier_id: SupplierId,
    ) -> Option<SlaDefinition> {
        self.definitions.get(tenant_id, &supplier_id)
    }

    /// Store an SLA for a supplier. Invalid definitions are rejected whole.
    pub fn set_definition(
        &self,
        tenant_id: TenantId,
        supplier_id: SupplierId,
        sla: SlaDefinition,
    ) -> EngineResult<()> {
        sla.validate()?;
        self.definitions.upsert(tenant_id, supplier_id, sla);
        info!(tenant = %tenant_id, supplier = %supplier_id, "sla definition stored");
        Ok(())
    }

    /// Score one supplier over the inclusive receipt window and store the
    /// scorecard.
    pub fn score(
        &self,
        tenant_id: TenantId,
        supplier_id: SupplierId,
        from: NaiveDate,
        to: NaiveDate,
        as_of: NaiveDate,
    ) -> EngineResult<SupplierScore> {
        if to < from {
            return Err(EngineError::validation("scoring window end precedes start"));
        }
        let receipts = self.receiving.receipts(tenant_id, from, to)?;
        let sla = self.get_definition(tenant_id, supplier_id);
        let score = score_supplier(tenant_id, supplier_id, &receipts, sla.as_ref(), as_of)?;
        self.scores.upsert(tenant_id, supplier_id, score.clone());
        Ok(score)
    }

    /// Score every supplier with receiving history in the window. Suppliers
    /// without enough receipts to score are skipped.
    pub fn score_all(
        &self,
        tenant_id: TenantId,
        from: NaiveDate,
        to: NaiveDate,
        as_of: NaiveDate,
    ) -> EngineResult<Vec<SupplierScore>> {
        let suppliers = self.receiving.suppliers(tenant_id)?;
        let mut scores = Vec::with_capacity(suppliers.len());
        for supplier_id in suppliers {
            match self.score(tenant_id, supplier_id, from, to, as_of) {
                Ok(score) => scores.push(score),
                Err(err) if err.is_recoverable() => {
                    warn!(tenant = %tenant_id, supplier = %supplier_id, error = %err,
                          "supplier skipped during bulk scoring");
                }
                Err(err) => return Err(err),
            }
        }
        info!(tenant = %tenant_id, scored = scores.len(), "supplier scoring complete");
        Ok(scores)
    }

    pub fn get_score(&self, tenant_id: TenantId, supplier_id: SupplierId) -> Option<SupplierScore> {
        self.scores.get(tenant_id, &supplier_id)
    }
}
