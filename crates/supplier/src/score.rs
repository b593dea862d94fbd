//! Supplier performance scoring from receiving history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stocksense_core::stats;
use stocksense_core::{EngineError, EngineResult, SupplierId, TenantId};

use crate::sla::{SlaBreach, SlaBreachKind, SlaDefinition};

const WEIGHT_ON_TIME: f64 = 0.4;
const WEIGHT_FILL: f64 = 0.4;
const WEIGHT_BREACH_FREE: f64 = 0.2;

/// One purchase-order receipt. `received_on` is `None` while the order is
/// still open; open orders count against neither lead time nor on-time rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub supplier_id: SupplierId,
    pub ordered_qty: f64,
    pub received_qty: f64,
    pub rejected_qty: f64,
    pub ordered_on: NaiveDate,
    pub received_on: Option<NaiveDate>,
}

impl ReceiptRecord {
    fn validate(&self) -> EngineResult<()> {
        for (name, v) in [
            ("ordered_qty", self.ordered_qty),
            ("received_qty", self.received_qty),
            ("rejected_qty", self.rejected_qty),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(EngineError::validation(format!(
                    "{name} must be finite and non-negative, got {v}"
                )));
            }
        }
        if self.ordered_qty == 0.0 {
            return Err(EngineError::validation("ordered_qty must be positive"));
        }
        if self.rejected_qty > self.received_qty {
            return Err(EngineError::validation(
                "rejected_qty cannot exceed received_qty",
            ));
        }
        if let Some(received_on) = self.received_on {
            if received_on < self.ordered_on {
                return Err(EngineError::validation(
                    "received_on precedes ordered_on",
                ));
            }
        }
        Ok(())
    }

    fn lead_time_days(&self) -> Option<f64> {
        self.received_on
            .map(|r| (r - self.ordered_on).num_days() as f64)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    AtRisk,
    Breached,
}

impl ComplianceStatus {
    fn from_score(score: f64) -> Self {
        if score < 60.0 {
            ComplianceStatus::Breached
        } else if score < 80.0 {
            ComplianceStatus::AtRisk
        } else {
            ComplianceStatus::Compliant
        }
    }
}

/// A supplier's scorecard over a scoring window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierScore {
    pub tenant_id: TenantId,
    pub supplier_id: SupplierId,
    /// Deliveries arriving within the agreed lead time, percent.
    pub on_time_pct: f64,
    /// Quantity received over quantity ordered, percent.
    pub fill_rate_pct: f64,
    pub defect_rate_pct: f64,
    pub avg_lead_time_days: f64,
    pub p90_lead_time_days: f64,
    pub breaches: Vec<SlaBreach>,
    /// Lead-time penalty accrued from breaches, percent.
    pub penalty_pct: f64,
    /// Weighted composite: 40% on-time, 40% fill rate, 20% breach-free.
    pub composite_score: f64,
    pub status: ComplianceStatus,
    pub receipts_scored: usize,
    pub scored_on: NaiveDate,
}

impl SupplierScore {
    /// The lead time replenishment should plan with: observed average
    /// inflated by the accrued penalty.
    pub fn effective_lead_time_days(&self) -> f64 {
        self.avg_lead_time_days * (1.0 + self.penalty_pct / 100.0)
    }
}

/// Score one supplier's receipts against an SLA.
///
/// Without an agreed SLA the default targets still shape the on-time
/// component, but no breaches are recorded and no penalty accrues; a
/// supplier cannot breach an agreement that was never made.
pub fn score_supplier(
    tenant_id: TenantId,
    supplier_id: SupplierId,
    receipts: &[ReceiptRecord],
    sla: Option<&SlaDefinition>,
    scored_on: NaiveDate,
) -> EngineResult<SupplierScore> {
    if let Some(sla) = sla {
        sla.validate()?;
    }
    let own: Vec<&ReceiptRecord> = receipts
        .iter()
        .filter(|r| r.supplier_id == supplier_id)
        .collect();
    if own.is_empty() {
        return Err(EngineError::insufficient_data(
            "supplier has no receipts to score",
        ));
    }
    for receipt in &own {
        receipt.validate()?;
    }

    let targets = sla.copied().unwrap_or_default();

    let lead_times: Vec<f64> = own.iter().filter_map(|r| r.lead_time_days()).collect();
    let avg_lead = if lead_times.is_empty() {
        0.0
    } else {
        stats::mean(&lead_times)
    };
    let p90_lead = stats::percentile(&lead_times, 90.0).unwrap_or(0.0);
    let on_time_pct = if lead_times.is_empty() {
        0.0
    } else {
        let on_time = lead_times
            .iter()
            .filter(|lt| **lt <= targets.max_lead_time_days)
            .count();
        on_time as f64 / lead_times.len() as f64 * 100.0
    };

    let ordered: f64 = own.iter().map(|r| r.ordered_qty).sum();
    let received: f64 = own.iter().map(|r| r.received_qty).sum();
    let rejected: f64 = own.iter().map(|r| r.rejected_qty).sum();
    let fill_rate_pct = (received / ordered * 100.0).min(100.0);
    let defect_rate_pct = if received > 0.0 {
        rejected / received * 100.0
    } else {
        0.0
    };

    let mut breaches = Vec::new();
    if sla.is_some() {
        if !lead_times.is_empty() && avg_lead > targets.max_lead_time_days {
            breaches.push(SlaBreach {
                kind: SlaBreachKind::LeadTime,
                target: targets.max_lead_time_days,
                actual: avg_lead,
            });
        }
        if fill_rate_pct < targets.min_fill_rate_pct {
            breaches.push(SlaBreach {
                kind: SlaBreachKind::FillRate,
                target: targets.min_fill_rate_pct,
                actual: fill_rate_pct,
            });
        }
        if defect_rate_pct > targets.max_defect_rate_pct {
            breaches.push(SlaBreach {
                kind: SlaBreachKind::DefectRate,
                target: targets.max_defect_rate_pct,
                actual: defect_rate_pct,
            });
        }
    }
    let penalty_pct = breaches.len() as f64 * targets.penalty_pct_per_breach;

    let breach_free = if breaches.is_empty() { 100.0 } else { 0.0 };
    let composite_score = WEIGHT_ON_TIME * on_time_pct
        + WEIGHT_FILL * fill_rate_pct
        + WEIGHT_BREACH_FREE * breach_free;

    Ok(SupplierScore {
        tenant_id,
        supplier_id,
        on_time_pct,
        fill_rate_pct,
        defect_rate_pct,
        avg_lead_time_days: avg_lead,
        p90_lead_time_days: p90_lead,
        breaches,
        penalty_pct,
        composite_score,
        status: ComplianceStatus::from_score(composite_score),
        receipts_scored: own.len(),
        scored_on,
    })
}
