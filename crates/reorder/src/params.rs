use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stocksense_core::{EngineError, EngineResult, ItemId, TenantId};

/// Demand statistics feeding the reorder computation. Daily basis; the
/// standard deviation is the sample deviation of the daily series.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandStats {
    pub mean_daily: f64,
    pub stddev_daily: f64,
    /// Number of daily periods the statistics were computed from.
    pub periods: usize,
}

/// Cost inputs for the EOQ term. Unit cost is optional: without it EOQ is
/// simply not computed.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostInputs {
    pub unit_cost: Option<f64>,
    /// Fixed cost of placing one order.
    pub ordering_cost: f64,
    /// Annual carrying rate as a fraction of unit cost.
    pub carrying_rate: f64,
}

impl CostInputs {
    pub const DEFAULT_ORDERING_COST: f64 = 500.0;
    pub const DEFAULT_CARRYING_RATE: f64 = 0.25;
}

impl Default for CostInputs {
    fn default() -> Self {
        Self {
            unit_cost: None,
            ordering_cost: Self::DEFAULT_ORDERING_COST,
            carrying_rate: Self::DEFAULT_CARRYING_RATE,
        }
    }
}

/// Whether the stored parameters came from the computation or a planner.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamSource {
    Computed,
    Manual,
}

/// Replenishment parameters for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderParams {
    pub tenant_id: TenantId,
    pub item_id: ItemId,
    pub safety_stock: f64,
    pub reorder_point: f64,
    /// `None` when the cost inputs needed for EOQ were unavailable. Never
    /// substituted with zero.
    pub economic_order_qty: Option<f64>,
    pub service_level: f64,
    pub lead_time_days: f64,
    pub source: ParamSource,
    pub computed_at: NaiveDate,
}

/// A planner-supplied override. All-or-nothing: if any field is invalid the
/// whole override is rejected and the stored parameters are untouched.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManualOverride {
    pub safety_stock: Option<f64>,
    pub reorder_point: Option<f64>,
    pub economic_order_qty: Option<f64>,
    /// Pins the lead time replanning will use, overriding catalog and
    /// supplier-derived values.
    pub lead_time_days: Option<f64>,
}

impl ManualOverride {
    pub fn validate(&self) -> EngineResult<()> {
        if self.safety_stock.is_none()
            && self.reorder_point.is_none()
            && self.economic_order_qty.is_none()
            && self.lead_time_days.is_none()
        {
            return Err(EngineError::validation(
                "override must set at least one field",
            ));
        }
        for (name, value) in [
            ("safety_stock", self.safety_stock),
            ("reorder_point", self.reorder_point),
            ("economic_order_qty", self.economic_order_qty),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(EngineError::validation(format!(
                        "{name} must be finite and non-negative, got {v}"
                    )));
                }
            }
        }
        if let Some(lead) = self.lead_time_days {
            if !lead.is_finite() || lead <= 0.0 {
                return Err(EngineError::validation(format!(
                    "lead_time_days must be positive, got {lead}"
                )));
            }
        }
        Ok(())
    }

    /// Apply the override on top of existing parameters, marking them Manual.
    pub fn apply(&self, params: &ReorderParams, as_of: NaiveDate) -> EngineResult<ReorderParams> {
        self.validate()?;
        let mut next = params.clone();
        if let Some(ss) = self.safety_stock {
            next.safety_stock = ss;
        }
        if let Some(rop) = self.reorder_point {
            next.reorder_point = rop;
        }
        if let Some(eoq) = self.economic_order_qty {
            next.economic_order_qty = Some(eoq);
        }
        if let Some(lead) = self.lead_time_days {
            next.lead_time_days = lead;
        }
        next.source = ParamSource::Manual;
        next.computed_at = as_of;
        Ok(next)
    }
}
