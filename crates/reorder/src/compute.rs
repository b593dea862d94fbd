//! Safety stock, reorder point, and EOQ formulas.
//!
//! Safety stock covers demand variability over lead time at the target
//! service level: `SS = z · σ_daily · √lead_time`. The reorder point adds
//! expected lead-time demand: `ROP = mean_daily · lead_time + SS`. EOQ is the
//! classic Wilson lot size `√(2DS/H)` on annualized demand.

use chrono::NaiveDate;

use stocksense_core::stats::z_for_service_level;
use stocksense_core::{EngineError, EngineResult, ItemId, TenantId};

use crate::params::{CostInputs, DemandStats, ParamSource, ReorderParams};

const DAYS_PER_YEAR: f64 = 365.0;

/// Wilson EOQ on annualized daily demand. `None` whenever a required cost
/// input is missing or non-positive; a missing EOQ is reported as missing,
/// never as zero.
pub fn economic_order_quantity(mean_daily: f64, costs: &CostInputs) -> Option<f64> {
    let unit_cost = costs.unit_cost?;
    if unit_cost <= 0.0 || costs.ordering_cost <= 0.0 || costs.carrying_rate <= 0.0 {
        return None;
    }
    let annual_demand = mean_daily * DAYS_PER_YEAR;
    if annual_demand <= 0.0 {
        return None;
    }
    let holding_cost = unit_cost * costs.carrying_rate;
    Some((2.0 * annual_demand * costs.ordering_cost / holding_cost).sqrt())
}

/// Compute replenishment parameters for one item.
pub fn compute_params(
    tenant_id: TenantId,
    item_id: ItemId,
    demand: &DemandStats,
    lead_time_days: f64,
    service_level: f64,
    costs: &CostInputs,
    computed_at: NaiveDate,
) -> EngineResult<ReorderParams> {
    if !lead_time_days.is_finite() || lead_time_days <= 0.0 {
        return Err(EngineError::validation(format!(
            "lead_time_days must be positive, got {lead_time_days}"
        )));
    }
    if demand.periods < 2 {
        return Err(EngineError::insufficient_data(
            "reorder parameters need at least two demand periods",
        ));
    }
    if !demand.mean_daily.is_finite() || demand.mean_daily < 0.0 {
        return Err(EngineError::validation(
            "mean daily demand must be finite and non-negative",
        ));
    }
    if !demand.stddev_daily.is_finite() || demand.stddev_daily < 0.0 {
        return Err(EngineError::validation(
            "demand standard deviation must be finite and non-negative",
        ));
    }
    let z = z_for_service_level(service_level)?;

    let safety_stock = (z * demand.stddev_daily * lead_time_days.sqrt()).max(0.0);
    let reorder_point = demand.mean_daily * lead_time_days + safety_stock;

    Ok(ReorderParams {
        tenant_id,
        item_id,
        safety_stock,
        reorder_point,
        economic_order_qty: economic_order_quantity(demand.mean_daily, costs),
        service_level,
        lead_time_days,
        source: ParamSource::Computed,
        computed_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stocksense_core::stats::{mean, stddev_sample};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
    }

    #[test]
    fn worked_example_matches_hand_calculation() {
        // Daily series [10,12,9,11,10,13,8]: mean ≈ 10.43, sample σ ≈ 1.72.
        // At 95% service and 5-day lead: SS ≈ 6.33, ROP ≈ 58.5.
        let series = [10.0, 12.0, 9.0, 11.0, 10.0, 13.0, 8.0];
        let demand = DemandStats {
            mean_daily: mean(&series),
            stddev_daily: stddev_sample(&series),
            periods: series.len(),
        };
        let params = compute_params(
            TenantId::new(),
            ItemId::new(),
            &demand,
            5.0,
            0.95,
            &CostInputs::default(),
            today(),
        )
        .unwrap();
        assert!((params.safety_stock - 6.33).abs() < 0.05);
        assert!((params.reorder_point - 58.5).abs() < 0.1);
        assert_eq!(params.source, ParamSource::Computed);
    }

    #[test]
    fn missing_unit_cost_leaves_eoq_absent() {
        let demand = DemandStats {
            mean_daily: 10.0,
            stddev_daily: 2.0,
            periods: 30,
        };
        let params = compute_params(
            TenantId::new(),
            ItemId::new(),
            &demand,
            5.0,
            0.95,
            &CostInputs::default(),
            today(),
        )
        .unwrap();
        assert_eq!(params.economic_order_qty, None);
    }

    #[test]
    fn eoq_follows_wilson_formula() {
        let costs = CostInputs {
            unit_cost: Some(20.0),
            ordering_cost: 500.0,
            carrying_rate: 0.25,
        };
        // D = 10 · 365 = 3650, S = 500, H = 5 → √(2·3650·500/5) = √730000.
        let eoq = economic_order_quantity(10.0, &costs).unwrap();
        assert!((eoq - 730_000_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn zero_demand_yields_no_eoq() {
        let costs = CostInputs {
            unit_cost: Some(20.0),
            ..CostInputs::default()
        };
        assert_eq!(economic_order_quantity(0.0, &costs), None);
    }

    #[test]
    fn higher_service_level_needs_more_safety_stock() {
        let demand = DemandStats {
            mean_daily: 10.0,
            stddev_daily: 2.0,
            periods: 30,
        };
        let lo = compute_params(
            TenantId::new(),
            ItemId::new(),
            &demand,
            5.0,
            0.90,
            &CostInputs::default(),
            today(),
        )
        .unwrap();
        let hi = compute_params(
            TenantId::new(),
            ItemId::new(),
            &demand,
            5.0,
            0.99,
            &CostInputs::default(),
            today(),
        )
        .unwrap();
        assert!(hi.safety_stock > lo.safety_stock);
        assert!(hi.reorder_point > lo.reorder_point);
    }

    #[test]
    fn rejects_bad_inputs() {
        let demand = DemandStats {
            mean_daily: 10.0,
            stddev_daily: 2.0,
            periods: 30,
        };
        let costs = CostInputs::default();
        assert!(matches!(
            compute_params(TenantId::new(), ItemId::new(), &demand, 0.0, 0.95, &costs, today()),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            compute_params(TenantId::new(), ItemId::new(), &demand, 5.0, 1.0, &costs, today()),
            Err(EngineError::Validation(_))
        ));
        let short = DemandStats {
            mean_daily: 10.0,
            stddev_daily: 0.0,
            periods: 1,
        };
        assert!(matches!(
            compute_params(TenantId::new(), ItemId::new(), &short, 5.0, 0.95, &costs, today()),
            Err(EngineError::InsufficientData(_))
        ));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn params_are_never_negative(
                mean_daily in 0.0f64..1000.0,
                stddev in 0.0f64..500.0,
                lead in 0.5f64..60.0,
                service in 0.51f64..0.999,
            ) {
                let demand = DemandStats { mean_daily, stddev_daily: stddev, periods: 30 };
                let params = compute_params(
                    TenantId::new(),
                    ItemId::new(),
                    &demand,
                    lead,
                    service,
                    &CostInputs::default(),
                    NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
                ).unwrap();
                prop_assert!(params.safety_stock >= 0.0);
                prop_assert!(params.reorder_point >= params.safety_stock);
            }
        }
    }
}
