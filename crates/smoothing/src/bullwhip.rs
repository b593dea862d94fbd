//! Bullwhip measurement: how much ordering amplifies demand variability.

use serde::{Deserialize, Serialize};

use stocksense_core::stats;
use stocksense_core::{EngineError, EngineResult};

/// Index value reported when orders vary but demand does not; the ratio is
/// unbounded there, so it is capped.
const INDEX_CAP: f64 = 10.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BullwhipSeverity {
    Low,
    Moderate,
    High,
    Severe,
}

impl BullwhipSeverity {
    pub fn from_index(index: f64) -> Self {
        if index < 1.0 {
            BullwhipSeverity::Low
        } else if index < 1.5 {
            BullwhipSeverity::Moderate
        } else if index < 2.5 {
            BullwhipSeverity::High
        } else {
            BullwhipSeverity::Severe
        }
    }
}

/// Variance of orders over variance of demand (population variance). An
/// index above 1 means ordering amplifies demand swings.
pub fn bullwhip_index(orders: &[f64], demand: &[f64]) -> EngineResult<(f64, BullwhipSeverity)> {
    if orders.len() < 2 || demand.len() < 2 {
        return Err(EngineError::insufficient_data(
            "bullwhip index needs at least two periods of orders and demand",
        ));
    }
    let order_var = stats::variance_population(orders);
    let demand_var = stats::variance_population(demand);
    let index = if demand_var > 0.0 {
        (order_var / demand_var).min(INDEX_CAP)
    } else if order_var > 0.0 {
        INDEX_CAP
    } else {
        0.0
    };
    Ok((index, BullwhipSeverity::from_index(index)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amplified_orders_score_above_one() {
        let demand = [10.0, 11.0, 9.0, 10.0, 12.0, 8.0];
        let orders = [0.0, 30.0, 0.0, 25.0, 0.0, 35.0];
        let (index, severity) = bullwhip_index(&orders, &demand).unwrap();
        assert!(index > 1.0);
        assert!(severity >= BullwhipSeverity::High);
    }

    #[test]
    fn matching_variability_is_low() {
        let series = [10.0, 11.0, 9.0, 10.0, 12.0, 8.0];
        let (index, severity) = bullwhip_index(&series, &series).unwrap();
        assert!((index - 1.0).abs() < 1e-12);
        assert_eq!(severity, BullwhipSeverity::Moderate);
    }

    #[test]
    fn flat_demand_with_varying_orders_is_capped() {
        let demand = [10.0; 6];
        let orders = [0.0, 50.0, 0.0, 50.0, 0.0, 50.0];
        let (index, severity) = bullwhip_index(&orders, &demand).unwrap();
        assert_eq!(index, 10.0);
        assert_eq!(severity, BullwhipSeverity::Severe);
    }

    #[test]
    fn flat_everything_is_zero() {
        let (index, severity) = bullwhip_index(&[5.0; 4], &[10.0; 4]).unwrap();
        assert_eq!(index, 0.0);
        assert_eq!(severity, BullwhipSeverity::Low);
    }

    #[test]
    fn severity_boundaries() {
        assert_eq!(BullwhipSeverity::from_index(0.99), BullwhipSeverity::Low);
        assert_eq!(BullwhipSeverity::from_index(1.0), BullwhipSeverity::Moderate);
        assert_eq!(BullwhipSeverity::from_index(1.5), BullwhipSeverity::High);
        assert_eq!(BullwhipSeverity::from_index(2.5), BullwhipSeverity::Severe);
    }
}
