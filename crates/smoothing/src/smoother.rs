use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stocksense_core::stats;
use stocksense_core::{EngineError, EngineResult, ItemId, TenantId};

use crate::bullwhip::{BullwhipSeverity, bullwhip_index};
use crate::config::SmoothingConfig;

/// A smoothed order recommendation for one item at one review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothedOrder {
    pub tenant_id: TenantId,
    pub item_id: ItemId,
    /// Exponentially smoothed daily demand estimate.
    pub smoothed_daily_demand: f64,
    /// Target inventory position covering lead time plus one review period.
    pub order_up_to_level: f64,
    /// Quantity to order now: order-up-to minus current position, floored at
    /// zero.
    pub recommended_qty: f64,
    /// What a naive reactive policy would order, for comparison.
    pub naive_qty: f64,
    /// How much smaller the smoothed order is than the naive one, percent.
    pub reduction_pct: f64,
    pub bullwhip_index: f64,
    pub bullwhip_severity: BullwhipSeverity,
    pub computed_at: NaiveDate,
}

/// Exponentially smooth a daily demand series. The level is seeded with the
/// mean of the first review period rather than the first observation, so one
/// spiky opening day cannot anchor the whole series.
fn smoothed_level(demand: &[f64], config: &SmoothingConfig) -> f64 {
    let seed_len = (config.review_period_days as usize).min(demand.len());
    let mut level = stats::mean(&demand[..seed_len]);
    for value in &demand[seed_len..] {
        level = config.alpha * value + (1.0 - config.alpha) * level;
    }
    level
}

/// Compute a smoothed order recommendation.
///
/// `daily_demand` and `order_history` are ascending per-period series;
/// `on_hand + on_order` is the current inventory position the recommendation
/// nets against.
#[allow(clippy::too_many_arguments)]
pub fn smooth_order(
    tenant_id: TenantId,
    item_id: ItemId,
    daily_demand: &[f64],
    order_history: &[f64],
    on_hand: f64,
    on_order: f64,
    lead_time_days: f64,
    safety_stock: f64,
    config: &SmoothingConfig,
    computed_at: NaiveDate,
) -> EngineResult<SmoothedOrder> {
    config.validate()?;
    if !lead_time_days.is_finite() || lead_time_days <= 0.0 {
        return Err(EngineError::validation(format!(
            "lead_time_days must be positive, got {lead_time_days}"
        )));
    }
    if !safety_stock.is_finite() || safety_stock < 0.0 {
        return Err(EngineError::validation(
            "safety_stock must be finite and non-negative",
        ));
    }
    if daily_demand.len() < 2 {
        return Err(EngineError::insufficient_data(
            "order smoothing needs at least two demand periods",
        ));
    }
    if daily_demand.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(EngineError::validation(
            "demand values must be finite and non-negative",
        ));
    }

    let smoothed = smoothed_level(daily_demand, config);
    let order_up_to =
        smoothed * (lead_time_days + config.review_period_days as f64) + safety_stock;
    let position = on_hand + on_order;
    // Whole units: round the shortfall up so the target is actually reached.
    let recommended = (order_up_to - position).max(0.0).ceil();

    let avg_daily = stats::mean(daily_demand);
    let naive = avg_daily * lead_time_days * 2.0;
    let reduction_pct = if naive > 0.0 {
        ((naive - recommended) / naive * 100.0).max(0.0)
    } else {
        0.0
    };

    let (index, severity) = bullwhip_index(order_history, daily_demand)
        .unwrap_or((0.0, BullwhipSeverity::Low));

    Ok(SmoothedOrder {
        tenant_id,
        item_id,
        smoothed_daily_demand: smoothed,
        order_up_to_level: order_up_to,
        recommended_qty: recommended,
        naive_qty: naive,
        reduction_pct,
        bullwhip_index: index,
        bullwhip_severity: severity,
        computed_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()
    }

    fn run(
        demand: &[f64],
        orders: &[f64],
        on_hand: f64,
        config: &SmoothingConfig,
    ) -> SmoothedOrder {
        smooth_order(
            TenantId::new(),
            ItemId::new(),
            demand,
            orders,
            on_hand,
            0.0,
            5.0,
            6.0,
            config,
            today(),
        )
        .unwrap()
    }

    #[test]
    fn flat_demand_yields_order_up_to_arithmetic() {
        let config = SmoothingConfig::default();
        let demand = [10.0; 28];
        let order = run(&demand, &[10.0; 28], 50.0, &config);
        // Smoothed level is exactly 10: OUT = 10·(5+7)+6 = 126, minus 50 on
        // hand leaves 76.
        assert!((order.smoothed_daily_demand - 10.0).abs() < 1e-9);
        assert!((order.order_up_to_level - 126.0).abs() < 1e-9);
        assert!((order.recommended_qty - 76.0).abs() < 1e-9);
    }

    #[test]
    fn spike_moves_smoothed_level_less_than_mean() {
        let config = SmoothingConfig::default();
        let mut demand = vec![10.0; 27];
        demand.push(100.0);
        let order = run(&demand, &[10.0; 28], 0.0, &config);
        let mean_with_spike = stats::mean(&demand);
        assert!(order.smoothed_daily_demand < mean_with_spike + 15.0);
        assert!(order.smoothed_daily_demand > 10.0);
        // α=0.2: the spike contributes a fifth of its deviation.
        assert!((order.smoothed_daily_demand - 28.0).abs() < 1.0);
    }

    #[test]
    fn well_stocked_position_recommends_nothing() {
        let config = SmoothingConfig::default();
        let order = run(&[10.0; 28], &[10.0; 28], 500.0, &config);
        assert_eq!(order.recommended_qty, 0.0);
        assert_eq!(order.reduction_pct, 100.0);
    }

    #[test]
    fn alpha_one_tracks_the_last_observation() {
        let config = SmoothingConfig::new(1.0, 7).unwrap();
        let mut demand = vec![10.0; 27];
        demand.push(42.0);
        let order = run(&demand, &[10.0; 28], 0.0, &config);
        assert!((order.smoothed_daily_demand - 42.0).abs() < 1e-9);
    }

    #[test]
    fn on_order_counts_toward_position() {
        let config = SmoothingConfig::default();
        let with_pipeline = smooth_order(
            TenantId::new(),
            ItemId::new(),
            &[10.0; 28],
            &[10.0; 28],
            50.0,
            26.0,
            5.0,
            6.0,
            &config,
            today(),
        )
        .unwrap();
        assert!((with_pipeline.recommended_qty - 50.0).abs() < 1e-9);
    }

    #[test]
    fn erratic_orders_flag_bullwhip() {
        let config = SmoothingConfig::default();
        let demand = [9.0, 10.0, 11.0, 10.0, 9.0, 11.0, 10.0, 10.0];
        let orders = [0.0, 80.0, 0.0, 0.0, 70.0, 0.0, 90.0, 0.0];
        let order = run(&demand, &orders, 0.0, &config);
        assert!(order.bullwhip_index > 2.5);
        assert_eq!(order.bullwhip_severity, BullwhipSeverity::Severe);
    }

    #[test]
    fn short_series_is_insufficient() {
        let err = smooth_order(
            TenantId::new(),
            ItemId::new(),
            &[10.0],
            &[],
            0.0,
            0.0,
            5.0,
            0.0,
            &SmoothingConfig::default(),
            today(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientData(_)));
    }
}
