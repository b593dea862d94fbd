//! Surplus/deficit detection and transshipment pairing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stocksense_core::{EngineError, EngineResult, ItemId, LocationId, SuggestionId, TenantId};

use crate::config::EchelonConfig;
use crate::suggestion::{SuggestionReason, SuggestionStatus, TransshipmentSuggestion};

/// Stock posture of one item at one location.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationStock {
    pub location_id: LocationId,
    pub on_hand: f64,
    pub reorder_point: f64,
    pub safety_stock: f64,
}

impl LocationStock {
    fn validate(&self) -> EngineResult<()> {
        for (name, v) in [
            ("on_hand", self.on_hand),
            ("reorder_point", self.reorder_point),
            ("safety_stock", self.safety_stock),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(EngineError::validation(format!(
                    "{name} must be finite and non-negative, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Buffer target: reorder point plus safety stock.
    fn buffer_target(&self) -> f64 {
        self.reorder_point + self.safety_stock
    }

    /// Units movable without dropping the location below its own reorder
    /// point.
    fn movable_excess(&self) -> f64 {
        (self.on_hand - self.reorder_point).max(0.0)
    }
}

struct Deficit {
    location_id: LocationId,
    need: f64,
}

struct Surplus {
    location_id: LocationId,
    available: f64,
}

fn make_suggestion(
    tenant_id: TenantId,
    item_id: ItemId,
    from: LocationId,
    to: LocationId,
    quantity: f64,
    reason: SuggestionReason,
    as_of: NaiveDate,
) -> TransshipmentSuggestion {
    TransshipmentSuggestion {
        id: SuggestionId::new(),
        tenant_id,
        item_id,
        from_location: from,
        to_location: to,
        quantity,
        reason,
        status: SuggestionStatus::Suggested,
        suggested_on: as_of,
    }
}

/// Greedily pair the largest deficits with the largest surpluses.
fn pair_up(
    tenant_id: TenantId,
    item_id: ItemId,
    mut deficits: Vec<Deficit>,
    mut surpluses: Vec<Surplus>,
    reason: SuggestionReason,
    config: &EchelonConfig,
    as_of: NaiveDate,
) -> Vec<TransshipmentSuggestion> {
    deficits.sort_by(|a, b| {
        b.need
            .total_cmp(&a.need)
            .then_with(|| a.location_id.cmp(&b.location_id))
    });
    surpluses.sort_by(|a, b| {
        b.available
            .total_cmp(&a.available)
            .then_with(|| a.location_id.cmp(&b.location_id))
    });

    let mut suggestions = Vec::new();
    for deficit in &mut deficits {
        for surplus in &mut surpluses {
            if suggestions.len() >= config.max_suggestions {
                return suggestions;
            }
            if deficit.need <= 0.0 {
                break;
            }
            if surplus.available <= 0.0 {
                continue;
            }
            let quantity = deficit.need.min(surplus.available);
            suggestions.push(make_suggestion(
                tenant_id,
                item_id,
                surplus.location_id,
                deficit.location_id,
                quantity,
                reason,
                as_of,
            ));
            deficit.need -= quantity;
            surplus.available -= quantity;
        }
    }
    suggestions
}

/// Routine rebalancing for one item across a tenant's locations.
///
/// A location is in deficit when its on-hand has fallen below its reorder
/// point, and in surplus when it holds more than its buffer target inflated
/// by the configured imbalance threshold. Sources are never drawn below
/// their own reorder point.
pub fn suggest_for_item(
    tenant_id: TenantId,
    item_id: ItemId,
    stocks: &[LocationStock],
    config: &EchelonConfig,
    as_of: NaiveDate,
) -> EngineResult<Vec<TransshipmentSuggestion>> {
    config.validate()?;
    for stock in stocks {
        stock.validate()?;
    }
    if stocks.len() < 2 {
        return Ok(Vec::new());
    }

    let threshold = 1.0 + config.imbalance_pct / 100.0;
    let deficits: Vec<Deficit> = stocks
        .iter()
        .filter(|s| s.on_hand < s.reorder_point)
        .map(|s| Deficit {
            location_id: s.location_id,
            need: s.reorder_point - s.on_hand,
        })
        .collect();
    let surpluses: Vec<Surplus> = stocks
        .iter()
        .filter(|s| s.on_hand > s.buffer_target() * threshold)
        .map(|s| Surplus {
            location_id: s.location_id,
            available: s.movable_excess(),
        })
        .collect();

    Ok(pair_up(
        tenant_id, item_id, deficits, surpluses, SuggestionReason::SurplusDeficit, config, as_of,
    ))
}

/// Emergency sourcing for locations that are completely stocked out.
///
/// Bypasses the imbalance threshold: any sibling holding more than its own
/// reorder point can donate, but still never below that reorder point.
pub fn suggest_emergency(
    tenant_id: TenantId,
    item_id: ItemId,
    stocks: &[LocationStock],
    config: &EchelonConfig,
    as_of: NaiveDate,
) -> EngineResult<Vec<TransshipmentSuggestion>> {
    config.validate()?;
    for stock in stocks {
        stock.validate()?;
    }
    if stocks.len() < 2 {
        return Ok(Vec::new());
    }

    let deficits: Vec<Deficit> = stocks
        .iter()
        .filter(|s| s.on_hand == 0.0 && s.reorder_point > 0.0)
        .map(|s| Deficit {
            location_id: s.location_id,
            need: s.reorder_point,
        })
        .collect();
    let surpluses: Vec<Surplus> = stocks
        .iter()
        .filter(|s| s.movable_excess() > 0.0)
        .map(|s| Surplus {
            location_id: s.location_id,
            available: s.movable_excess(),
        })
        .collect();

    Ok(pair_up(
        tenant_id, item_id, deficits, surpluses, SuggestionReason::Emergency, config, as_of,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()
    }

    fn stock(on_hand: f64, rop: f64, ss: f64) -> LocationStock {
        LocationStock {
            location_id: LocationId::new(),
            on_hand,
            reorder_point: rop,
            safety_stock: ss,
        }
    }

    #[test]
    fn surplus_covers_deficit() {
        let tenant = TenantId::new();
        let item = ItemId::new();
        // Deficit of 30; donor holds 200 against a buffer target of 60.
        let low = stock(20.0, 50.0, 10.0);
        let high = stock(200.0, 50.0, 10.0);
        let config = EchelonConfig::default();

        let suggestions =
            suggest_for_item(tenant, item, &[low, high], &config, today()).unwrap();
        assert_eq!(suggestions.len(), 1);
        let s = &suggestions[0];
        assert_eq!(s.from_location, high.location_id);
        assert_eq!(s.to_location, low.location_id);
        assert_eq!(s.quantity, 30.0);
        assert_eq!(s.reason, SuggestionReason::SurplusDeficit);
        assert_eq!(s.status, SuggestionStatus::Suggested);
    }

    #[test]
    fn source_is_never_drained_below_its_reorder_point() {
        let tenant = TenantId::new();
        let item = ItemId::new();
        // Deficit of 90, but the donor only has 30 above its own reorder
        // point.
        let low = stock(10.0, 100.0, 10.0);
        let high = stock(80.0, 50.0, 5.0);
        let config = EchelonConfig::new(0.0, 50).unwrap();

        let suggestions =
            suggest_for_item(tenant, item, &[low, high], &config, today()).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].quantity, 30.0);
    }

    #[test]
    fn balanced_network_yields_nothing() {
        let tenant = TenantId::new();
        let item = ItemId::new();
        let stocks = [stock(60.0, 50.0, 10.0), stock(65.0, 50.0, 10.0)];
        let config = EchelonConfig::default();
        let suggestions =
            suggest_for_item(tenant, item, &stocks, &config, today()).unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn below_threshold_surplus_is_left_alone() {
        let tenant = TenantId::new();
        let item = ItemId::new();
        // Buffer target 60, threshold 20% → surplus only above 72.
        let low = stock(20.0, 50.0, 10.0);
        let modest = stock(70.0, 50.0, 10.0);
        let config = EchelonConfig::default();
        let suggestions =
            suggest_for_item(tenant, item, &[low, modest], &config, today()).unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn largest_deficit_is_served_first() {
        let tenant = TenantId::new();
        let item = ItemId::new();
        let worst = stock(0.0, 50.0, 10.0);
        let mild = stock(45.0, 50.0, 10.0);
        // Donor can cover only part of the total need.
        let donor = stock(95.0, 50.0, 10.0);
        let config = EchelonConfig::default();

        let suggestions =
            suggest_for_item(tenant, item, &[mild, worst, donor], &config, today()).unwrap();
        assert_eq!(suggestions[0].to_location, worst.location_id);
        assert_eq!(suggestions[0].quantity, 45.0);
    }

    #[test]
    fn emergency_bypasses_the_imbalance_threshold() {
        let tenant = TenantId::new();
        let item = ItemId::new();
        let out = stock(0.0, 40.0, 10.0);
        // Donor sits below the surplus threshold but above its own reorder
        // point.
        let donor = stock(60.0, 30.0, 10.0);
        let config = EchelonConfig::default();

        let routine = suggest_for_item(tenant, item, &[out, donor], &config, today()).unwrap();
        assert!(routine.is_empty());

        let emergency =
            suggest_emergency(tenant, item, &[out, donor], &config, today()).unwrap();
        assert_eq!(emergency.len(), 1);
        assert_eq!(emergency[0].reason, SuggestionReason::Emergency);
        assert_eq!(emergency[0].quantity, 30.0);
        assert_eq!(emergency[0].to_location, out.location_id);
    }

    #[test]
    fn single_location_cannot_rebalance() {
        let tenant = TenantId::new();
        let item = ItemId::new();
        let config = EchelonConfig::default();
        let suggestions =
            suggest_for_item(tenant, item, &[stock(0.0, 50.0, 10.0)], &config, today()).unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn suggestion_cap_is_honored() {
        let tenant = TenantId::new();
        let item = ItemId::new();
        let mut stocks: Vec<LocationStock> =
            (0..5).map(|_| stock(0.0, 50.0, 10.0)).collect();
        stocks.push(stock(1000.0, 50.0, 10.0));
        let config = EchelonConfig::new(20.0, 2).unwrap();
        let suggestions =
            suggest_for_item(tenant, item, &stocks, &config, today()).unwrap();
        assert_eq!(suggestions.len(), 2);
    }

    #[test]
    fn negative_on_hand_is_rejected() {
        let tenant = TenantId::new();
        let item = ItemId::new();
        let bad = stock(-5.0, 50.0, 10.0);
        let config = EchelonConfig::default();
        assert!(suggest_for_item(tenant, item, &[bad, stock(10.0, 5.0, 1.0)], &config, today())
            .is_err());
    }
}
