use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stocksense_core::stats;
use stocksense_core::{EngineResult, ItemId, TenantId};

/// Cumulative value share below which an item is still an A.
const ABC_A_CUTOFF: f64 = 0.80;
/// Cumulative value share below which an item is still a B.
const ABC_B_CUTOFF: f64 = 0.95;
/// Coefficient-of-variation ceiling for X (inclusive).
const XYZ_X_CUTOFF: f64 = 0.5;
/// Coefficient-of-variation ceiling for Y (inclusive).
const XYZ_Y_CUTOFF: f64 = 1.0;
/// XYZ needs at least this many non-zero periods to say anything.
const XYZ_MIN_NONZERO_PERIODS: usize = 2;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum XyzClass {
    X,
    Y,
    Z,
}

/// Per-item input to a classification run: the value basis (revenue where
/// prices are known, consumed quantity otherwise) and the demand series the
/// variability axis is measured on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationInput {
    pub item_id: ItemId,
    pub basis_value: f64,
    pub demand_series: Vec<f64>,
}

/// Outcome of one classification run for one item. Either axis may be absent:
/// ABC when the whole assortment has zero basis value, XYZ when the series has
/// too few non-zero periods to measure variability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub tenant_id: TenantId,
    pub item_id: ItemId,
    pub abc: Option<AbcClass>,
    pub xyz: Option<XyzClass>,
    pub basis_value: f64,
    pub basis_cv: Option<f64>,
    pub computed_at: NaiveDate,
}

impl ClassificationResult {
    pub fn matrix_cell(&self) -> Option<(AbcClass, XyzClass)> {
        Some((self.abc?, self.xyz?))
    }
}

fn abc_for_cumulative_share(share_before: f64) -> AbcClass {
    // Class by the cumulative share *before* this item: the item that carries
    // the total across a cutoff still belongs to the class below the cutoff.
    if share_before < ABC_A_CUTOFF {
        AbcClass::A
    } else if share_before < ABC_B_CUTOFF {
        AbcClass::B
    } else {
        AbcClass::C
    }
}

fn xyz_for_series(series: &[f64]) -> (Option<XyzClass>, Option<f64>) {
    let non_zero = series.iter().filter(|v| **v > 0.0).count();
    if non_zero < XYZ_MIN_NONZERO_PERIODS {
        return (None, None);
    }
    let Some(cv) = stats::coefficient_of_variation(series) else {
        return (None, None);
    };
    let class = if cv <= XYZ_X_CUTOFF {
        XyzClass::X
    } else if cv <= XYZ_Y_CUTOFF {
        XyzClass::Y
    } else {
        XyzClass::Z
    };
    (Some(class), Some(cv))
}

/// Classify a whole tenant assortment in one pass.
///
/// Deterministic: items are ranked by basis value descending with item id as
/// the tie-break, so re-running on the same inputs yields identical classes.
/// Items with zero basis value when the assortment total is positive rank last
/// and land in C; when the entire assortment has zero value no item gets an
/// ABC class at all.
pub fn classify_tenant(
    tenant_id: TenantId,
    inputs: &[ClassificationInput],
    computed_at: NaiveDate,
) -> EngineResult<Vec<ClassificationResult>> {
    let total_value: f64 = inputs.iter().map(|i| i.basis_value.max(0.0)).sum();

    let mut ranked: Vec<&ClassificationInput> = inputs.iter().collect();
    ranked.sort_by(|a, b| {
        b.basis_value
            .total_cmp(&a.basis_value)
            .then_with(|| a.item_id.cmp(&b.item_id))
    });

    let mut results = Vec::with_capacity(ranked.len());
    let mut cumulative = 0.0;
    for input in ranked {
        let abc = if total_value > 0.0 {
            let class = abc_for_cumulative_share(cumulative / total_value);
            cumulative += input.basis_value.max(0.0);
            Some(class)
        } else {
            None
        };
        let (xyz, cv) = xyz_for_series(&input.demand_series);
        results.push(ClassificationResult {
            tenant_id,
            item_id: input.item_id,
            abc,
            xyz,
            basis_value: input.basis_value,
            basis_cv: cv,
            computed_at,
        });
    }

    Ok(results)
}
