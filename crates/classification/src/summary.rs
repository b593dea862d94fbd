//! Assortment-level rollup of a classification run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stocksense_core::TenantId;

use crate::classify::{AbcClass, ClassificationResult, XyzClass};

/// Counts per class and per combined matrix cell for one tenant's latest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    pub tenant_id: TenantId,
    pub total_items: usize,
    pub abc_counts: BTreeMap<AbcClass, usize>,
    pub xyz_counts: BTreeMap<XyzClass, usize>,
    /// 3×3 matrix: only items with both axes assigned appear here.
    pub matrix: BTreeMap<(AbcClass, XyzClass), usize>,
    /// Items missing an ABC class (zero-value assortment).
    pub unclassified_abc: usize,
    /// Items missing an XYZ class (too little history to measure variability).
    pub unclassified_xyz: usize,
}

impl ClassificationSummary {
    pub fn from_results(tenant_id: TenantId, results: &[ClassificationResult]) -> Self {
        let mut abc_counts = BTreeMap::new();
        let mut xyz_counts = BTreeMap::new();
        let mut matrix = BTreeMap::new();
        let mut unclassified_abc = 0;
        let mut unclassified_xyz = 0;

        for result in results {
            match result.abc {
                Some(class) => *abc_counts.entry(class).or_insert(0) += 1,
                None => unclassified_abc += 1,
            }
            match result.xyz {
                Some(class) => *xyz_counts.entry(class).or_insert(0) += 1,
                None => unclassified_xyz += 1,
            }
            if let Some(cell) = result.matrix_cell() {
                *matrix.entry(cell).or_insert(0) += 1;
            }
        }

        Self {
            tenant_id,
            total_items: results.len(),
            abc_counts,
            xyz_counts,
            matrix,
            unclassified_abc,
            unclassified_xyz,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ClassificationInput, classify_tenant};
    use chrono::NaiveDate;
    use stocksense_core::ItemId;

    #[test]
    fn summary_accounts_for_every_item() {
        let tenant = TenantId::new();
        let inputs = vec![
            ClassificationInput {
                item_id: ItemId::new(),
                basis_value: 900.0,
                demand_series: vec![10.0, 10.0, 10.0],
            },
            ClassificationInput {
                item_id: ItemId::new(),
                basis_value: 80.0,
                demand_series: vec![0.0, 0.0, 5.0],
            },
            ClassificationInput {
                item_id: ItemId::new(),
                basis_value: 20.0,
                demand_series: vec![1.0, 0.0, 9.0],
            },
        ];
        let computed_at = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let results = classify_tenant(tenant, &inputs, computed_at).unwrap();
        let summary = ClassificationSummary::from_results(tenant, &results);

        assert_eq!(summary.total_items, 3);
        let abc_total: usize = summary.abc_counts.values().sum();
        assert_eq!(abc_total + summary.unclassified_abc, 3);
        let xyz_total: usize = summary.xyz_counts.values().sum();
        assert_eq!(xyz_total + summary.unclassified_xyz, 3);
        // One item had a single non-zero period and gets no XYZ class.
        assert_eq!(summary.unclassified_xyz, 1);
        let matrix_total: usize = summary.matrix.values().sum();
        assert_eq!(matrix_total, 2);
    }
}
