//! `stocksense-classification`
//!
//! **Responsibility:** segment a tenant's items along two axes: ABC by share
//! of consumption value, XYZ by demand variability. The combined class drives
//! how aggressively downstream components buffer each item.
//!
//! Classification is a whole-assortment computation: an item's ABC class only
//! means anything relative to every other item, so the entry point takes the
//! full tenant assortment and returns a result per item.

pub mod classify;
pub mod summary;

pub use classify::{
    AbcClass, ClassificationInput, ClassificationResult, XyzClass, classify_tenant,
};
pub use summary::ClassificationSummary;
