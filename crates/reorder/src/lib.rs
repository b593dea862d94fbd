//! `stocksense-reorder`
//!
//! **Responsibility:** compute the replenishment parameters for an item —
//! safety stock, reorder point, and economic order quantity — from its demand
//! statistics, lead time, and target service level, and track manual
//! overrides so planners can pin values the computation must not clobber.

pub mod compute;
pub mod params;

pub use compute::{compute_params, economic_order_quantity};
pub use params::{CostInputs, DemandStats, ManualOverride, ParamSource, ReorderParams};
