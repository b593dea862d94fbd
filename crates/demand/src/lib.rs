//! `stocksense-demand`
//!
//! **Responsibility:** turn raw consumption events (sales, stock-outs) into a
//! complete per-item, per-period demand series, and derive velocity statistics
//! from it.
//!
//! Aggregation is a pure recompute-and-replace over a window: re-running with
//! an overlapping window never double-counts. Items with zero events in a
//! period get an explicit zero snapshot, because downstream statistics depend
//! on complete series.

pub mod aggregator;
pub mod snapshot;
pub mod velocity;

pub use aggregator::{AggregationWindow, aggregate};
pub use snapshot::{ConsumptionEvent, ConsumptionKind, DemandSnapshot, Granularity, SnapshotKey};
pub use velocity::{DemandVelocity, Trend, demand_velocity, simple_moving_average};
