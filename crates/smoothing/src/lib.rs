//! `stocksense-smoothing`
//!
//! **Responsibility:** dampen order-quantity oscillation (the bullwhip
//! effect). Measures how much a tenant's ordering amplifies its underlying
//! demand variability, and recommends exponentially smoothed order quantities
//! against an order-up-to level instead of naive reactive orders.

pub mod bullwhip;
pub mod config;
pub mod smoother;

pub use bullwhip::{BullwhipSeverity, bullwhip_index};
pub use config::SmoothingConfig;
pub use smoother::{SmoothedOrder, smooth_order};
