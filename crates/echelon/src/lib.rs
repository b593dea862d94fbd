//! `stocksense-echelon`
//!
//! **Responsibility:** rebalance stock across a tenant's locations. Detects
//! surplus/deficit imbalances for an item and proposes transshipments from
//! locations holding excess to locations at risk, without ever draining a
//! source below its own reorder point.

pub mod balancer;
pub mod config;
pub mod suggestion;

pub use balancer::{LocationStock, suggest_emergency, suggest_for_item};
pub use config::EchelonConfig;
pub use suggestion::{SuggestionReason, SuggestionStatus, TransshipmentSuggestion};
