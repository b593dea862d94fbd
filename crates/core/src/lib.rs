//! `stocksense-core` — engine foundation building blocks.
//!
//! This crate contains **pure** primitives (no storage or transport concerns):
//! strongly-typed identifiers, the engine error taxonomy, deterministic
//! statistics helpers, and the pagination envelope shared by read operations.

pub mod error;
pub mod id;
pub mod page;
pub mod stats;

pub use error::{EngineError, EngineResult};
pub use id::{ItemId, LocationId, SuggestionId, SupplierId, TenantId};
pub use page::{Page, PageRequest};
