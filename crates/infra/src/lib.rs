//! `stocksense-infra`
//!
//! **Responsibility:** wire the pure computation crates into tenant-scoped
//! services over pluggable stores and data collaborators. Everything here is
//! orchestration: read from collaborators, call into a computation crate,
//! upsert the result by its natural key, report per-item outcomes.

pub mod collaborators;
pub mod outcome;
pub mod services;
pub mod store;


pub use collaborators::{
    Catalog, CatalogItem, InMemoryCatalog, InMemoryReceivingHistory, InMemoryStockLevels,
    InMemoryTransactionHistory, ReceivingHistory, StockLevels, TransactionHistory,
};
pub use outcome::{BatchReport, ItemOutcome, OutcomeStatus};
pub use store::{InMemoryTenantStore, TenantStore};
