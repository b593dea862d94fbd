//! `stocksense-supplier`
//!
//! **Responsibility:** score supplier delivery performance against their
//! service-level agreements. Receiving history becomes on-time, fill-rate,
//! and defect statistics; breaches of the agreed targets accrue penalties
//! that inflate the lead time the reorder computation should plan with.

pub mod score;
pub mod sla;

pub use score::{ComplianceStatus, ReceiptRecord, SupplierScore, score_supplier};
pub use sla::{SlaBreach, SlaBreachKind, SlaDefinition};
