//! Tenant-scoped orchestration services.
//!
//! Each service composes a computation crate with the stores and
//! collaborators it needs. Tenancy is always an explicit parameter; no
//! service carries ambient tenant state.

pub mod classification;
pub mod demand;
pub mod echelon;
pub mod forecast;
pub mod reorder;
pub mod sla;
pub mod smoothing;

use std::sync::Arc;

use stocksense_classification::ClassificationResult;
use stocksense_core::ItemId;
use stocksense_demand::{DemandSnapshot, SnapshotKey};
use stocksense_echelon::{EchelonConfig, TransshipmentSuggestion};
use stocksense_forecast::{ForecastMethod, ForecastRecord};
use stocksense_reorder::ReorderParams;
use stocksense_smoothing::{SmoothedOrder, SmoothingConfig};
use stocksense_supplier::{SlaDefinition, SupplierScore};

use crate::store::TenantStore;

pub use classification::ClassificationService;
pub use demand::DemandService;
pub use echelon::EchelonService;
pub use forecast::ForecastService;
pub use reorder::ReorderService;
pub use sla::SlaService;
pub use smoothing::SmoothingService;

pub type SnapshotStore = Arc<dyn TenantStore<SnapshotKey, DemandSnapshot>>;
pub type ClassificationStore = Arc<dyn TenantStore<ItemId, ClassificationResult>>;
pub type ReorderParamsStore = Arc<dyn TenantStore<ItemId, ReorderParams>>;
pub type ForecastStore = Arc<dyn TenantStore<(ItemId, ForecastMethod), ForecastRecord>>;
pub type SmoothedOrderStore = Arc<dyn TenantStore<ItemId, SmoothedOrder>>;
pub type SmoothingConfigStore = Arc<dyn TenantStore<(), SmoothingConfig>>;
pub type EchelonConfigStore = Arc<dyn TenantStore<(), EchelonConfig>>;
pub type SuggestionStore =
    Arc<dyn TenantStore<stocksense_core::SuggestionId, TransshipmentSuggestion>>;
pub type SlaStore = Arc<dyn TenantStore<stocksense_core::SupplierId, SlaDefinition>>;
pub type SupplierScoreStore = Arc<dyn TenantStore<stocksense_core::SupplierId, SupplierScore>>;
