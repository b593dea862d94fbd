use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use stocksense_core::{EngineError, EngineResult, ItemId, SuggestionId, TenantId};
use stocksense_echelon::{
    EchelonConfig, TransshipmentSuggestion, suggest_emergency, suggest_for_item,
};

use crate::collaborators::StockLevels;
use crate::services::{EchelonConfigStore, SuggestionStore};
use crate::store::TenantStore;

/// Proposes and tracks transshipments between a tenant's locations.
pub struct EchelonService {
    stock: Arc<dyn StockLevels>,
    configs: EchelonConfigStore,
    suggestions: SuggestionStore,
}

impl EchelonService {
    pub fn new(
        stock: Arc<dyn StockLevels>,
        configs: EchelonConfigStore,
        suggestions: SuggestionStore,
    ) -> Self {
        Self {
            stock,
            configs,
            suggestions,
        }
    }

    pub fn get_config(&self, tenant_id: TenantId) -> EchelonConfig {
        self.configs.get(tenant_id, &()).unwrap_or_default()
    }

    pub fn put_config(&self, tenant_id: TenantId, config: EchelonConfig) -> EngineResult<()> {
        config.validate()?;
        self.configs.upsert(tenant_id, (), config);
        Ok(())
    }

    /// Routine rebalancing suggestions for one item, persisted as pending.
    pub fn suggest(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        as_of: NaiveDate,
    ) -> EngineResult<Vec<TransshipmentSuggestion>> {
        let stocks = self.stock.stock_by_location(tenant_id, item_id)?;
        let config = self.get_config(tenant_id);
        let suggestions = suggest_for_item(tenant_id, item_id, &stocks, &config, as_of)?;
        self.persist(tenant_id, &suggestions);
        Ok(suggestions)
    }

    /// Emergency sourcing for stocked-out locations.
    pub fn suggest_emergency(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        as_of: NaiveDate,
    ) -> EngineResult<Vec<TransshipmentSuggestion>> {
        let stocks = self.stock.stock_by_location(tenant_id, item_id)?;
        let config = self.get_config(tenant_id);
        let suggestions = suggest_emergency(tenant_id, item_id, &stocks, &config, as_of)?;
        self.persist(tenant_id, &suggestions);
        Ok(suggestions)
    }

    fn persist(&self, tenant_id: TenantId, suggestions: &[TransshipmentSuggestion]) {
        for suggestion in suggestions {
            self.suggestions
                .upsert(tenant_id, suggestion.id, suggestion.clone());
        }
        if !suggestions.is_empty() {
            info!(tenant = %tenant_id, count = suggestions.len(), "transshipments suggested");
        }
    }

    /// All stored suggestions, newest first.
    pub fn list(&self, tenant_id: TenantId) -> Vec<TransshipmentSuggestion> {
        let mut all = self.suggestions.list(tenant_id);
        all.sort_by(|a, b| b.suggested_on.cmp(&a.suggested_on).then(a.id.cmp(&b.id)));
        all
    }

    pub fn mark_created(
        &self,
        tenant_id: TenantId,
        id: SuggestionId,
    ) -> EngineResult<TransshipmentSuggestion> {
        self.transition(tenant_id, id, true)
    }

    pub fn mark_cancelled(
        &self,
        tenant_id: TenantId,
        id: SuggestionId,
    ) -> EngineResult<TransshipmentSuggestion> {
        self.transition(tenant_id, id, false)
    }

    fn transition(
        &self,
        tenant_id: TenantId,
        id: SuggestionId,
        accept: bool,
    ) -> EngineResult<TransshipmentSuggestion> {
        let mut suggestion = self
            .suggestions
            .get(tenant_id, &id)
            .ok_or_else(|| EngineError::not_found(format!("suggestion {id}")))?;
        if accept {
            suggestion.mark_created()?;
        } else {
            suggestion.mark_cancelled()?;
        }
        self.suggestions.upsert(tenant_id, id, suggestion.clone());
        Ok(suggestion)
    }
}
