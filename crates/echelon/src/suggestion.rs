use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stocksense_core::{EngineError, EngineResult, ItemId, LocationId, SuggestionId, TenantId};

/// Why a transshipment was proposed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionReason {
    /// Routine rebalancing: one location holds surplus while another sits
    /// below its reorder point.
    SurplusDeficit,
    /// A location is fully stocked out and a sibling can cover immediately.
    Emergency,
}

/// Lifecycle of a suggestion. Terminal states are Created and Cancelled.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Suggested,
    Created,
    Cancelled,
}

/// A proposed stock move between two locations of the same tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransshipmentSuggestion {
    pub id: SuggestionId,
    pub tenant_id: TenantId,
    pub item_id: ItemId,
    pub from_location: LocationId,
    pub to_location: LocationId,
    pub quantity: f64,
    pub reason: SuggestionReason,
    pub status: SuggestionStatus,
    pub suggested_on: NaiveDate,
}

impl TransshipmentSuggestion {
    /// Accept the suggestion. Only a pending suggestion can be accepted.
    pub fn mark_created(&mut self) -> EngineResult<()> {
        self.transition(SuggestionStatus::Created)
    }

    /// Reject the suggestion. Only a pending suggestion can be cancelled.
    pub fn mark_cancelled(&mut self) -> EngineResult<()> {
        self.transition(SuggestionStatus::Cancelled)
    }

    fn transition(&mut self, next: SuggestionStatus) -> EngineResult<()> {
        if self.status != SuggestionStatus::Suggested {
            return Err(EngineError::validation(format!(
                "suggestion {} is already {:?} and cannot become {next:?}",
                self.id, self.status
            )));
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> TransshipmentSuggestion {
        TransshipmentSuggestion {
            id: SuggestionId::new(),
            tenant_id: TenantId::new(),
            item_id: ItemId::new(),
            from_location: LocationId::new(),
            to_location: LocationId::new(),
            quantity: 10.0,
            reason: SuggestionReason::SurplusDeficit,
            status: SuggestionStatus::Suggested,
            suggested_on: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
        }
    }

    #[test]
    fn pending_can_be_created_once() {
        let mut s = pending();
        s.mark_created().unwrap();
        assert_eq!(s.status, SuggestionStatus::Created);
        assert!(s.mark_created().is_err());
        assert!(s.mark_cancelled().is_err());
    }

    #[test]
    fn pending_can_be_cancelled() {
        let mut s = pending();
        s.mark_cancelled().unwrap();
        assert_eq!(s.status, SuggestionStatus::Cancelled);
        assert!(s.mark_created().is_err());
    }
}
