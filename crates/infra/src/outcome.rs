//! Per-item outcome reporting for bulk operations.
//!
//! A bulk run never aborts on the first bad item: every item gets an outcome,
//! and the report tallies them.

use serde::{Deserialize, Serialize};

use stocksense_core::{EngineError, ItemId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Ok,
    /// Deliberately not processed (e.g. pinned by a manual override, or too
    /// little history for any result to exist yet).
    Skipped,
    Failed,
}

/// What happened to one item in a bulk run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub item_id: ItemId,
    pub status: OutcomeStatus,
    pub detail: Option<String>,
}

impl ItemOutcome {
    pub fn ok(item_id: ItemId) -> Self {
        Self {
            item_id,
            status: OutcomeStatus::Ok,
            detail: None,
        }
    }

    pub fn skipped(item_id: ItemId, detail: impl Into<String>) -> Self {
        Self {
            item_id,
            status: OutcomeStatus::Skipped,
            detail: Some(detail.into()),
        }
    }

    pub fn failed(item_id: ItemId, error: &EngineError) -> Self {
        Self {
            item_id,
            status: OutcomeStatus::Failed,
            detail: Some(error.to_string()),
        }
    }

    /// Recoverable shortfalls (not enough history yet) are skips, not
    /// failures; everything else is a failure.
    pub fn from_error(item_id: ItemId, error: &EngineError) -> Self {
        if error.is_recoverable() {
            Self::skipped(item_id, error.to_string())
        } else {
            Self::failed(item_id, error)
        }
    }
}

/// Summary of a bulk run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    pub fn new(outcomes: Vec<ItemOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn ok_count(&self) -> usize {
        self.count(OutcomeStatus::Ok)
    }

    pub fn skipped_count(&self) -> usize {
        self.count(OutcomeStatus::Skipped)
    }

    pub fn failed_count(&self) -> usize {
        self.count(OutcomeStatus::Failed)
    }

    fn count(&self, status: OutcomeStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_becomes_a_skip() {
        let item = ItemId::new();
        let outcome =
            ItemOutcome::from_error(item, &EngineError::insufficient_data("3 periods"));
        assert_eq!(outcome.status, OutcomeStatus::Skipped);

        let outcome = ItemOutcome::from_error(item, &EngineError::validation("bad alpha"));
        assert_eq!(outcome.status, OutcomeStatus::Failed);
    }

    #[test]
    fn report_tallies_by_status() {
        let report = BatchReport::new(vec![
            ItemOutcome::ok(ItemId::new()),
            ItemOutcome::ok(ItemId::new()),
            ItemOutcome::skipped(ItemId::new(), "thin history"),
        ]);
        assert_eq!(report.ok_count(), 2);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.failed_count(), 0);
    }
}
