use serde::{Deserialize, Serialize};

use stocksense_core::{EngineError, EngineResult};

/// The targets a supplier has agreed to.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlaDefinition {
    pub max_lead_time_days: f64,
    pub min_fill_rate_pct: f64,
    pub max_defect_rate_pct: f64,
    /// Lead-time penalty applied per breached target, in percent.
    pub penalty_pct_per_breach: f64,
}

impl SlaDefinition {
    pub fn validate(&self) -> EngineResult<()> {
        if !self.max_lead_time_days.is_finite() || self.max_lead_time_days <= 0.0 {
            return Err(EngineError::validation(format!(
                "max_lead_time_days must be positive, got {}",
                self.max_lead_time_days
            )));
        }
        for (name, v) in [
            ("min_fill_rate_pct", self.min_fill_rate_pct),
            ("max_defect_rate_pct", self.max_defect_rate_pct),
        ] {
            if !v.is_finite() || !(0.0..=100.0).contains(&v) {
                return Err(EngineError::validation(format!(
                    "{name} must be in 0..=100, got {v}"
                )));
            }
        }
        if !self.penalty_pct_per_breach.is_finite() || self.penalty_pct_per_breach < 0.0 {
            return Err(EngineError::validation(format!(
                "penalty_pct_per_breach must be finite and non-negative, got {}",
                self.penalty_pct_per_breach
            )));
        }
        Ok(())
    }
}

impl Default for SlaDefinition {
    fn default() -> Self {
        Self {
            max_lead_time_days: 14.0,
            min_fill_rate_pct: 90.0,
            max_defect_rate_pct: 5.0,
            penalty_pct_per_breach: 2.0,
        }
    }
}

/// Which SLA target a supplier missed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaBreachKind {
    LeadTime,
    FillRate,
    DefectRate,
}

/// One missed target with the agreed value and the observed one.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlaBreach {
    pub kind: SlaBreachKind,
    pub target: f64,
    pub actual: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_definition_is_valid() {
        assert!(SlaDefinition::default().validate().is_ok());
    }

    #[test]
    fn percentage_targets_must_be_in_range() {
        let mut sla = SlaDefinition::default();
        sla.min_fill_rate_pct = 101.0;
        assert!(sla.validate().is_err());
        sla.min_fill_rate_pct = 90.0;
        sla.max_defect_rate_pct = -1.0;
        assert!(sla.validate().is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let raw = r#"{"max_lead_time_days":14.0,"min_fill_rate_pct":90.0,"max_defect_rate_pct":5.0,"penalty_pct_per_breach":2.0,"bonus":1.0}"#;
        assert!(serde_json::from_str::<SlaDefinition>(raw).is_err());
    }
}
