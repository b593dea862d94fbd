use serde::{Deserialize, Serialize};

use stocksense_core::{EngineError, EngineResult};

/// Tenant-level balancing configuration.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EchelonConfig {
    /// How far above its buffer target a location must sit, in percent, to
    /// count as holding surplus.
    pub imbalance_pct: f64,
    /// Hard cap on suggestions returned per run.
    pub max_suggestions: usize,
}

impl EchelonConfig {
    pub const DEFAULT_IMBALANCE_PCT: f64 = 20.0;
    pub const DEFAULT_MAX_SUGGESTIONS: usize = 50;

    pub fn new(imbalance_pct: f64, max_suggestions: usize) -> EngineResult<Self> {
        let config = Self {
            imbalance_pct,
            max_suggestions,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !self.imbalance_pct.is_finite() || self.imbalance_pct < 0.0 {
            return Err(EngineError::validation(format!(
                "imbalance_pct must be finite and non-negative, got {}",
                self.imbalance_pct
            )));
        }
        if self.max_suggestions == 0 {
            return Err(EngineError::validation("max_suggestions must be >= 1"));
        }
        Ok(())
    }
}

impl Default for EchelonConfig {
    fn default() -> Self {
        Self {
            imbalance_pct: Self::DEFAULT_IMBALANCE_PCT,
            max_suggestions: Self::DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(EchelonConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(EchelonConfig::new(-1.0, 50).is_err());
        assert!(EchelonConfig::new(20.0, 0).is_err());
        assert!(EchelonConfig::new(f64::INFINITY, 50).is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let raw = r#"{"imbalance_pct":20.0,"max_suggestions":50,"mode":"greedy"}"#;
        assert!(serde_json::from_str::<EchelonConfig>(raw).is_err());
    }
}
