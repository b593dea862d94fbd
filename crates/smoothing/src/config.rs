use serde::{Deserialize, Serialize};

use stocksense_core::{EngineError, EngineResult};

/// Tenant-level smoothing configuration. Validated on construction and again
/// after deserialization; an invalid config is rejected, never clamped.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmoothingConfig {
    /// Exponential smoothing factor in (0, 1]. 1 disables smoothing.
    pub alpha: f64,
    /// Days between order reviews, 1..=365.
    pub review_period_days: u32,
}

impl SmoothingConfig {
    pub const DEFAULT_ALPHA: f64 = 0.2;
    pub const DEFAULT_REVIEW_PERIOD_DAYS: u32 = 7;

    pub fn new(alpha: f64, review_period_days: u32) -> EngineResult<Self> {
        let config = Self {
            alpha,
            review_period_days,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 || self.alpha > 1.0 {
            return Err(EngineError::validation(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        if self.review_period_days == 0 || self.review_period_days > 365 {
            return Err(EngineError::validation(format!(
                "review_period_days must be in 1..=365, got {}",
                self.review_period_days
            )));
        }
        Ok(())
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            alpha: Self::DEFAULT_ALPHA,
            review_period_days: Self::DEFAULT_REVIEW_PERIOD_DAYS,
        }
    }
}
