use serde::{Deserialize, Serialize};

/// Forecasting methods, ordered from least to most demanding of history.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    SimpleMovingAverage,
    ExponentialSmoothing,
    HoltLinearTrend,
}

impl ForecastMethod {
    /// Window of the moving-average method.
    pub const SMA_WINDOW: usize = 7;
    /// Smoothing factor of single exponential smoothing.
    pub const EMA_ALPHA: f64 = 0.2;
    /// Level smoothing factor of Holt's method.
    pub const HOLT_ALPHA: f64 = 0.3;
    /// Trend smoothing factor of Holt's method.
    pub const HOLT_BETA: f64 = 0.1;

    pub const ALL: [ForecastMethod; 3] = [
        ForecastMethod::SimpleMovingAverage,
        ForecastMethod::ExponentialSmoothing,
        ForecastMethod::HoltLinearTrend,
    ];

    /// Minimum number of daily periods the method needs to produce a forecast.
    pub fn min_history(&self) -> usize {
        match self {
            ForecastMethod::SimpleMovingAverage => 7,
            ForecastMethod::ExponentialSmoothing => 14,
            ForecastMethod::HoltLinearTrend => 14,
        }
    }

    /// Methods whose history requirement the series satisfies.
    pub fn applicable(history_len: usize) -> Vec<ForecastMethod> {
        Self::ALL
            .into_iter()
            .filter(|m| history_len >= m.min_history())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applicability_grows_with_history() {
        assert!(ForecastMethod::applicable(3).is_empty());
        assert_eq!(
            ForecastMethod::applicable(7),
            vec![ForecastMethod::SimpleMovingAverage]
        );
        assert_eq!(ForecastMethod::applicable(14).len(), 3);
    }
}
