//! Backtest scoring of forecast methods.
//!
//! The trailing slice of the history is held out, the method is fitted on the
//! remainder, and its projection over the holdout is compared point-by-point
//! against what actually happened.

use serde::{Deserialize, Serialize};

use stocksense_core::{EngineError, EngineResult};

use crate::forecaster::project;
use crate::method::ForecastMethod;

/// Share of the history held out for backtesting.
const HOLDOUT_FRACTION: f64 = 0.2;
/// Cap on the holdout length in periods.
const HOLDOUT_MAX: usize = 14;
/// Minimum holdout length for the metrics to mean anything.
const HOLDOUT_MIN: usize = 3;

/// Point-forecast error metrics over a backtest holdout.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    /// Mean absolute percentage error. `None` when every holdout actual was
    /// zero, since percentage error is undefined there.
    pub mape: Option<f64>,
    pub mae: f64,
    /// Mean signed error; positive means the method over-forecasts.
    pub bias: f64,
    pub rmse: f64,
    pub holdout_periods: usize,
}

impl AccuracyMetrics {
    /// Ranking key for method selection: MAPE when defined, RMSE otherwise.
    /// Lower is better.
    pub fn ranking_score(&self) -> f64 {
        self.mape.unwrap_or(self.rmse)
    }
}

pub(crate) fn holdout_len(history_len: usize) -> usize {
    ((history_len as f64 * HOLDOUT_FRACTION).floor() as usize).min(HOLDOUT_MAX)
}

/// Score one method against the trailing holdout of `history`.
pub fn backtest(method: ForecastMethod, history: &[f64]) -> EngineResult<AccuracyMetrics> {
    let holdout = holdout_len(history.len());
    if holdout < HOLDOUT_MIN {
        return Err(EngineError::insufficient_data(format!(
            "backtest needs a holdout of at least {HOLDOUT_MIN} periods, got {holdout}"
        )));
    }
    let split = history.len() - holdout;
    let train = &history[..split];
    if train.len() < method.min_history() {
        return Err(EngineError::insufficient_data(format!(
            "training slice of {} periods is below the method minimum of {}",
            train.len(),
            method.min_history()
        )));
    }

    let predicted = project(method, train, holdout)?;
    let actual = &history[split..];

    let mut abs_sum = 0.0;
    let mut signed_sum = 0.0;
    let mut sq_sum = 0.0;
    let mut pct_sum = 0.0;
    let mut pct_count = 0usize;
    for (p, a) in predicted.iter().zip(actual) {
        let err = p - a;
        abs_sum += err.abs();
        signed_sum += err;
        sq_sum += err * err;
        if *a > 0.0 {
            pct_sum += (err / a).abs();
            pct_count += 1;
        }
    }
    let n = actual.len() as f64;

    Ok(AccuracyMetrics {
        mape: (pct_count > 0).then(|| pct_sum / pct_count as f64 * 100.0),
        mae: abs_sum / n,
        bias: signed_sum / n,
        rmse: (sq_sum / n).sqrt(),
        holdout_periods: actual.len(),
    })
}
