use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use stocksense_core::stats;
use stocksense_core::{EngineError, EngineResult, ItemId, TenantId};

use crate::accuracy::{AccuracyMetrics, backtest};
use crate::method::ForecastMethod;

/// z-multiplier of the confidence band (roughly an 80% interval).
const BAND_Z: f64 = 1.28;

/// One projected day with its confidence band. Quantities are floored at
/// zero; demand cannot be negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_qty: f64,
    pub lower: f64,
    pub upper: f64,
}

/// A generated forecast for one item and one method. Regenerating for the
/// same (item, method) replaces the previous record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub tenant_id: TenantId,
    pub item_id: ItemId,
    pub method: ForecastMethod,
    pub horizon_days: u32,
    pub lookback_periods: usize,
    pub generated_at: NaiveDate,
    pub points: Vec<ForecastPoint>,
    /// Backtest metrics, present when the history was long enough to score.
    pub accuracy: Option<AccuracyMetrics>,
}

/// Project raw point forecasts `horizon` steps ahead of `history`.
pub(crate) fn project(
    method: ForecastMethod,
    history: &[f64],
    horizon: usize,
) -> EngineResult<Vec<f64>> {
    if history.len() < method.min_history() {
        return Err(EngineError::insufficient_data(format!(
            "{method:?} needs at least {} periods of history, got {}",
            method.min_history(),
            history.len()
        )));
    }
    let projection = match method {
        ForecastMethod::SimpleMovingAverage => {
            let window = &history[history.len() - ForecastMethod::SMA_WINDOW..];
            let level = stats::mean(window);
            vec![level; horizon]
        }
        ForecastMethod::ExponentialSmoothing => {
            let alpha = ForecastMethod::EMA_ALPHA;
            let mut level = history[0];
            for value in &history[1..] {
                level = alpha * value + (1.0 - alpha) * level;
            }
            vec![level; horizon]
        }
        ForecastMethod::HoltLinearTrend => {
            let alpha = ForecastMethod::HOLT_ALPHA;
            let beta = ForecastMethod::HOLT_BETA;
            let mut level = history[0];
            let mut trend = history[1] - history[0];
            for value in &history[1..] {
                let prev_level = level;
                level = alpha * value + (1.0 - alpha) * (level + trend);
                trend = beta * (level - prev_level) + (1.0 - beta) * trend;
            }
            (1..=horizon).map(|h| level + trend * h as f64).collect()
        }
    };
    Ok(projection.into_iter().map(|v| v.max(0.0)).collect())
}

fn points_from_projection(
    projection: Vec<f64>,
    history: &[f64],
    history_end: NaiveDate,
) -> Vec<ForecastPoint> {
    let sigma = stats::stddev_population(history);
    projection
        .into_iter()
        .enumerate()
        .map(|(step, predicted)| {
            // Uncertainty widens with the forecast distance.
            let margin = BAND_Z * sigma * ((step + 1) as f64).sqrt();
            ForecastPoint {
                date: history_end + Duration::days(step as i64 + 1),
                predicted_qty: predicted,
                lower: (predicted - margin).max(0.0),
                upper: predicted + margin,
            }
        })
        .collect()
}

/// Generate a forecast with an explicitly chosen method.
#[allow(clippy::too_many_arguments)]
pub fn generate(
    tenant_id: TenantId,
    item_id: ItemId,
    method: ForecastMethod,
    history: &[f64],
    history_end: NaiveDate,
    horizon_days: u32,
    generated_at: NaiveDate,
) -> EngineResult<ForecastRecord> {
    if horizon_days == 0 || horizon_days > 365 {
        return Err(EngineError::validation(format!(
            "horizon_days must be in 1..=365, got {horizon_days}"
        )));
    }
    if history.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(EngineError::validation(
            "history values must be finite and non-negative",
        ));
    }

    let projection = project(method, history, horizon_days as usize)?;
    let accuracy = backtest(method, history).ok();

    Ok(ForecastRecord {
        tenant_id,
        item_id,
        method,
        horizon_days,
        lookback_periods: history.len(),
        generated_at,
        points: points_from_projection(projection, history, history_end),
        accuracy,
    })
}

/// Generate forecasts with every applicable method and select the best one by
/// backtest score. Returns the selected method together with all generated
/// records, best first.
#[allow(clippy::too_many_arguments)]
pub fn generate_auto(
    tenant_id: TenantId,
    item_id: ItemId,
    history: &[f64],
    history_end: NaiveDate,
    horizon_days: u32,
    generated_at: NaiveDate,
) -> EngineResult<(ForecastMethod, Vec<ForecastRecord>)> {
    let applicable = ForecastMethod::applicable(history.len());
    if applicable.is_empty() {
        return Err(EngineError::insufficient_data(format!(
            "no forecast method is applicable to {} periods of history",
            history.len()
        )));
    }

    let mut records = Vec::with_capacity(applicable.len());
    for method in applicable {
        records.push(generate(
            tenant_id,
            item_id,
            method,
            history,
            history_end,
            horizon_days,
            generated_at,
        )?);
    }
    // Scored records first, ranked by backtest score; unscored last.
    records.sort_by(|a, b| match (&a.accuracy, &b.accuracy) {
        (Some(x), Some(y)) => x.ranking_score().total_cmp(&y.ranking_score()),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    let selected = records[0].method;
    Ok((selected, records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates() -> (NaiveDate, NaiveDate) {
        let end = NaiveDate::from_ymd_opt(2026, 4, 30).unwrap();
        (end, end + Duration::days(1))
    }

    #[test]
    fn flat_history_forecasts_flat() {
        let (end, first_day) = dates();
        let history = vec![10.0; 30];
        let record = generate(
            TenantId::new(),
            ItemId::new(),
            ForecastMethod::SimpleMovingAverage,
            &history,
            end,
            14,
            end,
        )
        .unwrap();
        assert_eq!(record.points.len(), 14);
        assert_eq!(record.points[0].date, first_day);
        assert!(record.points.iter().all(|p| p.predicted_qty == 10.0));
        // Zero variance history gives degenerate bands.
        assert!(record.points.iter().all(|p| p.lower == 10.0 && p.upper == 10.0));
    }

    #[test]
    fn bands_widen_with_distance() {
        let (end, _) = dates();
        let history: Vec<f64> = (0..30).map(|i| 10.0 + (i % 5) as f64).collect();
        let record = generate(
            TenantId::new(),
            ItemId::new(),
            ForecastMethod::ExponentialSmoothing,
            &history,
            end,
            14,
            end,
        )
        .unwrap();
        let width = |p: &ForecastPoint| p.upper - p.lower;
        assert!(width(&record.points[13]) > width(&record.points[0]));
        assert!(record.points.iter().all(|p| p.lower >= 0.0));
    }

    #[test]
    fn holt_extends_a_linear_trend() {
        let (end, _) = dates();
        let history: Vec<f64> = (1..=30).map(|i| i as f64).collect();
        let record = generate(
            TenantId::new(),
            ItemId::new(),
            ForecastMethod::HoltLinearTrend,
            &history,
            end,
            7,
            end,
        )
        .unwrap();
        // A rising trend keeps rising.
        for pair in record.points.windows(2) {
            assert!(pair[1].predicted_qty > pair[0].predicted_qty);
        }
        assert!(record.points[0].predicted_qty > 25.0);
    }

    #[test]
    fn declining_trend_is_floored_at_zero() {
        let (end, _) = dates();
        let history: Vec<f64> = (0..30).map(|i| (30.0 - i as f64).max(0.0)).collect();
        let record = generate(
            TenantId::new(),
            ItemId::new(),
            ForecastMethod::HoltLinearTrend,
            &history,
            end,
            60,
            end,
        )
        .unwrap();
        assert!(record.points.iter().all(|p| p.predicted_qty >= 0.0));
    }

    #[test]
    fn short_history_is_insufficient() {
        let (end, _) = dates();
        let err = generate(
            TenantId::new(),
            ItemId::new(),
            ForecastMethod::ExponentialSmoothing,
            &[1.0; 10],
            end,
            7,
            end,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientData(_)));
    }

    #[test]
    fn auto_generates_every_applicable_method() {
        let (end, _) = dates();
        let history = vec![10.0; 30];
        let (selected, records) = generate_auto(
            TenantId::new(),
            ItemId::new(),
            &history,
            end,
            14,
            end,
        )
        .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(selected, records[0].method);
        assert!(records.iter().all(|r| r.accuracy.is_some()));
    }

    #[test]
    fn auto_with_no_applicable_method_fails() {
        let (end, _) = dates();
        let err =
            generate_auto(TenantId::new(), ItemId::new(), &[1.0; 3], end, 7, end).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientData(_)));
    }

    #[test]
    fn same_inputs_reproduce_the_same_forecast() {
        let (end, _) = dates();
        let history: Vec<f64> = (0..30).map(|i| (i % 7) as f64 + 3.0).collect();
        let tenant = TenantId::new();
        let item = ItemId::new();
        let a = generate(
            tenant,
            item,
            ForecastMethod::HoltLinearTrend,
            &history,
            end,
            14,
            end,
        )
        .unwrap();
        let b = generate(
            tenant,
            item,
            ForecastMethod::HoltLinearTrend,
            &history,
            end,
            14,
            end,
        )
        .unwrap();
        assert_eq!(a, b);
    }
}
