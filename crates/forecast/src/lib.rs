//! `stocksense-forecast`
//!
//! **Responsibility:** project future daily demand per item from its history
//! using a small family of methods (moving average, exponential smoothing,
//! Holt linear trend), score each method by backtesting on a holdout slice,
//! and pick the best method automatically when the caller doesn't choose one.
//!
//! Every method is deterministic: the same history always produces the same
//! forecast, which is what makes regeneration a safe replace.

pub mod accuracy;
pub mod forecaster;
pub mod method;

pub use accuracy::{AccuracyMetrics, backtest};
pub use forecaster::{ForecastPoint, ForecastRecord, generate, generate_auto};
pub use method::ForecastMethod;
