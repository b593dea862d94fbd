//! Deterministic statistics helpers.
//!
//! Every function here is a pure function of its inputs; the engine's
//! idempotence guarantees depend on that.

use crate::error::{EngineError, EngineResult};

pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / (xs.len() as f64)
}

/// Sample standard deviation (n-1).
///
/// Used where a window of observations estimates an underlying demand
/// distribution (reorder parameters).
pub fn stddev_sample(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs);
    let var = xs
        .iter()
        .map(|x| {
            let d = x - m;
            d * d
        })
        .sum::<f64>()
        / ((xs.len() - 1) as f64);
    var.sqrt()
}

/// Population variance (n).
pub fn variance_population(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs);
    xs.iter()
        .map(|x| {
            let d = x - m;
            d * d
        })
        .sum::<f64>()
        / (xs.len() as f64)
}

/// Population standard deviation (n).
pub fn stddev_population(xs: &[f64]) -> f64 {
    variance_population(xs).sqrt()
}

/// Coefficient of variation σ/μ over the series (population σ).
///
/// `None` when the mean is zero or the series is too short for a stddev.
pub fn coefficient_of_variation(xs: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    let m = mean(xs);
    if m <= 0.0 {
        return None;
    }
    Some(stddev_population(xs) / m)
}

/// Nearest-rank percentile; `p` in [0, 100]. Sorts a copy of the input.
pub fn percentile(xs: &[f64], p: f64) -> Option<f64> {
    if xs.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal));
    let rank = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    let idx = rank.max(1).min(sorted.len()) - 1;
    Some(sorted[idx])
}

/// Inverse standard normal CDF (probit) via Acklam's rational approximation.
///
/// Absolute error below 1.15e-9 over the open unit interval, which is far
/// tighter than any safety-stock rounding downstream.
pub fn inverse_normal_cdf(p: f64) -> EngineResult<f64> {
    if !(p.is_finite() && p > 0.0 && p < 1.0) {
        return Err(EngineError::validation(format!(
            "probability must be in (0, 1) exclusive, got {p}"
        )));
    }

    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;
    const P_HIGH: f64 = 1.0 - P_LOW;

    let z = if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= P_HIGH {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    Ok(z)
}

/// z-value for a target cycle service level.
///
/// Validates the service level into (0, 1) exclusive; out-of-range values fail
/// rather than being clamped.
pub fn z_for_service_level(service_level: f64) -> EngineResult<f64> {
    inverse_normal_cdf(service_level).map_err(|_| {
        EngineError::validation(format!(
            "service level must be in (0, 1) exclusive, got {service_level}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_stddev_of_known_series() {
        // The 7-day series from the reorder worked example.
        let xs = [10.0, 12.0, 9.0, 11.0, 10.0, 13.0, 8.0];
        assert!((mean(&xs) - 10.4286).abs() < 1e-3);
        assert!((stddev_sample(&xs) - 1.7182).abs() < 1e-3);
    }

    #[test]
    fn stddev_sample_needs_two_points() {
        assert_eq!(stddev_sample(&[5.0]), 0.0);
        assert_eq!(stddev_sample(&[]), 0.0);
    }

    #[test]
    fn cv_is_none_for_zero_mean() {
        assert_eq!(coefficient_of_variation(&[0.0, 0.0, 0.0]), None);
        assert_eq!(coefficient_of_variation(&[1.0]), None);
    }

    #[test]
    fn probit_matches_textbook_values() {
        assert!((inverse_normal_cdf(0.95).unwrap() - 1.6449).abs() < 1e-3);
        assert!((inverse_normal_cdf(0.99).unwrap() - 2.3263).abs() < 1e-3);
        assert!((inverse_normal_cdf(0.5).unwrap()).abs() < 1e-9);
        assert!((inverse_normal_cdf(0.90).unwrap() - 1.2816).abs() < 1e-3);
    }

    #[test]
    fn probit_rejects_out_of_range() {
        assert!(inverse_normal_cdf(0.0).is_err());
        assert!(inverse_normal_cdf(1.0).is_err());
        assert!(inverse_normal_cdf(-0.2).is_err());
        assert!(inverse_normal_cdf(f64::NAN).is_err());
    }

    #[test]
    fn percentile_nearest_rank() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        assert_eq!(percentile(&xs, 90.0), Some(9.0));
        assert_eq!(percentile(&xs, 50.0), Some(5.0));
        assert_eq!(percentile(&[], 50.0), None);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Probit is monotone over its domain.
            #[test]
            fn probit_is_monotone(p1 in 0.001f64..0.999, p2 in 0.001f64..0.999) {
                let (lo, hi) = if p1 < p2 { (p1, p2) } else { (p2, p1) };
                prop_assume!(hi - lo > 1e-6);
                let z_lo = inverse_normal_cdf(lo).unwrap();
                let z_hi = inverse_normal_cdf(hi).unwrap();
                prop_assert!(z_lo < z_hi);
            }

            /// Sample stddev is never negative and is zero for constant series.
            #[test]
            fn stddev_non_negative(xs in proptest::collection::vec(0.0f64..1e6, 2..50)) {
                prop_assert!(stddev_sample(&xs) >= 0.0);
            }
        }
    }
}
