//! Rolling baseline normalization
//!
//! A baseline is a mean/standard-deviation summary of a metric's recent
//! history. New observations are normalized against it as z-scores before
//! entering the recovery composite. Standard deviations are floored at 0.001
//! so a flat history never produces a degenerate divisor.

use serde::{Deserialize, Serialize};

/// Minimum standard deviation carried by any constructed baseline
pub const STD_DEV_FLOOR: f64 = 0.001;

/// Rolling baseline summary for a single metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineResult {
    /// Mean of the sampled window
    pub mean: f64,
    /// Population standard deviation, floored at 0.001
    pub standard_deviation: f64,
    /// Number of values the summary was computed from
    pub sample_count: usize,
    /// Window length the summary covers, in days
    pub window_days: usize,
}

impl BaselineResult {
    /// A baseline is usable once it has at least 3 samples and positive spread
    pub fn is_valid(&self) -> bool {
        self.sample_count >= 3 && self.standard_deviation > 0.0
    }
}

/// Arithmetic mean; 0.0 for an empty slice
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0.0 for fewer than two values
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Compute a rolling baseline from a historical series (oldest first)
///
/// Takes the last `window_days` values when that window holds at least
/// `minimum_samples`; otherwise falls back to the last `minimum_samples`
/// values of the full series, reporting the fallback length as the window.
/// Returns `None` when even the full series is too short.
pub fn compute_baseline(
    values: &[f64],
    window_days: usize,
    minimum_samples: usize,
) -> Option<BaselineResult> {
    if values.is_empty() {
        return None;
    }

    let recent = &values[values.len().saturating_sub(window_days)..];
    if recent.len() >= minimum_samples {
        return Some(BaselineResult {
            mean: mean(recent),
            standard_deviation: std_dev(recent).max(STD_DEV_FLOOR),
            sample_count: recent.len(),
            window_days,
        });
    }

    if values.len() >= minimum_samples {
        let fallback = &values[values.len() - minimum_samples..];
        return Some(BaselineResult {
            mean: mean(fallback),
            standard_deviation: std_dev(fallback).max(STD_DEV_FLOOR),
            sample_count: fallback.len(),
            window_days: fallback.len(),
        });
    }

    None
}

/// Signed number of baseline standard deviations `value` deviates from the mean
///
/// Returns 0.0 defensively on a non-positive standard deviation, which is
/// only reachable through a manually constructed baseline.
pub fn z_score(value: f64, baseline: &BaselineResult) -> f64 {
    if baseline.standard_deviation <= 0.0 {
        return 0.0;
    }
    (value - baseline.mean) / baseline.standard_deviation
}

/// Fold one new observation into a baseline via exponential moving average
///
/// Mean and variance both decay at rate `alpha`; the variance is floored at
/// 0.001 before the square root. The window length is unchanged, the sample
/// count increments.
pub fn update_baseline(current: &BaselineResult, new_value: f64, alpha: f64) -> BaselineResult {
    let new_mean = current.mean * (1.0 - alpha) + new_value * alpha;
    let new_variance = current.standard_deviation.powi(2) * (1.0 - alpha)
        + (new_value - new_mean).powi(2) * alpha;
    let new_std_dev = new_variance.max(STD_DEV_FLOOR).sqrt();

    BaselineResult {
        mean: new_mean,
        standard_deviation: new_std_dev,
        sample_count: current.sample_count + 1,
        window_days: current.window_days,
    }
}
