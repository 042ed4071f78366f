//! Behavioral correlation statistics
//!
//! Compares a metric's values on days with a behavior against days without
//! it: an approximate two-sample t-test for significance and Cohen's d for
//! effect size. The p-value comes from a complementary-error-function
//! polynomial (Abramowitz & Stegun 7.1.26) evaluated at |t|/sqrt(2), not an
//! exact Student's-t CDF. The approximation is a deliberate behavioral
//! contract; downstream thresholds are tuned to it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::baseline::{mean, std_dev};

/// Direction of a significant behavior/metric association
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorrelationDirection {
    /// Behavior associated with a better metric outcome
    Positive,
    /// Behavior associated with a worse metric outcome
    Negative,
    /// No statistically significant association
    Neutral,
}

impl fmt::Display for CorrelationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationDirection::Positive => write!(f, "Positive"),
            CorrelationDirection::Negative => write!(f, "Negative"),
            CorrelationDirection::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Cohen's d magnitude buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectSizeClass {
    Negligible,
    Small,
    Medium,
    Large,
}

impl fmt::Display for EffectSizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectSizeClass::Negligible => write!(f, "Negligible"),
            EffectSizeClass::Small => write!(f, "Small"),
            EffectSizeClass::Medium => write!(f, "Medium"),
            EffectSizeClass::Large => write!(f, "Large"),
        }
    }
}

/// Outcome of a behavior/metric correlation analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationResult {
    pub behavior_name: String,
    pub metric_name: String,
    pub effect_size: f64,
    pub p_value: f64,
    pub is_significant: bool,
    pub direction: CorrelationDirection,
    pub sample_size_with: usize,
    pub sample_size_without: usize,
    pub mean_with: f64,
    pub mean_without: f64,
}

// Abramowitz & Stegun 7.1.26 rational polynomial for erfc. Reproduced
// coefficient-for-coefficient; do not swap in a library implementation.
fn erfc(x: f64) -> f64 {
    let t = 1.0 / (1.0 + 0.3275911 * x.abs());
    let poly = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    let result = poly * (-x * x).exp();
    if x >= 0.0 {
        result
    } else {
        2.0 - result
    }
}

// Two-sided p-value approximation from a t statistic via the normal tail.
fn approximate_p_value(t: f64) -> f64 {
    erfc(t.abs() / 2.0_f64.sqrt())
}

/// Approximate Welch-style two-sample t-test
///
/// Requires at least 3 values per group; uses population variances for the
/// pooled standard error. Returns `(t, p)` or `None` when either group is too
/// small or both groups are constant (degenerate pooled SE).
pub fn t_test(with_behavior: &[f64], without_behavior: &[f64]) -> Option<(f64, f64)> {
    if with_behavior.len() < 3 || without_behavior.len() < 3 {
        return None;
    }

    let n1 = with_behavior.len() as f64;
    let n2 = without_behavior.len() as f64;
    let mean1 = mean(with_behavior);
    let mean2 = mean(without_behavior);
    let var1 = std_dev(with_behavior).powi(2);
    let var2 = std_dev(without_behavior).powi(2);

    let pooled_se = (var1 / n1 + var2 / n2).sqrt();
    if pooled_se <= 0.0 {
        return None;
    }

    let t = (mean1 - mean2) / pooled_se;
    Some((t, approximate_p_value(t)))
}

/// Cohen's d standardized mean difference
///
/// Pooled standard deviation uses Bessel-corrected (n-1) variances weighted
/// by group size. Requires at least 3 values per group; `None` on a
/// degenerate pooled SD.
pub fn cohens_d(with_behavior: &[f64], without_behavior: &[f64]) -> Option<f64> {
    if with_behavior.len() < 3 || without_behavior.len() < 3 {
        return None;
    }

    let mean1 = mean(with_behavior);
    let mean2 = mean(without_behavior);
    let sd1 = std_dev(with_behavior);
    let sd2 = std_dev(without_behavior);
    let n1 = with_behavior.len() as f64;
    let n2 = without_behavior.len() as f64;

    let pooled_sd = (((n1 - 1.0) * sd1 * sd1 + (n2 - 1.0) * sd2 * sd2) / (n1 + n2 - 2.0)).sqrt();
    if pooled_sd <= 0.0 {
        return None;
    }

    Some((mean1 - mean2) / pooled_sd)
}

/// Run the full correlation analysis for one behavior/metric pair
///
/// Direction is `Neutral` when p >= 0.05; otherwise the sign of the mean
/// difference, flipped for metrics where lower values are better.
pub fn analyze_correlation(
    behavior_name: &str,
    metric_name: &str,
    with_behavior: &[f64],
    without_behavior: &[f64],
    higher_is_better: bool,
) -> Option<CorrelationResult> {
    let (_, p_value) = t_test(with_behavior, without_behavior)?;
    let effect_size = cohens_d(with_behavior, without_behavior)?;

    let mean_with = mean(with_behavior);
    let mean_without = mean(without_behavior);
    let mean_diff = mean_with - mean_without;

    let direction = if p_value >= 0.05 {
        CorrelationDirection::Neutral
    } else if (higher_is_better && mean_diff > 0.0) || (!higher_is_better && mean_diff < 0.0) {
        CorrelationDirection::Positive
    } else {
        CorrelationDirection::Negative
    };

    Some(CorrelationResult {
        behavior_name: behavior_name.to_string(),
        metric_name: metric_name.to_string(),
        effect_size,
        p_value,
        is_significant: p_value < 0.05,
        direction,
        sample_size_with: with_behavior.len(),
        sample_size_without: without_behavior.len(),
        mean_with,
        mean_without,
    })
}

/// Bucket |d| into the conventional effect-size classes
pub fn interpret_effect_size(d: f64) -> EffectSizeClass {
    let abs_d = d.abs();
    if abs_d < 0.2 {
        EffectSizeClass::Negligible
    } else if abs_d < 0.5 {
        EffectSizeClass::Small
    } else if abs_d < 0.8 {
        EffectSizeClass::Medium
    } else {
        EffectSizeClass::Large
    }
}
