//! Recovery scoring
//!
//! Recovery expresses how ready the body is for load, as a 0-100 composite
//! of up to six baseline-normalized vitals: HRV, resting heart rate, sleep
//! performance, respiratory rate, SpO2, and skin temperature deviation. Each
//! available metric becomes a z-score against its personal baseline,
//! sign-flipped where lower is better, then squashed through a logistic
//! transform into a 0-100 sub-score and blended by the configured weights.
//! Metrics without a value or a valid baseline simply drop out; with no
//! contributors at all the score falls back to a neutral 50.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::baseline::{z_score, BaselineResult};
use crate::config::RecoveryConfig;

/// Traffic-light recovery zone
///
/// Thresholds are fixed at 67/34 and intentionally decoupled from the
/// configurable score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecoveryZone {
    Green,
    Yellow,
    Red,
}

impl RecoveryZone {
    pub fn from_score(score: f64) -> Self {
        if score >= 67.0 {
            RecoveryZone::Green
        } else if score >= 34.0 {
            RecoveryZone::Yellow
        } else {
            RecoveryZone::Red
        }
    }
}

impl fmt::Display for RecoveryZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryZone::Green => write!(f, "Green"),
            RecoveryZone::Yellow => write!(f, "Yellow"),
            RecoveryZone::Red => write!(f, "Red"),
        }
    }
}

/// Today's raw vitals; any subset may be present
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryInput {
    pub hrv: Option<f64>,
    pub resting_heart_rate: Option<f64>,
    pub sleep_performance: Option<f64>,
    pub respiratory_rate: Option<f64>,
    pub spo2: Option<f64>,
    pub skin_temperature_deviation: Option<f64>,
}

/// Personal baselines matching the vitals in [`RecoveryInput`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryBaselines {
    pub hrv: Option<BaselineResult>,
    pub resting_heart_rate: Option<BaselineResult>,
    pub sleep_performance: Option<BaselineResult>,
    pub respiratory_rate: Option<BaselineResult>,
    pub spo2: Option<BaselineResult>,
    pub skin_temperature: Option<BaselineResult>,
}

/// Composite recovery score with per-metric sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryResult {
    pub score: f64,
    pub zone: RecoveryZone,
    pub hrv_score: Option<f64>,
    pub rhr_score: Option<f64>,
    pub sleep_score: Option<f64>,
    pub resp_rate_score: Option<f64>,
    pub spo2_score: Option<f64>,
    pub skin_temp_score: Option<f64>,
    pub contributor_count: usize,
}

#[derive(Default)]
struct Accumulator {
    total_weight: f64,
    weighted_sum: f64,
    contributor_count: usize,
}

/// Recovery scorer bound to one configuration snapshot
pub struct RecoveryEngine {
    config: RecoveryConfig,
}

impl RecoveryEngine {
    pub fn new(config: &RecoveryConfig) -> Self {
        RecoveryEngine {
            config: config.clone(),
        }
    }

    /// Logistic transform mapping a z-score onto 0-100
    fn sigmoid(&self, z: f64) -> f64 {
        100.0 / (1.0 + (-self.config.sigmoid_steepness * z).exp())
    }

    /// Score one metric if both its value and a valid baseline are present
    ///
    /// `invert` flips the z-score for metrics where lower is better.
    fn contributor(
        &self,
        value: Option<f64>,
        baseline: Option<&BaselineResult>,
        invert: bool,
        weight: f64,
        accum: &mut Accumulator,
    ) -> Option<f64> {
        let value = value?;
        let baseline = baseline.filter(|b| b.is_valid())?;

        let mut z = z_score(value, baseline);
        if invert {
            z = -z;
        }

        let score = self.sigmoid(z);
        accum.total_weight += weight;
        accum.weighted_sum += score * weight;
        accum.contributor_count += 1;

        Some(score)
    }

    /// Blend the available vitals into the composite recovery score
    pub fn compute_recovery(
        &self,
        input: &RecoveryInput,
        baselines: &RecoveryBaselines,
    ) -> RecoveryResult {
        let mut accum = Accumulator::default();
        let w = &self.config.weights;

        let hrv_score =
            self.contributor(input.hrv, baselines.hrv.as_ref(), false, w.hrv, &mut accum);
        let rhr_score = self.contributor(
            input.resting_heart_rate,
            baselines.resting_heart_rate.as_ref(),
            true,
            w.resting_heart_rate,
            &mut accum,
        );
        let sleep_score = self.contributor(
            input.sleep_performance,
            baselines.sleep_performance.as_ref(),
            false,
            w.sleep,
            &mut accum,
        );
        let resp_rate_score = self.contributor(
            input.respiratory_rate,
            baselines.respiratory_rate.as_ref(),
            true,
            w.respiratory_rate,
            &mut accum,
        );
        let spo2_score =
            self.contributor(input.spo2, baselines.spo2.as_ref(), false, w.spo2, &mut accum);
        let skin_temp_score = self.contributor(
            input.skin_temperature_deviation,
            baselines.skin_temperature.as_ref(),
            true,
            w.skin_temperature,
            &mut accum,
        );

        // Neutral 50 when nothing contributed
        let raw_score = if accum.total_weight > 0.0 {
            accum.weighted_sum / accum.total_weight
        } else {
            50.0
        };
        let score = raw_score.clamp(
            f64::from(self.config.score_range.min),
            f64::from(self.config.score_range.max),
        );
        let zone = RecoveryZone::from_score(score);

        debug!(
            score,
            contributors = accum.contributor_count,
            zone = %zone,
            "computed recovery"
        );

        RecoveryResult {
            score,
            zone,
            hrv_score,
            rhr_score,
            sleep_score,
            resp_rate_score,
            spo2_score,
            skin_temp_score,
            contributor_count: accum.contributor_count,
        }
    }

    /// Recommended strain interval for a recovery zone
    pub fn strain_target(&self, zone: RecoveryZone) -> (f64, f64) {
        let targets = &self.config.strain_targets;
        let range = match zone {
            RecoveryZone::Green => targets.green,
            RecoveryZone::Yellow => targets.yellow,
            RecoveryZone::Red => targets.red,
        };
        (range.min, range.max)
    }

    /// Build the daily insight sentence
    ///
    /// Metrics are scanned in fixed order (HRV, RHR, sleep, skin temperature)
    /// and qualify by exceeding the configured deviation thresholds; the
    /// qualifying phrases are joined after a header with the rounded score
    /// and zone. The scan order is an observable contract.
    pub fn generate_insight(
        &self,
        result: &RecoveryResult,
        input: &RecoveryInput,
        baselines: &RecoveryBaselines,
    ) -> String {
        let thresholds = &self.config.insight_thresholds;
        let mut insights: Vec<String> = Vec::new();

        if let (Some(hrv), Some(baseline)) = (input.hrv, baselines.hrv.as_ref()) {
            let pct_change = (hrv - baseline.mean) / baseline.mean * 100.0;
            if pct_change.abs() > thresholds.hrv_percent_change {
                let direction = if pct_change > 0.0 { "above" } else { "below" };
                insights.push(format!(
                    "HRV was {}% {} your baseline",
                    (pct_change as i64).abs(),
                    direction
                ));
            }
        }

        if let (Some(rhr), Some(baseline)) =
            (input.resting_heart_rate, baselines.resting_heart_rate.as_ref())
        {
            let delta = rhr - baseline.mean;
            if delta.abs() > thresholds.rhr_delta_bpm {
                let direction = if delta > 0.0 { "elevated by" } else { "lower by" };
                insights.push(format!("RHR was {} {} BPM", direction, (delta as i64).abs()));
            }
        }

        if let Some(sleep_performance) = input.sleep_performance {
            if sleep_performance >= thresholds.sleep_performance_high {
                insights.push(format!(
                    "you got {}% of your sleep need",
                    sleep_performance as i64
                ));
            } else if sleep_performance < thresholds.sleep_performance_low {
                insights.push(format!(
                    "you only got {}% of your sleep need",
                    sleep_performance as i64
                ));
            }
        }

        if let Some(deviation) = input.skin_temperature_deviation {
            if deviation.abs() > thresholds.skin_temp_deviation_celsius {
                let direction = if deviation > 0.0 { "elevated" } else { "lower" };
                let rounded = (deviation.abs() * 10.0) as i64 as f64 / 10.0;
                insights.push(format!(
                    "skin temperature was {} by {}\u{b0}C",
                    direction, rounded
                ));
            }
        }

        let prefix = format!("Your Recovery is {}% ({}). ", result.score as i64, result.zone);
        if insights.is_empty() {
            return prefix + "Your metrics are within normal range.";
        }
        prefix + &insights.join(", and ") + "."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;

    fn assert_approx(expected: f64, actual: f64, tolerance: f64) {
        assert!(
            (expected - actual).abs() < tolerance,
            "expected {} but got {}",
            expected,
            actual
        );
    }

    fn engine() -> RecoveryEngine {
        RecoveryEngine::new(&ScoringConfig::default().recovery)
    }

    fn valid_baseline(mean: f64, sd: f64) -> BaselineResult {
        BaselineResult {
            mean,
            standard_deviation: sd,
            sample_count: 10,
            window_days: 28,
        }
    }

    fn invalid_baseline() -> BaselineResult {
        BaselineResult {
            mean: 60.0,
            standard_deviation: 10.0,
            sample_count: 2,
            window_days: 28,
        }
    }

    #[test]
    fn test_compute_recovery_no_data_returns_neutral_50() {
        let result = engine().compute_recovery(&RecoveryInput::default(), &RecoveryBaselines::default());
        assert_approx(50.0, result.score, 0.01);
        assert_eq!(result.contributor_count, 0);
        assert_eq!(result.zone, RecoveryZone::Yellow);
    }

    #[test]
    fn test_compute_recovery_hrv_above_baseline_high_score() {
        // HRV 80 against baseline(60, 10): z=2.0, sigmoid(1.5*2) = 95.26
        let input = RecoveryInput {
            hrv: Some(80.0),
            ..Default::default()
        };
        let baselines = RecoveryBaselines {
            hrv: Some(valid_baseline(60.0, 10.0)),
            ..Default::default()
        };
        let result = engine().compute_recovery(&input, &baselines);
        assert_approx(95.26, result.score, 0.5);
        assert_eq!(result.zone, RecoveryZone::Green);
        assert_eq!(result.contributor_count, 1);
    }

    #[test]
    fn test_compute_recovery_elevated_rhr_low_score() {
        // RHR 75 against baseline(60, 5): z=3.0 inverted, sigmoid(-4.5) ~ 1.1
        let input = RecoveryInput {
            resting_heart_rate: Some(75.0),
            ..Default::default()
        };
        let baselines = RecoveryBaselines {
            resting_heart_rate: Some(valid_baseline(60.0, 5.0)),
            ..Default::default()
        };
        let result = engine().compute_recovery(&input, &baselines);
        assert!(result.score < 5.0);
        assert_eq!(result.zone, RecoveryZone::Red);
    }

    #[test]
    fn test_compute_recovery_all_six_contributors() {
        let input = RecoveryInput {
            hrv: Some(70.0),
            resting_heart_rate: Some(58.0),
            sleep_performance: Some(85.0),
            respiratory_rate: Some(15.0),
            spo2: Some(98.0),
            skin_temperature_deviation: Some(0.1),
        };
        let baselines = RecoveryBaselines {
            hrv: Some(valid_baseline(60.0, 10.0)),
            resting_heart_rate: Some(valid_baseline(60.0, 5.0)),
            sleep_performance: Some(valid_baseline(80.0, 10.0)),
            respiratory_rate: Some(valid_baseline(16.0, 1.0)),
            spo2: Some(valid_baseline(97.0, 1.0)),
            skin_temperature: Some(valid_baseline(0.0, 0.5)),
        };
        let result = engine().compute_recovery(&input, &baselines);
        assert_eq!(result.contributor_count, 6);
        assert!(result.score >= 1.0 && result.score <= 99.0);
        assert!(result.hrv_score.is_some());
        assert!(result.skin_temp_score.is_some());
    }

    #[test]
    fn test_compute_recovery_invalid_baseline_excluded() {
        let input = RecoveryInput {
            hrv: Some(80.0),
            ..Default::default()
        };
        let baselines = RecoveryBaselines {
            hrv: Some(invalid_baseline()),
            ..Default::default()
        };
        let result = engine().compute_recovery(&input, &baselines);
        assert!(result.hrv_score.is_none());
        assert_eq!(result.contributor_count, 0);
        assert_approx(50.0, result.score, 0.01);
    }

    #[test]
    fn test_compute_recovery_value_without_baseline_excluded() {
        let input = RecoveryInput {
            spo2: Some(98.0),
            ..Default::default()
        };
        let result = engine().compute_recovery(&input, &RecoveryBaselines::default());
        assert!(result.spo2_score.is_none());
        assert_eq!(result.contributor_count, 0);
    }

    #[test]
    fn test_zone_boundaries_inclusive() {
        assert_eq!(RecoveryZone::from_score(67.0), RecoveryZone::Green);
        assert_eq!(RecoveryZone::from_score(66.999), RecoveryZone::Yellow);
        assert_eq!(RecoveryZone::from_score(34.0), RecoveryZone::Yellow);
        assert_eq!(RecoveryZone::from_score(33.999), RecoveryZone::Red);
        assert_eq!(RecoveryZone::from_score(1.0), RecoveryZone::Red);
        assert_eq!(RecoveryZone::from_score(85.0), RecoveryZone::Green);
    }

    #[test]
    fn test_strain_target_per_zone() {
        let engine = engine();
        assert_eq!(engine.strain_target(RecoveryZone::Green), (14.0, 18.0));
        assert_eq!(engine.strain_target(RecoveryZone::Yellow), (8.0, 13.9));
        assert_eq!(engine.strain_target(RecoveryZone::Red), (2.0, 7.9));
    }

    #[test]
    fn test_generate_insight_no_significant_changes() {
        let engine = engine();
        let input = RecoveryInput {
            hrv: Some(61.0),
            resting_heart_rate: Some(60.5),
            sleep_performance: Some(80.0),
            ..Default::default()
        };
        let baselines = RecoveryBaselines {
            hrv: Some(valid_baseline(60.0, 10.0)),
            resting_heart_rate: Some(valid_baseline(60.0, 5.0)),
            sleep_performance: Some(valid_baseline(80.0, 10.0)),
            ..Default::default()
        };
        let result = engine.compute_recovery(&input, &baselines);
        let insight = engine.generate_insight(&result, &input, &baselines);
        assert!(insight.contains("within normal range"));
    }

    #[test]
    fn test_generate_insight_hrv_deviation_phrase() {
        let engine = engine();
        let input = RecoveryInput {
            hrv: Some(80.0),
            ..Default::default()
        };
        let baselines = RecoveryBaselines {
            hrv: Some(valid_baseline(60.0, 10.0)),
            ..Default::default()
        };
        let result = engine.compute_recovery(&input, &baselines);
        let insight = engine.generate_insight(&result, &input, &baselines);
        // (80-60)/60 = +33%
        assert!(insight.contains("HRV was 33% above your baseline"), "{}", insight);
        assert!(insight.starts_with("Your Recovery is 95% (Green). "), "{}", insight);
    }

    #[test]
    fn test_generate_insight_scan_order_and_joining() {
        let engine = engine();
        let input = RecoveryInput {
            hrv: Some(45.0),
            resting_heart_rate: Some(66.0),
            sleep_performance: Some(60.0),
            skin_temperature_deviation: Some(0.8),
            ..Default::default()
        };
        let baselines = RecoveryBaselines {
            hrv: Some(valid_baseline(60.0, 10.0)),
            resting_heart_rate: Some(valid_baseline(60.0, 5.0)),
            sleep_performance: Some(valid_baseline(80.0, 10.0)),
            skin_temperature: Some(valid_baseline(0.0, 0.5)),
            ..Default::default()
        };
        let result = engine.compute_recovery(&input, &baselines);
        let insight = engine.generate_insight(&result, &input, &baselines);

        let hrv_pos = insight.find("HRV was").unwrap();
        let rhr_pos = insight.find("RHR was").unwrap();
        let sleep_pos = insight.find("you only got").unwrap();
        let temp_pos = insight.find("skin temperature was").unwrap();
        assert!(hrv_pos < rhr_pos && rhr_pos < sleep_pos && sleep_pos < temp_pos);
        assert!(insight.contains(", and "));
        assert!(insight.ends_with('.'));
        assert!(insight.contains("skin temperature was elevated by 0.8\u{b0}C"), "{}", insight);
    }
}
