//! Scoring facade
//!
//! One entry point per scoring capability, each taking the configuration
//! snapshot plus metric-specific inputs and returning the engine result or
//! `None` when the inputs cannot support a score. The configuration is
//! injected explicitly; nothing here holds global state.

use crate::baseline::{compute_baseline, BaselineResult};
use crate::config::ScoringConfig;
use crate::hrv::{best_hrv, compute_rmssd, HrvMethod, HrvResult};
use crate::muscular_load::{self, MuscularLoadResult};
use crate::recovery::{RecoveryBaselines, RecoveryEngine, RecoveryInput, RecoveryResult};
use crate::sleep::{SleepAnalysisResult, SleepConsistencyInput, SleepEngine, SleepSessionData};
use crate::sleep_planner::{SleepGoal, SleepPlan, SleepPlanner};
use crate::stats::{analyze_correlation, CorrelationResult};
use crate::strain::{StrainEngine, StrainResult};

/// Baseline from a list of recent values over the configured window
pub fn build_baseline(config: &ScoringConfig, values: &[f64]) -> Option<BaselineResult> {
    compute_baseline(
        values,
        config.baselines.window_days,
        config.baselines.minimum_samples,
    )
}

fn baseline_from_history(config: &ScoringConfig, history: &[f64]) -> Option<BaselineResult> {
    if history.is_empty() {
        return None;
    }
    build_baseline(config, history)
}

/// Today's vitals for the recovery score; absent metrics are skipped
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveryVitals {
    pub hrv: Option<f64>,
    pub resting_heart_rate: Option<f64>,
    pub sleep_performance: Option<f64>,
    pub respiratory_rate: Option<f64>,
    pub spo2: Option<f64>,
    pub skin_temperature_deviation: Option<f64>,
}

/// Per-metric history lists from which baselines are built
#[derive(Debug, Clone, Default)]
pub struct RecoveryHistory {
    pub hrv: Vec<f64>,
    pub resting_heart_rate: Vec<f64>,
    pub sleep_performance: Vec<f64>,
    pub respiratory_rate: Vec<f64>,
    pub spo2: Vec<f64>,
    pub skin_temperature: Vec<f64>,
}

/// Recovery score from today's vitals and per-metric histories
pub fn compute_recovery(
    config: &ScoringConfig,
    vitals: &RecoveryVitals,
    history: &RecoveryHistory,
) -> RecoveryResult {
    let engine = RecoveryEngine::new(&config.recovery);

    let baselines = RecoveryBaselines {
        hrv: baseline_from_history(config, &history.hrv),
        resting_heart_rate: baseline_from_history(config, &history.resting_heart_rate),
        sleep_performance: baseline_from_history(config, &history.sleep_performance),
        respiratory_rate: baseline_from_history(config, &history.respiratory_rate),
        spo2: baseline_from_history(config, &history.spo2),
        skin_temperature: baseline_from_history(config, &history.skin_temperature),
    };

    let input = RecoveryInput {
        hrv: vitals.hrv,
        resting_heart_rate: vitals.resting_heart_rate,
        sleep_performance: vitals.sleep_performance,
        respiratory_rate: vitals.respiratory_rate,
        spo2: vitals.spo2,
        skin_temperature_deviation: vitals.skin_temperature_deviation,
    };

    engine.compute_recovery(&input, &baselines)
}

/// Strain from raw (epoch millis, bpm) samples; `None` without samples or a
/// usable max heart rate
pub fn compute_strain(
    config: &ScoringConfig,
    max_heart_rate: u32,
    hr_samples: &[(i64, f64)],
) -> Option<StrainResult> {
    if hr_samples.is_empty() || max_heart_rate == 0 {
        return None;
    }

    let engine = StrainEngine::new(max_heart_rate, &config.strain, &config.heart_rate_zones);
    Some(engine.compute_workout_strain(hr_samples))
}

/// Full nightly sleep analysis over the recorded sessions
pub fn analyze_sleep(
    config: &ScoringConfig,
    sessions: &[SleepSessionData],
    baseline_sleep_hours: f64,
    today_strain: f64,
    past_week_sleep_hours: &[f64],
    past_week_sleep_needs: &[f64],
    consistency_input: &SleepConsistencyInput,
) -> SleepAnalysisResult {
    SleepEngine::new(&config.sleep).analyze(
        sessions,
        baseline_sleep_hours,
        today_strain,
        past_week_sleep_hours,
        past_week_sleep_needs,
        consistency_input,
    )
}

/// Bedtime recommendation for tonight's need and the chosen goal
#[allow(clippy::too_many_arguments)]
pub fn plan_sleep(
    config: &ScoringConfig,
    sleep_need_hours: f64,
    goal: SleepGoal,
    desired_wake_time_millis: i64,
    estimated_onset_latency_minutes: f64,
    baseline_need: f64,
    strain_supplement: f64,
    debt_repayment: f64,
    nap_credit: f64,
) -> SleepPlan {
    SleepPlanner::new(&config.sleep_planner).plan(
        sleep_need_hours,
        goal,
        desired_wake_time_millis,
        estimated_onset_latency_minutes,
        baseline_need,
        strain_supplement,
        debt_repayment,
        nap_credit,
    )
}

/// Muscular load for one workout
pub fn compute_muscular_load(
    workout_type: &str,
    duration_minutes: f64,
    average_heart_rate: f64,
    max_heart_rate_during_workout: f64,
    user_max_heart_rate: f64,
    rpe: Option<u8>,
) -> MuscularLoadResult {
    muscular_load::compute_load(
        workout_type,
        duration_minutes,
        average_heart_rate,
        max_heart_rate_during_workout,
        user_max_heart_rate,
        rpe,
    )
}

/// Effect of a tracked behavior on a metric across days with and without it
pub fn correlate_behavior(
    behavior_name: &str,
    metric_name: &str,
    values_with_behavior: &[f64],
    values_without_behavior: &[f64],
    higher_is_better: bool,
) -> Option<CorrelationResult> {
    analyze_correlation(
        behavior_name,
        metric_name,
        values_with_behavior,
        values_without_behavior,
        higher_is_better,
    )
}

/// RMSSD from raw heartbeat timestamps, tagged with its local provenance
pub fn hrv_from_rr_intervals(rr_intervals_seconds: &[f64]) -> Option<HrvResult> {
    let rmssd = compute_rmssd(rr_intervals_seconds)?;
    Some(HrvResult {
        method: HrvMethod::RmssdFromRrIntervals,
        ..best_hrv(Some(rmssd), None)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::RecoveryZone;

    fn assert_approx(expected: f64, actual: f64, tolerance: f64) {
        assert!(
            (expected - actual).abs() < tolerance,
            "expected {} but got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_compute_recovery_with_hrv_history() {
        let config = ScoringConfig::default();
        let vitals = RecoveryVitals {
            hrv: Some(80.0),
            ..Default::default()
        };
        let history = RecoveryHistory {
            hrv: vec![50.0, 60.0, 70.0],
            ..Default::default()
        };

        let result = compute_recovery(&config, &vitals, &history);
        assert_eq!(result.contributor_count, 1);
        assert!(result.hrv_score.is_some());
        assert_eq!(result.zone, RecoveryZone::Green);
    }

    #[test]
    fn test_compute_recovery_no_history_is_neutral() {
        let config = ScoringConfig::default();
        let vitals = RecoveryVitals {
            hrv: Some(80.0),
            ..Default::default()
        };
        let result = compute_recovery(&config, &vitals, &RecoveryHistory::default());
        assert_eq!(result.contributor_count, 0);
        assert_approx(50.0, result.score, 0.001);
    }

    #[test]
    fn test_compute_strain_empty_samples_none() {
        let config = ScoringConfig::default();
        assert!(compute_strain(&config, 200, &[]).is_none());
    }

    #[test]
    fn test_compute_strain_zero_max_hr_none() {
        let config = ScoringConfig::default();
        assert!(compute_strain(&config, 0, &[(0, 150.0)]).is_none());
    }

    #[test]
    fn test_compute_strain_from_raw_samples() {
        let config = ScoringConfig::default();
        let raw: Vec<(i64, f64)> = (0..60).map(|i| (i * 10_000, 110.0)).collect();
        let result = compute_strain(&config, 200, &raw).unwrap();
        assert_approx(6.248, result.strain, 0.01);
    }

    #[test]
    fn test_build_baseline_uses_configured_window() {
        let config = ScoringConfig::default();
        let result = build_baseline(&config, &[60.0, 70.0, 80.0]).unwrap();
        assert_approx(70.0, result.mean, 0.001);
        assert_eq!(result.sample_count, 3);
    }

    #[test]
    fn test_hrv_from_rr_intervals_tags_local_provenance() {
        let result = hrv_from_rr_intervals(&[0.0, 0.8, 1.7, 2.4]).unwrap();
        assert_eq!(result.method, HrvMethod::RmssdFromRrIntervals);
        assert_approx(158.11, result.rmssd.unwrap(), 0.5);
    }

    #[test]
    fn test_hrv_from_rr_intervals_insufficient_data() {
        assert!(hrv_from_rr_intervals(&[0.8]).is_none());
    }

    #[test]
    fn test_correlate_behavior_passthrough() {
        let with: Vec<f64> = (0..10).map(|i| 70.0 + f64::from(i)).collect();
        let without: Vec<f64> = (0..10).map(|i| 50.0 + f64::from(i)).collect();
        let result = correlate_behavior("meditation", "recovery", &with, &without, true).unwrap();
        assert!(result.is_significant);
        assert_eq!(result.behavior_name, "meditation");
    }
}
