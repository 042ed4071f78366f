//! Sleep analysis
//!
//! Classifies recorded sleep sessions into one main sleep plus naps, then
//! derives the nightly need (baseline plus strain supplement plus debt
//! repayment minus nap credit), performance against that need, accumulated
//! debt, schedule consistency, and a weighted composite sleep score.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use crate::baseline::std_dev;
use crate::config::SleepConfig;

/// Sleep stage classification as reported by the health store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SleepStage {
    Light,
    Deep,
    Rem,
    Awake,
    InBed,
}

/// One contiguous stage segment within a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepStageData {
    pub stage: SleepStage,
    pub start_date_millis: i64,
    pub end_date_millis: i64,
    pub duration_minutes: f64,
}

/// One recorded sleep session with per-stage totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSessionData {
    pub start_date_millis: i64,
    pub end_date_millis: i64,
    pub total_sleep_minutes: f64,
    pub time_in_bed_minutes: f64,
    pub light_minutes: f64,
    pub deep_minutes: f64,
    pub rem_minutes: f64,
    pub awake_minutes: f64,
    pub awakenings: u32,
    pub sleep_onset_latency_minutes: Option<f64>,
    pub sleep_efficiency: f64,
    #[serde(default)]
    pub stages: Vec<SleepStageData>,
}

/// Recent bedtime/wake clock times as minutes from midnight
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepConsistencyInput {
    pub recent_bedtime_minutes: Vec<f64>,
    pub recent_wake_time_minutes: Vec<f64>,
}

/// Full nightly sleep analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepAnalysisResult {
    pub main_sleep: Option<SleepSessionData>,
    pub naps: Vec<SleepSessionData>,
    pub total_sleep_hours: f64,
    pub sleep_need_hours: f64,
    pub sleep_performance: f64,
    pub sleep_debt_hours: f64,
    pub sleep_score: f64,
    pub sleep_efficiency: f64,
    pub sleep_consistency: f64,
    pub restorative_sleep_pct: f64,
    pub disturbances_per_hour: f64,
    pub deep_sleep_pct: f64,
    pub rem_sleep_pct: f64,
}

fn minutes_since_midnight(epoch_millis: i64) -> f64 {
    let dt: DateTime<Utc> = DateTime::from_timestamp_millis(epoch_millis).unwrap_or_default();
    f64::from(dt.hour()) * 60.0 + f64::from(dt.minute()) + f64::from(dt.second()) / 60.0
}

/// Sleep analyzer bound to one configuration snapshot
pub struct SleepEngine {
    config: SleepConfig,
}

impl SleepEngine {
    pub fn new(config: &SleepConfig) -> Self {
        SleepEngine {
            config: config.clone(),
        }
    }

    /// Split sessions into one main sleep (the longest) and qualifying naps
    ///
    /// Remaining sessions count as naps only when their duration lies within
    /// the configured nap band; anything outside it is dropped entirely.
    pub fn classify_sessions(
        &self,
        sessions: &[SleepSessionData],
    ) -> (Option<SleepSessionData>, Vec<SleepSessionData>) {
        if sessions.is_empty() {
            return (None, Vec::new());
        }

        let mut sorted: Vec<SleepSessionData> = sessions.to_vec();
        sorted.sort_by(|a, b| {
            b.total_sleep_minutes
                .partial_cmp(&a.total_sleep_minutes)
                .unwrap_or(Ordering::Equal)
        });

        let main = sorted[0].clone();
        let max_nap_minutes = self.config.session_detection.maximum_nap_duration_hours * 60.0;
        let min_duration = self.config.session_detection.minimum_duration_minutes;
        let naps = sorted
            .into_iter()
            .skip(1)
            .filter(|s| {
                s.total_sleep_minutes >= min_duration && s.total_sleep_minutes <= max_nap_minutes
            })
            .collect();

        (Some(main), naps)
    }

    /// Tonight's sleep need in hours
    ///
    /// Adds the first strain-supplement tier whose threshold exceeds today's
    /// strain (tiers are assumed pre-sorted ascending), repays a fraction of
    /// accumulated debt, and credits naps up to the configured cap.
    pub fn compute_sleep_need(
        &self,
        baseline_hours: f64,
        today_strain: f64,
        sleep_debt_hours: f64,
        nap_hours_today: f64,
    ) -> f64 {
        let mut strain_supplement = 0.0;
        for tier in &self.config.strain_supplements {
            if today_strain < tier.strain_below {
                strain_supplement = tier.add_hours;
                break;
            }
        }

        let debt_repayment = sleep_debt_hours * self.config.debt_repayment_rate;
        let nap_credit = nap_hours_today.min(self.config.session_detection.nap_credit_cap_hours);

        baseline_hours + strain_supplement + debt_repayment - nap_credit
    }

    /// Percentage of the sleep need actually slept, clamped to 0-100
    pub fn compute_sleep_performance(&self, actual_sleep_hours: f64, sleep_need_hours: f64) -> f64 {
        if sleep_need_hours <= 0.0 {
            return 0.0;
        }
        (actual_sleep_hours / sleep_need_hours * 100.0).clamp(0.0, 100.0)
    }

    /// Accumulated debt over the past week: positive deficits only
    ///
    /// Entries are paired by index up to the shorter list; surplus nights
    /// contribute nothing.
    pub fn compute_sleep_debt(
        &self,
        past_week_sleep_hours: &[f64],
        past_week_sleep_needs: &[f64],
    ) -> f64 {
        past_week_sleep_hours
            .iter()
            .zip(past_week_sleep_needs)
            .map(|(actual, need)| (need - actual).max(0.0))
            .sum()
    }

    /// Schedule consistency from bedtime/wake clock-time variability
    ///
    /// The current night joins the history; the score decays exponentially
    /// with the averaged population standard deviation of both series.
    /// No prior history scores a full 100.
    pub fn compute_sleep_consistency(
        &self,
        current_bedtime_minutes: f64,
        current_wake_time_minutes: f64,
        recent_bedtime_minutes: &[f64],
        recent_wake_time_minutes: &[f64],
    ) -> f64 {
        if recent_bedtime_minutes.is_empty() {
            return 100.0;
        }

        let mut all_bedtimes = recent_bedtime_minutes.to_vec();
        all_bedtimes.push(current_bedtime_minutes);
        let mut all_wake_times = recent_wake_time_minutes.to_vec();
        all_wake_times.push(current_wake_time_minutes);

        let bedtime_std = std_dev(&all_bedtimes);
        let wake_time_std = std_dev(&all_wake_times);
        let avg_std = (bedtime_std + wake_time_std) / 2.0;

        let score = 100.0 * (-avg_std / self.config.consistency_decay_tau).exp();
        score.clamp(0.0, 100.0)
    }

    /// Share of sleep spent in deep or REM stages
    pub fn compute_restorative_sleep_pct(&self, session: &SleepSessionData) -> f64 {
        if session.total_sleep_minutes <= 0.0 {
            return 0.0;
        }
        (session.deep_minutes + session.rem_minutes) / session.total_sleep_minutes * 100.0
    }

    /// Awakenings per hour of sleep
    pub fn compute_disturbances_per_hour(&self, session: &SleepSessionData) -> f64 {
        let hours = session.total_sleep_minutes / 60.0;
        if hours <= 0.0 {
            return 0.0;
        }
        f64::from(session.awakenings) / hours
    }

    /// Weighted blend of the four sleep sub-scores, clamped to 0-100
    pub fn compute_composite_sleep_score(
        &self,
        sufficiency: f64,
        efficiency: f64,
        consistency: f64,
        disturbances_per_hour: f64,
    ) -> f64 {
        let disturbance_score =
            (100.0 - disturbances_per_hour * self.config.disturbance_scaling).clamp(0.0, 100.0);

        let w = &self.config.composite_weights;
        let score = w.sufficiency * sufficiency
            + w.efficiency * efficiency
            + w.consistency * consistency
            + w.disturbances * disturbance_score;

        score.clamp(0.0, 100.0)
    }

    /// Full nightly analysis over the recorded sessions
    pub fn analyze(
        &self,
        sessions: &[SleepSessionData],
        baseline_sleep_hours: f64,
        today_strain: f64,
        past_week_sleep_hours: &[f64],
        past_week_sleep_needs: &[f64],
        consistency_input: &SleepConsistencyInput,
    ) -> SleepAnalysisResult {
        let (main, naps) = self.classify_sessions(sessions);

        let total_main_sleep = main.as_ref().map_or(0.0, |m| m.total_sleep_minutes);
        let nap_hours: f64 = naps.iter().map(|n| n.total_sleep_minutes).sum::<f64>() / 60.0;
        let total_sleep_hours = total_main_sleep / 60.0 + nap_hours;

        let sleep_debt = self.compute_sleep_debt(past_week_sleep_hours, past_week_sleep_needs);
        let sleep_need =
            self.compute_sleep_need(baseline_sleep_hours, today_strain, sleep_debt, nap_hours);
        let performance = self.compute_sleep_performance(total_sleep_hours, sleep_need);

        let efficiency = main.as_ref().map_or(0.0, |m| m.sleep_efficiency);
        let restorative_pct = main
            .as_ref()
            .map_or(0.0, |m| self.compute_restorative_sleep_pct(m));
        let disturbances = main
            .as_ref()
            .map_or(0.0, |m| self.compute_disturbances_per_hour(m));
        let deep_pct = main.as_ref().map_or(0.0, |m| {
            if m.total_sleep_minutes > 0.0 {
                m.deep_minutes / m.total_sleep_minutes * 100.0
            } else {
                0.0
            }
        });
        let rem_pct = main.as_ref().map_or(0.0, |m| {
            if m.total_sleep_minutes > 0.0 {
                m.rem_minutes / m.total_sleep_minutes * 100.0
            } else {
                0.0
            }
        });

        let consistency = match main.as_ref() {
            Some(m) => self.compute_sleep_consistency(
                minutes_since_midnight(m.start_date_millis),
                minutes_since_midnight(m.end_date_millis),
                &consistency_input.recent_bedtime_minutes,
                &consistency_input.recent_wake_time_minutes,
            ),
            None => 100.0,
        };

        let sleep_score =
            self.compute_composite_sleep_score(performance, efficiency, consistency, disturbances);

        debug!(
            total_sleep_hours,
            sleep_need, performance, sleep_score, "analyzed sleep"
        );

        SleepAnalysisResult {
            main_sleep: main,
            naps,
            total_sleep_hours,
            sleep_need_hours: sleep_need,
            sleep_performance: performance,
            sleep_debt_hours: sleep_debt,
            sleep_score,
            sleep_efficiency: efficiency,
            sleep_consistency: consistency,
            restorative_sleep_pct: restorative_pct,
            disturbances_per_hour: disturbances,
            deep_sleep_pct: deep_pct,
            rem_sleep_pct: rem_pct,
        }
    }
}
