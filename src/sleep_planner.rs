//! Bedtime planning
//!
//! Projects a recommended bedtime backwards from a desired wake time, given
//! tonight's sleep need, a named goal that scales the need, and the user's
//! typical sleep onset latency.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SleepPlannerConfig;

const DEFAULT_WAKE_TIME_MINUTES: i64 = 7 * 60;
const DEFAULT_ONSET_LATENCY_MINUTES: f64 = 15.0;

/// How much of tonight's sleep need the user intends to meet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SleepGoal {
    Peak,
    Perform,
    #[serde(rename = "Get By")]
    GetBy,
}

impl SleepGoal {
    /// Short rationale shown alongside the goal
    pub fn description(&self) -> &'static str {
        match self {
            SleepGoal::Peak => "Full sleep need for maximum recovery",
            SleepGoal::Perform => "Solid sleep for a good recovery day",
            SleepGoal::GetBy => "Minimum viable sleep - reduced recovery",
        }
    }

    fn multiplier(&self, config: &SleepPlannerConfig) -> f64 {
        match self {
            SleepGoal::Peak => config.goal_multipliers.peak,
            SleepGoal::Perform => config.goal_multipliers.perform,
            SleepGoal::GetBy => config.goal_multipliers.get_by,
        }
    }
}

impl fmt::Display for SleepGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SleepGoal::Peak => write!(f, "Peak"),
            SleepGoal::Perform => write!(f, "Perform"),
            SleepGoal::GetBy => write!(f, "Get By"),
        }
    }
}

/// A bedtime recommendation with the need breakdown that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepPlan {
    pub sleep_need_hours: f64,
    pub required_sleep_duration: f64,
    pub recommended_bedtime_millis: i64,
    pub expected_wake_time_millis: i64,
    pub goal: SleepGoal,
    pub baseline_need: f64,
    pub strain_supplement: f64,
    pub debt_repayment: f64,
    pub nap_credit: f64,
}

/// Bedtime planner bound to one configuration snapshot
pub struct SleepPlanner {
    config: SleepPlannerConfig,
}

impl SleepPlanner {
    pub fn new(config: &SleepPlannerConfig) -> Self {
        SleepPlanner {
            config: config.clone(),
        }
    }

    /// Recommend a bedtime for the desired wake time
    ///
    /// Required sleep is the need scaled by the goal multiplier; time in bed
    /// adds the onset latency on top, and the bedtime counts back from the
    /// wake time in whole milliseconds. The need breakdown fields are passed
    /// through for display.
    #[allow(clippy::too_many_arguments)]
    pub fn plan(
        &self,
        sleep_need_hours: f64,
        goal: SleepGoal,
        desired_wake_time_millis: i64,
        estimated_onset_latency_minutes: f64,
        baseline_need: f64,
        strain_supplement: f64,
        debt_repayment: f64,
        nap_credit: f64,
    ) -> SleepPlan {
        let required_sleep = sleep_need_hours * goal.multiplier(&self.config);
        let total_time_in_bed_hours = required_sleep + estimated_onset_latency_minutes / 60.0;
        let bedtime_millis =
            desired_wake_time_millis - (total_time_in_bed_hours * 3_600_000.0) as i64;

        SleepPlan {
            sleep_need_hours,
            required_sleep_duration: required_sleep,
            recommended_bedtime_millis: bedtime_millis,
            expected_wake_time_millis: desired_wake_time_millis,
            goal,
            baseline_need,
            strain_supplement,
            debt_repayment,
            nap_credit,
        }
    }

    /// Typical wake time as the integer average of recent wake times
    ///
    /// Values are minutes from midnight; defaults to 7:00 with no history.
    pub fn estimate_wake_time(&self, recent_wake_time_minutes: &[i64]) -> i64 {
        if recent_wake_time_minutes.is_empty() {
            return DEFAULT_WAKE_TIME_MINUTES;
        }
        recent_wake_time_minutes.iter().sum::<i64>() / recent_wake_time_minutes.len() as i64
    }

    /// Typical sleep onset latency in minutes; defaults to 15 with no history
    pub fn estimate_onset_latency(&self, historical_latencies: &[f64]) -> f64 {
        if historical_latencies.is_empty() {
            return DEFAULT_ONSET_LATENCY_MINUTES;
        }
        historical_latencies.iter().sum::<f64>() / historical_latencies.len() as f64
    }
}
