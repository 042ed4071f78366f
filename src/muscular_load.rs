//! Muscular load estimation
//!
//! Heart rate alone under-counts resistance work, so muscular load scores a
//! workout from its duration scaled by a per-activity effective-mass factor,
//! multiplied by a heart-rate intensity term. The factor table is static and
//! unknown activity types fall back to a neutral 0.5.

use serde::{Deserialize, Serialize};

const CALIBRATION_FACTOR: f64 = 2.0;
const DEFAULT_MASS_FACTOR: f64 = 0.5;

/// Muscular load with its volume/intensity components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscularLoadResult {
    pub load: f64,
    pub volume_score: f64,
    pub intensity_score: f64,
    pub workout_type: String,
}

/// Fraction of body mass effectively worked by the activity
fn effective_mass_factor(workout_type: &str) -> f64 {
    match workout_type {
        "traditionalStrengthTraining" => 1.0,
        "functionalStrengthTraining" => 0.9,
        "crossTraining" => 0.85,
        "highIntensityIntervalTraining" => 0.8,
        "coreTraining" => 0.6,
        "yoga" => 0.4,
        "pilates" => 0.5,
        "flexibility" => 0.3,
        "wrestling" => 0.9,
        "boxing" => 0.8,
        "kickboxing" => 0.85,
        "martialArts" => 0.85,
        "climbing" => 0.85,
        "rowing" => 0.75,
        _ => DEFAULT_MASS_FACTOR,
    }
}

/// Score one workout's muscular load
///
/// volume = duration * mass factor; intensity = (avgHR/maxHR)*(peakHR/maxHR)
/// clamped to [0, 1]; load = volume * intensity * 2, adjusted by +-10% per
/// RPE point from 5 when an RPE is supplied, clamped to [0, 100].
pub fn compute_load(
    workout_type: &str,
    duration_minutes: f64,
    average_heart_rate: f64,
    max_heart_rate_during_workout: f64,
    user_max_heart_rate: f64,
    rpe: Option<u8>,
) -> MuscularLoadResult {
    let volume_score = duration_minutes * effective_mass_factor(workout_type);

    let avg_hr_ratio = average_heart_rate / user_max_heart_rate;
    let peak_hr_ratio = max_heart_rate_during_workout / user_max_heart_rate;
    let intensity_score = (avg_hr_ratio * peak_hr_ratio).clamp(0.0, 1.0);

    let mut load = volume_score * intensity_score * CALIBRATION_FACTOR;
    if let Some(rpe) = rpe {
        load *= 1.0 + (f64::from(rpe) - 5.0) * 0.1;
    }
    let load = load.clamp(0.0, 100.0);

    MuscularLoadResult {
        load,
        volume_score,
        intensity_score,
        workout_type: workout_type.to_string(),
    }
}

/// Whether the activity type is strength-like or high-intensity-like
pub fn is_strength_workout(workout_type: &str) -> bool {
    matches!(
        workout_type,
        "traditionalStrengthTraining"
            | "functionalStrengthTraining"
            | "coreTraining"
            | "crossTraining"
            | "highIntensityIntervalTraining"
            | "wrestling"
            | "boxing"
            | "kickboxing"
            | "martialArts"
            | "climbing"
    )
}
