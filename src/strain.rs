//! Cardiovascular strain scoring
//!
//! Strain aggregates zone-weighted heart rate exposure over a day or workout
//! into a bounded score. Minutes in higher zones count super-linearly through
//! the per-zone multipliers, and the accumulated exposure area is compressed
//! logarithmically so an unbounded input maps onto a fixed decision scale
//! (typically 0-21).

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::config::{HeartRateZoneConfig, StrainConfig};
use crate::zones::HeartRateZoneCalculator;

/// Duration assigned to a lone sample with no neighbor to infer from
const SINGLE_SAMPLE_DURATION_SECONDS: f64 = 5.0;

/// One heart rate reading with an explicit duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartRateSample {
    pub timestamp_millis: i64,
    pub bpm: f64,
    pub duration_seconds: f64,
}

/// Strain score with its per-zone exposure breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrainResult {
    pub strain: f64,
    pub weighted_hr_area: f64,
    pub zone1_minutes: f64,
    pub zone2_minutes: f64,
    pub zone3_minutes: f64,
    pub zone4_minutes: f64,
    pub zone5_minutes: f64,
}

/// Day-level strain classification from the configured named ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrainZone {
    Light,
    Moderate,
    High,
    Overreaching,
}

impl fmt::Display for StrainZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrainZone::Light => write!(f, "Light"),
            StrainZone::Moderate => write!(f, "Moderate"),
            StrainZone::High => write!(f, "High"),
            StrainZone::Overreaching => write!(f, "Overreaching"),
        }
    }
}

/// Strain scorer for one athlete's max heart rate
pub struct StrainEngine {
    scaling_factor: f64,
    log_offset: f64,
    sample_max_duration_seconds: f64,
    config: StrainConfig,
    zone_calculator: HeartRateZoneCalculator,
}

impl StrainEngine {
    pub fn new(
        max_heart_rate: u32,
        strain_config: &StrainConfig,
        hr_zone_config: &HeartRateZoneConfig,
    ) -> Self {
        StrainEngine {
            scaling_factor: strain_config.scaling_factor,
            log_offset: strain_config.log_offset_constant,
            sample_max_duration_seconds: hr_zone_config.sample_max_duration_seconds,
            config: strain_config.clone(),
            zone_calculator: HeartRateZoneCalculator::new(max_heart_rate, hr_zone_config),
        }
    }

    /// Accumulate zone-weighted exposure and compress it into a strain score
    ///
    /// strain = k * log10(weighted_area + C), clamped to the configured range.
    /// Samples below zone 1 contribute no area and no zone minutes.
    pub fn compute_strain(&self, samples: &[HeartRateSample]) -> StrainResult {
        let mut weighted_hr_area = 0.0;
        let mut zone_minutes = [0.0f64; 5];

        for sample in samples {
            let duration_minutes = sample.duration_seconds / 60.0;
            let multiplier = self.zone_calculator.multiplier(sample.bpm);
            let zone_num = self.zone_calculator.zone_number(sample.bpm);

            weighted_hr_area += duration_minutes * multiplier;

            if (1..=5).contains(&zone_num) {
                zone_minutes[zone_num as usize - 1] += duration_minutes;
            }
        }

        let raw_strain = self.scaling_factor * (weighted_hr_area + self.log_offset).log10();
        let strain = raw_strain.clamp(self.config.min_value, self.config.max_value);

        debug!(
            samples = samples.len(),
            weighted_hr_area, strain, "computed strain"
        );

        StrainResult {
            strain,
            weighted_hr_area,
            zone1_minutes: zone_minutes[0],
            zone2_minutes: zone_minutes[1],
            zone3_minutes: zone_minutes[2],
            zone4_minutes: zone_minutes[3],
            zone5_minutes: zone_minutes[4],
        }
    }

    /// Score raw (timestamp, bpm) pairs by inferring durations first
    ///
    /// Inferred durations are capped at the configured maximum sample
    /// duration, so long gaps in wear do not count as continuous exposure.
    pub fn compute_workout_strain(&self, raw_samples: &[(i64, f64)]) -> StrainResult {
        let samples = estimate_durations(raw_samples, self.sample_max_duration_seconds);
        self.compute_strain(&samples)
    }

    /// Classify a strain value against the configured named ranges
    pub fn classify(&self, strain: f64) -> StrainZone {
        let zones = &self.config.zones;
        if strain < zones.light.max {
            StrainZone::Light
        } else if strain < zones.moderate.max {
            StrainZone::Moderate
        } else if strain < zones.high.max {
            StrainZone::High
        } else {
            StrainZone::Overreaching
        }
    }
}

/// Infer per-sample durations from the gaps between raw readings
///
/// Wearables report irregular intervals with no duration field. Each sample
/// covers the gap to the next one, capped at `max_duration_seconds`; the
/// final sample copies the previous inferred duration, and a lone sample
/// defaults to 5 seconds.
pub fn estimate_durations(
    raw_samples: &[(i64, f64)],
    max_duration_seconds: f64,
) -> Vec<HeartRateSample> {
    if raw_samples.len() <= 1 {
        return raw_samples
            .iter()
            .map(|&(ts, bpm)| HeartRateSample {
                timestamp_millis: ts,
                bpm,
                duration_seconds: SINGLE_SAMPLE_DURATION_SECONDS,
            })
            .collect();
    }

    let mut result: Vec<HeartRateSample> = Vec::with_capacity(raw_samples.len());
    for i in 0..raw_samples.len() {
        let duration = if i < raw_samples.len() - 1 {
            let gap = (raw_samples[i + 1].0 - raw_samples[i].0) as f64 / 1000.0;
            gap.min(max_duration_seconds)
        } else {
            result
                .last()
                .map_or(SINGLE_SAMPLE_DURATION_SECONDS, |s| s.duration_seconds)
        };

        result.push(HeartRateSample {
            timestamp_millis: raw_samples[i].0,
            bpm: raw_samples[i].1,
            duration_seconds: duration,
        });
    }
    result
}
