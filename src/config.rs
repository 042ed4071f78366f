//! Scoring configuration snapshot
//!
//! All tunable constants for the scoring engines live in a single versioned
//! JSON document. The document is loaded and validated once at process start,
//! then shared by reference; nothing in the engines mutates it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors raised while loading or validating a scoring configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unsupported config version: {version}")]
    UnsupportedVersion { version: u32 },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Inclusive integer score range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: i32,
    pub max: i32,
}

/// Inclusive floating-point value range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

/// Per-metric weights for the recovery composite
///
/// Expected (not enforced) to sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryWeights {
    pub hrv: f64,
    pub resting_heart_rate: f64,
    pub sleep: f64,
    pub respiratory_rate: f64,
    pub spo2: f64,
    pub skin_temperature: f64,
}

/// Score ranges backing each recovery zone
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecoveryZoneRanges {
    pub green: ScoreRange,
    pub yellow: ScoreRange,
    pub red: ScoreRange,
}

/// Recommended strain interval per recovery zone
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecoveryStrainTargets {
    pub green: ValueRange,
    pub yellow: ValueRange,
    pub red: ValueRange,
}

/// Deviation thresholds that qualify a metric for the recovery insight text
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryInsightThresholds {
    pub hrv_percent_change: f64,
    #[serde(rename = "rhrDeltaBPM")]
    pub rhr_delta_bpm: f64,
    pub sleep_performance_high: f64,
    pub sleep_performance_low: f64,
    pub skin_temp_deviation_celsius: f64,
}

/// Recovery engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryConfig {
    pub weights: RecoveryWeights,
    pub sigmoid_steepness: f64,
    pub score_range: ScoreRange,
    pub zones: RecoveryZoneRanges,
    pub strain_targets: RecoveryStrainTargets,
    pub insight_thresholds: RecoveryInsightThresholds,
}

/// Weights for the four sleep sub-scores
///
/// Expected (not enforced) to sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SleepCompositeWeights {
    pub sufficiency: f64,
    pub efficiency: f64,
    pub consistency: f64,
    pub disturbances: f64,
}

/// One sleep-need supplement tier: strain below the threshold adds the hours
///
/// Tiers must be supplied pre-sorted ascending by `strain_below`; the sleep
/// engine takes the first matching tier without validating the ordering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrainSupplement {
    pub strain_below: f64,
    pub add_hours: f64,
}

/// Fallback values when no personal history is available
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepDefaults {
    pub baseline_hours: f64,
    pub onset_latency_minutes: f64,
}

/// Session classification thresholds
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSessionDetection {
    pub gap_tolerance_minutes: f64,
    pub minimum_duration_minutes: f64,
    pub maximum_nap_duration_hours: f64,
    pub nap_credit_cap_hours: f64,
}

/// Sleep engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepConfig {
    pub composite_weights: SleepCompositeWeights,
    pub consistency_window_nights: u32,
    pub consistency_decay_tau: f64,
    pub disturbance_scaling: f64,
    pub strain_supplements: Vec<StrainSupplement>,
    pub debt_repayment_rate: f64,
    pub defaults: SleepDefaults,
    pub session_detection: SleepSessionDetection,
}

/// Named strain value ranges for day-level classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StrainZoneRanges {
    pub light: ValueRange,
    pub moderate: ValueRange,
    pub high: ValueRange,
    pub overreaching: ValueRange,
}

/// Strain engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrainConfig {
    pub scaling_factor: f64,
    pub log_offset_constant: f64,
    pub max_value: f64,
    pub min_value: f64,
    pub zones: StrainZoneRanges,
}

/// Heart rate zone boundaries and multipliers
///
/// `boundaries` holds six ascending fractions of max HR (zone N spans
/// boundaries[N-1]..boundaries[N]); `multipliers` holds the five per-zone
/// strain weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartRateZoneConfig {
    pub boundaries: Vec<f64>,
    pub multipliers: Vec<f64>,
    pub sample_max_duration_seconds: f64,
}

/// Rolling baseline parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineConfig {
    pub window_days: usize,
    pub minimum_samples: usize,
    pub fallback_days: usize,
    pub exponential_alpha: f64,
}

/// Sleep goal multipliers applied to the nightly sleep need
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepGoalMultipliers {
    pub peak: f64,
    pub perform: f64,
    pub get_by: f64,
}

/// Sleep planner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepPlannerConfig {
    pub goal_multipliers: SleepGoalMultipliers,
}

/// Top-level versioned scoring configuration
///
/// Unknown extra fields in the document are ignored; missing required fields
/// are a parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    pub version: u32,
    pub recovery: RecoveryConfig,
    pub sleep: SleepConfig,
    pub strain: StrainConfig,
    pub heart_rate_zones: HeartRateZoneConfig,
    pub baselines: BaselineConfig,
    pub sleep_planner: SleepPlannerConfig,
}

impl ScoringConfig {
    /// Parse and validate a configuration from a JSON document
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let config: ScoringConfig = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path)?;
        let config = Self::from_json(&content)?;
        info!(
            version = config.version,
            path = %path.as_ref().display(),
            "loaded scoring config"
        );
        Ok(config)
    }

    /// Structural validation applied once at load time
    ///
    /// Engines assume these invariants afterwards and never re-check them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version < 1 {
            return Err(ConfigError::UnsupportedVersion {
                version: self.version,
            });
        }

        let boundaries = &self.heart_rate_zones.boundaries;
        if boundaries.len() != 6 {
            return Err(ConfigError::Invalid(format!(
                "expected 6 heart rate zone boundaries, got {}",
                boundaries.len()
            )));
        }
        if boundaries.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ConfigError::Invalid(
                "heart rate zone boundaries must be strictly increasing".to_string(),
            ));
        }
        if self.heart_rate_zones.multipliers.len() != 5 {
            return Err(ConfigError::Invalid(format!(
                "expected 5 heart rate zone multipliers, got {}",
                self.heart_rate_zones.multipliers.len()
            )));
        }

        if self.recovery.score_range.min >= self.recovery.score_range.max {
            return Err(ConfigError::Invalid(
                "recovery score range must have min < max".to_string(),
            ));
        }
        if self.strain.min_value >= self.strain.max_value {
            return Err(ConfigError::Invalid(
                "strain range must have min < max".to_string(),
            ));
        }
        if self.sleep.strain_supplements.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one strain supplement tier is required".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            version: 1,
            recovery: RecoveryConfig {
                weights: RecoveryWeights {
                    hrv: 0.40,
                    resting_heart_rate: 0.25,
                    sleep: 0.20,
                    respiratory_rate: 0.05,
                    spo2: 0.05,
                    skin_temperature: 0.05,
                },
                sigmoid_steepness: 1.5,
                score_range: ScoreRange { min: 1, max: 99 },
                zones: RecoveryZoneRanges {
                    green: ScoreRange { min: 67, max: 99 },
                    yellow: ScoreRange { min: 34, max: 66 },
                    red: ScoreRange { min: 1, max: 33 },
                },
                strain_targets: RecoveryStrainTargets {
                    green: ValueRange {
                        min: 14.0,
                        max: 18.0,
                    },
                    yellow: ValueRange {
                        min: 8.0,
                        max: 13.9,
                    },
                    red: ValueRange { min: 2.0, max: 7.9 },
                },
                insight_thresholds: RecoveryInsightThresholds {
                    hrv_percent_change: 10.0,
                    rhr_delta_bpm: 3.0,
                    sleep_performance_high: 95.0,
                    sleep_performance_low: 70.0,
                    skin_temp_deviation_celsius: 0.5,
                },
            },
            sleep: SleepConfig {
                composite_weights: SleepCompositeWeights {
                    sufficiency: 0.50,
                    efficiency: 0.25,
                    consistency: 0.15,
                    disturbances: 0.10,
                },
                consistency_window_nights: 4,
                consistency_decay_tau: 60.0,
                disturbance_scaling: 20.0,
                strain_supplements: vec![
                    StrainSupplement {
                        strain_below: 8.0,
                        add_hours: 0.0,
                    },
                    StrainSupplement {
                        strain_below: 14.0,
                        add_hours: 0.25,
                    },
                    StrainSupplement {
                        strain_below: 18.0,
                        add_hours: 0.5,
                    },
                    StrainSupplement {
                        strain_below: 999.0,
                        add_hours: 0.75,
                    },
                ],
                debt_repayment_rate: 0.20,
                defaults: SleepDefaults {
                    baseline_hours: 7.5,
                    onset_latency_minutes: 15.0,
                },
                session_detection: SleepSessionDetection {
                    gap_tolerance_minutes: 30.0,
                    minimum_duration_minutes: 30.0,
                    maximum_nap_duration_hours: 3.0,
                    nap_credit_cap_hours: 1.5,
                },
            },
            strain: StrainConfig {
                scaling_factor: 6.0,
                log_offset_constant: 1.0,
                max_value: 21.0,
                min_value: 0.0,
                zones: StrainZoneRanges {
                    light: ValueRange { min: 0.0, max: 8.0 },
                    moderate: ValueRange {
                        min: 8.0,
                        max: 14.0,
                    },
                    high: ValueRange {
                        min: 14.0,
                        max: 18.0,
                    },
                    overreaching: ValueRange {
                        min: 18.0,
                        max: 21.0,
                    },
                },
            },
            heart_rate_zones: HeartRateZoneConfig {
                boundaries: vec![0.50, 0.60, 0.70, 0.80, 0.90, 1.00],
                multipliers: vec![1.0, 2.0, 3.0, 4.0, 5.0],
                sample_max_duration_seconds: 600.0,
            },
            baselines: BaselineConfig {
                window_days: 28,
                minimum_samples: 3,
                fallback_days: 3,
                exponential_alpha: 0.1,
            },
            sleep_planner: SleepPlannerConfig {
                goal_multipliers: SleepGoalMultipliers {
                    peak: 1.0,
                    perform: 0.85,
                    get_by: 0.70,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScoringConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = ScoringConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = ScoringConfig::from_json(&json).unwrap();

        assert_eq!(parsed.version, config.version);
        assert_eq!(parsed.recovery.sigmoid_steepness, 1.5);
        assert_eq!(parsed.heart_rate_zones.boundaries.len(), 6);
        assert_eq!(parsed.sleep.strain_supplements.len(), 4);
    }

    #[test]
    fn test_camel_case_field_names() {
        let json = serde_json::to_value(ScoringConfig::default()).unwrap();
        assert!(json["heartRateZones"]["sampleMaxDurationSeconds"].is_number());
        assert!(json["recovery"]["insightThresholds"]["rhrDeltaBPM"].is_number());
        assert!(json["sleepPlanner"]["goalMultipliers"]["getBy"].is_number());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let mut json = serde_json::to_value(ScoringConfig::default()).unwrap();
        json["experimental"] = serde_json::json!({"enabled": true});
        let parsed: Result<ScoringConfig, _> = serde_json::from_value(json);
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_missing_section_is_parse_error() {
        let mut json = serde_json::to_value(ScoringConfig::default()).unwrap();
        json.as_object_mut().unwrap().remove("strain");
        let result = ScoringConfig::from_json(&json.to_string());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_version_zero_rejected() {
        let mut config = ScoringConfig::default();
        config.version = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedVersion { version: 0 })
        ));
    }

    #[test]
    fn test_non_increasing_boundaries_rejected() {
        let mut config = ScoringConfig::default();
        config.heart_rate_zones.boundaries = vec![0.50, 0.60, 0.60, 0.80, 0.90, 1.00];
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_config_file_io() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoring_config.json");
        let json = serde_json::to_string_pretty(&ScoringConfig::default()).unwrap();
        std::fs::write(&path, json).unwrap();

        let loaded = ScoringConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.strain.max_value, 21.0);
    }
}
