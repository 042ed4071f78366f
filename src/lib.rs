// Library interface for the vitalrs scoring engines
// Every engine is a pure, synchronous function over immutable inputs

pub mod baseline;
pub mod config;
pub mod hrv;
pub mod logging;
pub mod muscular_load;
pub mod recovery;
pub mod scoring;
pub mod sleep;
pub mod sleep_planner;
pub mod stats;
pub mod strain;
pub mod zones;

// Re-export commonly used types for convenience
pub use baseline::{compute_baseline, update_baseline, z_score, BaselineResult};
pub use config::{ConfigError, ScoringConfig};
pub use hrv::{best_hrv, compute_rmssd, effective_hrv, HrvMethod, HrvResult};
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use muscular_load::{compute_load, is_strength_workout, MuscularLoadResult};
pub use recovery::{
    RecoveryBaselines, RecoveryEngine, RecoveryInput, RecoveryResult, RecoveryZone,
};
pub use sleep::{
    SleepAnalysisResult, SleepConsistencyInput, SleepEngine, SleepSessionData, SleepStage,
    SleepStageData,
};
pub use sleep_planner::{SleepGoal, SleepPlan, SleepPlanner};
pub use stats::{
    analyze_correlation, CorrelationDirection, CorrelationResult, EffectSizeClass,
};
pub use strain::{
    estimate_durations, HeartRateSample, StrainEngine, StrainResult, StrainZone,
};
pub use zones::{HeartRateZone, HeartRateZoneCalculator};
