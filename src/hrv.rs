//! Heart rate variability derivation
//!
//! RMSSD (root mean square of successive differences) is the primary HRV
//! measure; SDNN from a wearable is accepted as a fallback. The source of
//! the chosen value is recorded so downstream baselines compare like with
//! like.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physiologically plausible beat-to-beat interval range, in milliseconds
const MIN_PLAUSIBLE_INTERVAL_MS: f64 = 200.0;
const MAX_PLAUSIBLE_INTERVAL_MS: f64 = 2000.0;

/// Provenance of an HRV value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HrvMethod {
    /// RMSSD computed locally from raw RR intervals
    RmssdFromRrIntervals,
    /// RMSSD reported by the platform health store
    RmssdFromHealthConnect,
    /// SDNN reported by the platform health store
    SdnnFromHealthConnect,
}

impl fmt::Display for HrvMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HrvMethod::RmssdFromRrIntervals => write!(f, "RMSSD_FROM_RR_INTERVALS"),
            HrvMethod::RmssdFromHealthConnect => write!(f, "RMSSD_FROM_HEALTH_CONNECT"),
            HrvMethod::SdnnFromHealthConnect => write!(f, "SDNN_FROM_HEALTH_CONNECT"),
        }
    }
}

/// Best available HRV representation and where it came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HrvResult {
    pub rmssd: Option<f64>,
    pub sdnn: Option<f64>,
    pub method: HrvMethod,
}

/// Compute RMSSD in milliseconds from heartbeat timestamps in seconds
///
/// Successive timestamp differences become beat intervals; intervals outside
/// the plausible [200, 2000]ms band are discarded before the RMSSD is taken
/// over the retained sequence. Returns `None` whenever fewer than two usable
/// intervals remain.
pub fn compute_rmssd(rr_intervals_seconds: &[f64]) -> Option<f64> {
    if rr_intervals_seconds.len() <= 1 {
        return None;
    }

    let intervals: Vec<f64> = rr_intervals_seconds
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) * 1000.0)
        .filter(|ms| (MIN_PLAUSIBLE_INTERVAL_MS..=MAX_PLAUSIBLE_INTERVAL_MS).contains(ms))
        .collect();

    if intervals.len() <= 1 {
        return None;
    }

    let squared_diffs: Vec<f64> = intervals
        .windows(2)
        .map(|pair| {
            let diff = pair[1] - pair[0];
            diff * diff
        })
        .collect();

    if squared_diffs.is_empty() {
        return None;
    }

    let mean_squared_diff = squared_diffs.iter().sum::<f64>() / squared_diffs.len() as f64;
    Some(mean_squared_diff.sqrt())
}

/// Select the best available HRV representation
///
/// RMSSD wins when present; otherwise SDNN. Both absent yields an empty
/// result still tagged with the SDNN provenance.
pub fn best_hrv(rmssd_value: Option<f64>, sdnn_value: Option<f64>) -> HrvResult {
    if rmssd_value.is_some() {
        return HrvResult {
            rmssd: rmssd_value,
            sdnn: sdnn_value,
            method: HrvMethod::RmssdFromHealthConnect,
        };
    }

    HrvResult {
        rmssd: None,
        sdnn: sdnn_value,
        method: HrvMethod::SdnnFromHealthConnect,
    }
}

/// The single HRV number downstream consumers should use
pub fn effective_hrv(result: &HrvResult) -> Option<f64> {
    result.rmssd.or(result.sdnn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(expected: f64, actual: f64, tolerance: f64) {
        assert!(
            (expected - actual).abs() < tolerance,
            "expected {} but got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_compute_rmssd_empty_returns_none() {
        assert!(compute_rmssd(&[]).is_none());
    }

    #[test]
    fn test_compute_rmssd_single_value_returns_none() {
        assert!(compute_rmssd(&[0.8]).is_none());
    }

    #[test]
    fn test_compute_rmssd_constant_intervals_returns_zero() {
        // Timestamps 0.0, 0.8, 1.6, 2.4 -> intervals 800, 800, 800ms
        let result = compute_rmssd(&[0.0, 0.8, 1.6, 2.4]).unwrap();
        assert_approx(0.0, result, 0.01);
    }

    #[test]
    fn test_compute_rmssd_variable_intervals() {
        // Intervals 800, 900, 700ms -> diffs 100, -200 -> RMSSD sqrt(25000)
        let result = compute_rmssd(&[0.0, 0.8, 1.7, 2.4]).unwrap();
        assert_approx(158.11, result, 0.5);
    }

    #[test]
    fn test_compute_rmssd_implausible_intervals_filtered() {
        // 3.0s gap (3000ms) is discarded, leaving a single retained interval
        assert!(compute_rmssd(&[0.0, 0.8, 3.8]).is_none());
    }

    #[test]
    fn test_best_hrv_prefers_rmssd() {
        let result = best_hrv(Some(45.0), Some(50.0));
        assert_eq!(result.method, HrvMethod::RmssdFromHealthConnect);
        assert_eq!(result.rmssd, Some(45.0));
    }

    #[test]
    fn test_best_hrv_falls_back_to_sdnn() {
        let result = best_hrv(None, Some(50.0));
        assert_eq!(result.method, HrvMethod::SdnnFromHealthConnect);
        assert_eq!(result.sdnn, Some(50.0));
    }

    #[test]
    fn test_effective_hrv_prefers_rmssd() {
        let result = HrvResult {
            rmssd: Some(45.0),
            sdnn: Some(50.0),
            method: HrvMethod::RmssdFromHealthConnect,
        };
        assert_eq!(effective_hrv(&result), Some(45.0));
    }

    #[test]
    fn test_effective_hrv_no_data_returns_none() {
        let result = best_hrv(None, None);
        assert_eq!(effective_hrv(&result), None);
    }

    #[test]
    fn test_method_serializes_screaming_snake() {
        let json = serde_json::to_string(&HrvMethod::RmssdFromRrIntervals).unwrap();
        assert_eq!(json, "\"RMSSD_FROM_RR_INTERVALS\"");
    }
}
