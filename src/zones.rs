//! Heart rate zone calculation
//!
//! Maps a heart rate to one of five effort zones given a max heart rate and
//! the configured boundary fractions. Zone N spans boundaries[N-1] to
//! boundaries[N] as a fraction of max HR; heart rates below the first
//! boundary fall outside every zone and carry no strain multiplier.

use serde::Serialize;

use crate::config::HeartRateZoneConfig;

/// One derived heart rate zone with absolute BPM bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartRateZone {
    /// Zone index, 1-5
    pub zone: u8,
    pub name: &'static str,
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// Strain weight for minutes spent in this zone
    pub multiplier: f64,
}

const ZONE_NAMES: [&str; 5] = ["Warm-Up", "Fat Burn", "Aerobic", "Threshold", "Anaerobic"];

/// Zone lookup for one athlete's max heart rate
///
/// The zone list is derived once at construction and immutable afterwards;
/// build a new calculator for a different max HR or config.
#[derive(Debug, Clone)]
pub struct HeartRateZoneCalculator {
    max_heart_rate: u32,
    boundaries: Vec<f64>,
    zones: Vec<HeartRateZone>,
}

impl HeartRateZoneCalculator {
    pub fn new(max_heart_rate: u32, config: &HeartRateZoneConfig) -> Self {
        let max_hr = f64::from(max_heart_rate);
        let b = &config.boundaries;
        let m = &config.multipliers;

        let zones = (0..5)
            .map(|i| HeartRateZone {
                zone: (i + 1) as u8,
                name: ZONE_NAMES[i],
                lower_bound: max_hr * b[i],
                upper_bound: max_hr * b[i + 1],
                multiplier: m[i],
            })
            .collect();

        HeartRateZoneCalculator {
            max_heart_rate,
            boundaries: b.clone(),
            zones,
        }
    }

    pub fn max_heart_rate(&self) -> u32 {
        self.max_heart_rate
    }

    /// The five derived zones in ascending order
    pub fn zones(&self) -> &[HeartRateZone] {
        &self.zones
    }

    /// Zone containing the heart rate, or `None` below the first boundary
    ///
    /// Intervals are half-open on the upper side; anything at or above the
    /// last interior boundary lands in the top zone.
    pub fn zone(&self, heart_rate: f64) -> Option<&HeartRateZone> {
        let percentage = heart_rate / f64::from(self.max_heart_rate);

        if percentage < self.boundaries[0] {
            return None;
        }
        for i in 1..5 {
            if percentage < self.boundaries[i] {
                return Some(&self.zones[i - 1]);
            }
        }
        Some(&self.zones[4])
    }

    /// Zone index 1-5, or 0 when no zone matches
    pub fn zone_number(&self, heart_rate: f64) -> u8 {
        self.zone(heart_rate).map_or(0, |z| z.zone)
    }

    /// Strain multiplier, or 0.0 when no zone matches
    pub fn multiplier(&self, heart_rate: f64) -> f64 {
        self.zone(heart_rate).map_or(0.0, |z| z.multiplier)
    }

    /// Integer BPM bounds per zone, for display
    pub fn zone_boundaries(&self) -> Vec<(u8, u32, u32)> {
        self.zones
            .iter()
            .map(|z| (z.zone, z.lower_bound as u32, z.upper_bound as u32))
            .collect()
    }
}
