//! Confidence calibration. Pure: same inputs, same confidence.

use arbiter_core::config::CalibrationConfig;
use arbiter_core::constants::MAX_LIVE_CONFIDENCE;

/// Everything the calibrator looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationInput {
    pub total_binary_matches: usize,
    pub final_system_count: usize,
    pub has_subdomain: bool,
    pub phase2_active: bool,
    pub gap: f64,
    pub dominance: f64,
}

/// Map match statistics to a live confidence in `[0, MAX_LIVE_CONFIDENCE]`.
pub fn calibrate(input: &CalibrationInput, config: &CalibrationConfig) -> f64 {
    let raw = if !input.phase2_active {
        match (input.total_binary_matches, input.has_subdomain) {
            (0, _) => 0.0,
            (1, true) => config.single_with_subdomain,
            (1, false) => config.single_without_subdomain,
            _ => config.multi_fast_path,
        }
    } else {
        match input.final_system_count {
            0 => 0.0,
            1 => {
                let bonus = if input.has_subdomain {
                    config.subdomain_bonus
                } else {
                    0.0
                };
                config.weighted_single_base
                    + (input.dominance - 0.5) * config.dominance_slope
                    + bonus
            }
            _ => (config.weighted_multi_base + input.gap * config.gap_slope)
                .min(config.multi_ceiling),
        }
    };
    clamp_live(raw)
}

/// Clamp into `[0, 1]`, warn on anomalies, then cap below the cache-hit value.
pub fn clamp_live(raw: f64) -> f64 {
    let clamped = if raw.is_nan() {
        tracing::warn!(raw = %raw, "calibration out of range");
        0.0
    } else if !(0.0..=1.0).contains(&raw) {
        tracing::warn!(raw = %raw, "calibration out of range");
        raw.clamp(0.0, 1.0)
    } else {
        raw
    };
    clamped.min(MAX_LIVE_CONFIDENCE)
}
