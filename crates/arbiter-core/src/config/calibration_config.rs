use serde::{Deserialize, Serialize};

use super::defaults;

/// Constants of the confidence calibration formulas.
///
/// The defaults are empirically chosen; deployments may tune them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Fast path: exactly one system matched and a subdomain was found.
    pub single_with_subdomain: f64,
    /// Fast path: exactly one system matched, no subdomain.
    pub single_without_subdomain: f64,
    /// Fast path: two or more systems matched.
    pub multi_fast_path: f64,
    /// Weighted path, one final system: base before the dominance term.
    pub weighted_single_base: f64,
    /// Weighted path, one final system: multiplier on `dominance - 0.5`.
    pub dominance_slope: f64,
    /// Weighted path, one final system: bonus when a subdomain was found.
    pub subdomain_bonus: f64,
    /// Weighted path, two or more final systems: base before the gap term.
    pub weighted_multi_base: f64,
    /// Weighted path, two or more final systems: multiplier on `gap`.
    pub gap_slope: f64,
    /// Ceiling for every multi-system confidence.
    pub multi_ceiling: f64,
    /// Minimum gap for zero-match reconstruction to keep only the top system.
    pub reconstruction_gap: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            single_with_subdomain: defaults::DEFAULT_SINGLE_WITH_SUBDOMAIN,
            single_without_subdomain: defaults::DEFAULT_SINGLE_WITHOUT_SUBDOMAIN,
            multi_fast_path: defaults::DEFAULT_MULTI_FAST_PATH,
            weighted_single_base: defaults::DEFAULT_WEIGHTED_SINGLE_BASE,
            dominance_slope: defaults::DEFAULT_DOMINANCE_SLOPE,
            subdomain_bonus: defaults::DEFAULT_SUBDOMAIN_BONUS,
            weighted_multi_base: defaults::DEFAULT_WEIGHTED_MULTI_BASE,
            gap_slope: defaults::DEFAULT_GAP_SLOPE,
            multi_ceiling: defaults::DEFAULT_MULTI_CEILING,
            reconstruction_gap: defaults::DEFAULT_RECONSTRUCTION_GAP,
        }
    }
}
