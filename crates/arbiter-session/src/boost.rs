//! Decayed session signals: the prior boost and per-system affinity.
//!
//! Entry `i` of `recent` (0 = most recent) carries weight `decay^i`.

use arbiter_core::config::SessionConfig;
use arbiter_core::models::SessionHistoryEntry;

/// `min(scale * Σ overlap_i * decay^i, cap)`, where `overlap_i` is the share
/// of `current_systems` present in entry `i`. Exactly 0 when the binary pass
/// found nothing.
pub fn compute_prior_boost(
    current_systems: &[String],
    total_binary_matches: usize,
    recent: &[SessionHistoryEntry],
    config: &SessionConfig,
) -> f64 {
    if total_binary_matches == 0 || current_systems.is_empty() {
        return 0.0;
    }
    let mut weight = 1.0;
    let mut sum = 0.0;
    for entry in recent {
        let shared = current_systems
            .iter()
            .filter(|s| entry.result.systems().contains(*s))
            .count();
        sum += weight * shared as f64 / current_systems.len() as f64;
        weight *= config.boost_decay;
    }
    (config.boost_scale * sum).clamp(0.0, config.boost_cap)
}

/// Decay-weighted share of `recent` entries that contain `system_id`.
pub fn system_affinity(system_id: &str, recent: &[SessionHistoryEntry], config: &SessionConfig) -> f64 {
    let mut weight = 1.0;
    let mut total = 0.0;
    let mut hits = 0.0;
    for entry in recent {
        total += weight;
        if entry.result.systems().iter().any(|s| s == system_id) {
            hits += weight;
        }
        weight *= config.boost_decay;
    }
    if total > 0.0 {
        (hits / total).clamp(0.0, 1.0)
    } else {
        0.0
    }
}
