/// Session-derived signals consulted while scoring a request.
///
/// Implementations must be pure for the duration of one classification so
/// that identical state yields identical results.
pub trait IContextSignals {
    /// Decayed prior boost in `[0, cap]` for the current system set. Must be
    /// exactly 0 when `total_binary_matches == 0`.
    fn prior_boost(&self, current_systems: &[String], total_binary_matches: usize) -> f64;

    /// Decay-weighted share of recent history containing `system_id`, in
    /// `[0, 1]`. Used to re-weight cross-scores when the binary pass found
    /// nothing.
    fn system_affinity(&self, system_id: &str) -> f64;
}

/// Context that contributes nothing. Used for stateless classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContext;

impl IContextSignals for NoContext {
    fn prior_boost(&self, _current_systems: &[String], _total_binary_matches: usize) -> f64 {
        0.0
    }

    fn system_affinity(&self, _system_id: &str) -> f64 {
        0.0
    }
}
