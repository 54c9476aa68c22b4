use serde::{Deserialize, Serialize};

use super::defaults;

/// Session history and context-tracking configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum history entries retained per session before trimming.
    pub history_max_entries: usize,
    /// Fraction of the bound kept (most recent first) when trimming.
    pub history_keep_ratio: f64,
    /// Number of recent entries consulted for the prior boost.
    pub recent_limit: usize,
    /// Only entries younger than this many minutes count as recent.
    pub recent_window_minutes: i64,
    /// Per-entry decay factor applied as `decay^index`.
    pub boost_decay: f64,
    /// Scale applied to the decayed overlap sum.
    pub boost_scale: f64,
    /// Hard ceiling of the prior boost.
    pub boost_cap: f64,
    /// Strength of the zero-match context re-weighting of cross-scores.
    pub context_reweight: f64,
    /// Transitions below this confidence are not suggested.
    pub min_transition_confidence: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_max_entries: defaults::DEFAULT_HISTORY_MAX_ENTRIES,
            history_keep_ratio: defaults::DEFAULT_HISTORY_KEEP_RATIO,
            recent_limit: defaults::DEFAULT_RECENT_LIMIT,
            recent_window_minutes: defaults::DEFAULT_RECENT_WINDOW_MINUTES,
            boost_decay: defaults::DEFAULT_BOOST_DECAY,
            boost_scale: defaults::DEFAULT_BOOST_SCALE,
            boost_cap: defaults::DEFAULT_BOOST_CAP,
            context_reweight: defaults::DEFAULT_CONTEXT_REWEIGHT,
            min_transition_confidence: defaults::DEFAULT_MIN_TRANSITION_CONFIDENCE,
        }
    }
}
