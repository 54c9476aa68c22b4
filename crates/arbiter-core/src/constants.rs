/// Arbiter engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Confidence served for pattern-cache hits. Live scoring never reaches it.
pub const CACHE_HIT_CONFIDENCE: f64 = 1.0;

/// Upper bound for any confidence produced by live scoring.
pub const MAX_LIVE_CONFIDENCE: f64 = 0.99;

/// Single-system / ambiguous boundary consumed by orchestration layers.
pub const SINGLE_SYSTEM_THRESHOLD: f64 = 0.70;

/// Rationale attached to auto-resolved structural conflicts.
pub const RATIONALE_HARD_OVER_SOFT: &str = "hard constraint takes precedence over soft constraint";

/// Rationale attached to conflicts that cannot be auto-resolved.
pub const RATIONALE_NEEDS_ADJUDICATION: &str = "requires external/human adjudication";

/// File names inside the state directory.
pub const PATTERN_CACHE_FILE: &str = "pattern_cache.json";
pub const HISTORY_FILE: &str = "history.json";
pub const TRANSITIONS_FILE: &str = "transitions.json";
pub const CONSTRAINTS_FILE: &str = "constraints.json";
pub const SESSIONS_DIR: &str = "sessions";
pub const ARCHIVE_DIR: &str = "archive";
