// Single source of truth for all default values.

// --- Calibration ---
pub const DEFAULT_SINGLE_WITH_SUBDOMAIN: f64 = 0.85;
pub const DEFAULT_SINGLE_WITHOUT_SUBDOMAIN: f64 = 0.70;
pub const DEFAULT_MULTI_FAST_PATH: f64 = 0.60;
pub const DEFAULT_WEIGHTED_SINGLE_BASE: f64 = 0.70;
pub const DEFAULT_DOMINANCE_SLOPE: f64 = 0.40;
pub const DEFAULT_SUBDOMAIN_BONUS: f64 = 0.10;
pub const DEFAULT_WEIGHTED_MULTI_BASE: f64 = 0.60;
pub const DEFAULT_GAP_SLOPE: f64 = 0.30;
pub const DEFAULT_MULTI_CEILING: f64 = 0.69;
pub const DEFAULT_RECONSTRUCTION_GAP: f64 = 0.3;

// --- Session ---
pub const DEFAULT_HISTORY_MAX_ENTRIES: usize = 500;
pub const DEFAULT_HISTORY_KEEP_RATIO: f64 = 0.8;
pub const DEFAULT_RECENT_LIMIT: usize = 5;
pub const DEFAULT_RECENT_WINDOW_MINUTES: i64 = 30;
pub const MAX_RECENT_WINDOW_MINUTES: i64 = 60 * 24 * 365;
pub const DEFAULT_BOOST_DECAY: f64 = 0.7;
pub const DEFAULT_BOOST_SCALE: f64 = 0.05;
pub const DEFAULT_BOOST_CAP: f64 = 0.10;
pub const DEFAULT_CONTEXT_REWEIGHT: f64 = 0.10;
pub const DEFAULT_MIN_TRANSITION_CONFIDENCE: f64 = 0.20;

// --- Pattern cache ---
pub const DEFAULT_PROMOTION_THRESHOLD: u32 = 3;
pub const DEFAULT_CACHE_RETENTION_DAYS: i64 = 90;
pub const MAX_CACHE_RETENTION_DAYS: i64 = 365 * 100;

// --- Constraints ---
pub const DEFAULT_ARCHIVE_RETENTION: usize = 20;

// --- Observability ---
pub const DEFAULT_LOG_FILTER: &str = "arbiter=info";
pub const DEFAULT_JSON_LOGS: bool = false;
