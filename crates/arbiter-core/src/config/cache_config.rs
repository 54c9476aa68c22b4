use serde::{Deserialize, Serialize};

use super::defaults;

/// Pattern cache configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Occurrences of a signature (same classification) before promotion.
    pub promotion_threshold: u32,
    /// Entries unused for longer than this are evicted.
    pub retention_days: i64,
    /// Run eviction when the engine opens its state directory.
    pub evict_on_open: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            promotion_threshold: defaults::DEFAULT_PROMOTION_THRESHOLD,
            retention_days: defaults::DEFAULT_CACHE_RETENTION_DAYS,
            evict_on_open: true,
        }
    }
}
