use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classification::ClassificationResult;

/// One completed classification in a session's history. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionHistoryEntry {
    /// Normalized request signature.
    pub signature: String,
    pub result: ClassificationResult,
    pub timestamp: DateTime<Utc>,
    /// Signature of the entry immediately preceding this one.
    pub prev_signature: Option<String>,
}

/// A promoted signature served without scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternCacheEntry {
    pub signature: String,
    /// The live result that earned promotion. Hits never alter it.
    pub result: ClassificationResult,
    pub hit_count: u32,
    pub last_used: DateTime<Utc>,
    pub promoted_at: DateTime<Utc>,
}
