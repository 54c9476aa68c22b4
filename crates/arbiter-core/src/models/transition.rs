use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classification::SystemDomain;

/// How often `to` immediately followed `from` within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: SystemDomain,
    pub to: SystemDomain,
    pub count: u64,
    pub last_seen: DateTime<Utc>,
}
