use serde::{Deserialize, Serialize};

use super::constraint::Priority;

/// Which detection tier found the conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictTier {
    /// Same target, different value.
    Structural,
    /// Combination known to be architecturally incompatible.
    Semantic,
}

impl ConflictTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Semantic => "semantic",
        }
    }
}

/// Priority mix of the two constraints in a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    HardVsHard,
    HardVsSoft,
    SoftVsSoft,
}

impl ConflictType {
    /// Order-independent classification of a priority pair.
    pub fn from_priorities(a: Priority, b: Priority) -> Self {
        match (a.is_hard(), b.is_hard()) {
            (true, true) => Self::HardVsHard,
            (false, false) => Self::SoftVsSoft,
            _ => Self::HardVsSoft,
        }
    }
}

/// How a conflict was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    AcceptA,
    AcceptB,
    Unresolved,
}

/// A detected conflict between two constraints. Recomputed on every
/// resolution run; never persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub conflict_id: String,
    pub constraint_a_id: String,
    pub constraint_b_id: String,
    pub tier: ConflictTier,
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    pub auto_resolvable: bool,
    pub resolution: Resolution,
    pub rationale: String,
}
