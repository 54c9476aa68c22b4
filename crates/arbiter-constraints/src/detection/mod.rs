//! Conflict detection over a snapshot of a session's constraints.
//!
//! Two tiers run pairwise:
//! - **Structural**: same target, different value.
//! - **Semantic**: rule table of incompatible target/value combinations.
//!
//! Every pair is canonicalised by id, so detection does not depend on the
//! order constraints were declared in.

pub mod semantic;
pub mod structural;

use std::sync::Arc;

use arbiter_core::errors::ConfigError;
use arbiter_core::models::{ConflictRecord, ConflictTier, Constraint};

pub use semantic::{SemanticRule, SemanticRuleSet, SidePattern};
pub use structural::detect_structural;

/// Runs both tiers. Structural conflicts come first.
#[derive(Debug, Clone)]
pub struct ConflictDetector {
    rules: Arc<SemanticRuleSet>,
}

impl ConflictDetector {
    pub fn new(rules: Arc<SemanticRuleSet>) -> Self {
        Self { rules }
    }

    /// Detector over the built-in semantic rule table.
    pub fn with_builtin_rules() -> Result<Self, ConfigError> {
        Ok(Self::new(SemanticRuleSet::builtin()?))
    }

    pub fn rules(&self) -> &SemanticRuleSet {
        &self.rules
    }

    pub fn detect(&self, constraints: &[Constraint]) -> Vec<ConflictRecord> {
        let mut conflicts = detect_structural(constraints);
        let structural = conflicts.len();
        conflicts.extend(self.rules.detect(constraints));
        tracing::debug!(
            constraints = constraints.len(),
            structural,
            semantic = conflicts.len() - structural,
            "detected constraint conflicts"
        );
        conflicts
    }
}

/// Order a pair so the smaller id comes first.
pub(crate) fn canonical_pair<'a>(
    a: &'a Constraint,
    b: &'a Constraint,
) -> (&'a Constraint, &'a Constraint) {
    if a.id <= b.id {
        (a, b)
    } else {
        (b, a)
    }
}

/// `cf-` + first 16 hex chars of blake3 over `tier|rule|a|b`.
pub fn conflict_id(tier: ConflictTier, rule: &str, a_id: &str, b_id: &str) -> String {
    let key = format!("{}|{}|{}|{}", tier.as_str(), rule, a_id, b_id);
    let hash = blake3::hash(key.as_bytes()).to_hex();
    format!("cf-{}", &hash.as_str()[..16])
}
