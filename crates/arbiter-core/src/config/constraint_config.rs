use serde::{Deserialize, Serialize};

use super::defaults;

/// Constraint store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintConfig {
    /// Number of archived constraint sets kept per session.
    pub archive_retention: usize,
    /// Optional TOML file replacing the built-in semantic rule table.
    pub semantic_rules_path: Option<String>,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            archive_retention: defaults::DEFAULT_ARCHIVE_RETENTION,
            semantic_rules_path: None,
        }
    }
}
