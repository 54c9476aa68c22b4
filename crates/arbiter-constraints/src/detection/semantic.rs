//! Semantic tier: combinations known to be architecturally incompatible,
//! driven by a rule table of case-insensitive target/value patterns.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use arbiter_core::errors::ConfigError;
use arbiter_core::models::{
    ConflictRecord, ConflictTier, ConflictType, Constraint, Resolution,
};
use regex::Regex;
use serde::Deserialize;

use super::{canonical_pair, conflict_id};

const BUILTIN_RULES: &str = include_str!("../../rules/semantic.toml");

/// One side of a rule as written in TOML. Omitted patterns match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SidePattern {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// A semantic conflict rule: `left` on one constraint, `right` on another.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SemanticRule {
    pub id: String,
    pub left: SidePattern,
    pub right: SidePattern,
    pub rationale: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<SemanticRule>,
}

#[derive(Debug, Clone)]
struct CompiledSide {
    target: Option<Regex>,
    value: Option<Regex>,
}

impl CompiledSide {
    fn matches(&self, constraint: &Constraint) -> bool {
        self.target
            .as_ref()
            .map_or(true, |re| re.is_match(&constraint.target))
            && self
                .value
                .as_ref()
                .map_or(true, |re| re.is_match(&constraint.value))
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: SemanticRule,
    left: CompiledSide,
    right: CompiledSide,
}

/// Validated, compiled rule table.
#[derive(Debug, Clone)]
pub struct SemanticRuleSet {
    rules: Vec<CompiledRule>,
}

impl SemanticRuleSet {
    /// The embedded seed table, compiled once per process.
    pub fn builtin() -> Result<Arc<SemanticRuleSet>, ConfigError> {
        static BUILTIN: OnceLock<Result<Arc<SemanticRuleSet>, ConfigError>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| parse(BUILTIN_RULES, "<builtin semantic rules>").map(Arc::new))
            .clone()
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn new(rules: Vec<SemanticRule>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            let field = format!("rules.{}", rule.id);
            if rule.id.trim().is_empty() {
                return Err(invalid("rules.id", "must not be empty"));
            }
            if !seen.insert(rule.id.clone()) {
                return Err(invalid(field, "duplicate rule id"));
            }
            if rule.rationale.trim().is_empty() {
                return Err(invalid(field, "rationale must not be empty"));
            }
            let left = compile_side(&format!("{field}.left"), &rule.left)?;
            let right = compile_side(&format!("{field}.right"), &rule.right)?;
            compiled.push(CompiledRule { rule, left, right });
        }
        Ok(Self { rules: compiled })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        parse(text, "<inline semantic rules>")
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let shown = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: shown.clone(),
        })?;
        let rules = parse(&text, &shown)?;
        tracing::info!(path = %shown, rules = rules.len(), "loaded semantic conflict rules");
        Ok(rules)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = &SemanticRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    /// Every ordered pair of distinct constraints against every rule.
    /// Results are deduplicated by conflict id.
    pub fn detect(&self, constraints: &[Constraint]) -> Vec<ConflictRecord> {
        let mut seen = HashSet::new();
        let mut conflicts = Vec::new();
        for (i, a) in constraints.iter().enumerate() {
            for (j, b) in constraints.iter().enumerate() {
                if i == j {
                    continue;
                }
                for compiled in &self.rules {
                    if !(compiled.left.matches(a) && compiled.right.matches(b)) {
                        continue;
                    }
                    let (first, second) = canonical_pair(a, b);
                    let id = conflict_id(ConflictTier::Semantic, &compiled.rule.id, &first.id, &second.id);
                    if !seen.insert(id.clone()) {
                        continue;
                    }
                    conflicts.push(ConflictRecord {
                        conflict_id: id,
                        constraint_a_id: first.id.clone(),
                        constraint_b_id: second.id.clone(),
                        tier: ConflictTier::Semantic,
                        conflict_type: ConflictType::from_priorities(first.priority, second.priority),
                        auto_resolvable: false,
                        resolution: Resolution::Unresolved,
                        rationale: compiled.rule.rationale.clone(),
                    });
                }
            }
        }
        conflicts
    }
}

fn parse(text: &str, path: &str) -> Result<SemanticRuleSet, ConfigError> {
    let file: RuleFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    SemanticRuleSet::new(file.rules)
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.into(),
        message: message.into(),
    }
}

fn compile_side(field: &str, side: &SidePattern) -> Result<CompiledSide, ConfigError> {
    if side.target.is_none() && side.value.is_none() {
        return Err(invalid(field, "at least one of target or value is required"));
    }
    let compile = |pattern: &Option<String>| -> Result<Option<Regex>, ConfigError> {
        pattern
            .as_ref()
            .map(|p| {
                Regex::new(&format!("(?i){p}"))
                    .map_err(|e| invalid(field, format!("pattern `{p}` does not compile: {e}")))
            })
            .transpose()
    };
    Ok(CompiledSide {
        target: compile(&side.target)?,
        value: compile(&side.value)?,
    })
}
