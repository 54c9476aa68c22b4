//! KeywordCorpus — versioned keyword tables compiled into word-boundary
//! regexes. Validated at load, immutable afterwards.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use arbiter_core::errors::ConfigError;
use regex::Regex;
use serde::Deserialize;

const BUILTIN_CORPUS: &str = include_str!("../corpus/default.toml");
const BUILTIN_PATH: &str = "<builtin corpus>";

// ── File schema ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CorpusFile {
    version: String,
    #[serde(default)]
    systems: Vec<SystemDef>,
    #[serde(default)]
    cross_groups: Vec<CrossGroupDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SystemDef {
    id: String,
    keywords: Vec<String>,
    #[serde(default)]
    domains: Vec<DomainDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DomainDef {
    id: String,
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CrossGroupDef {
    id: String,
    keywords: Vec<String>,
    weights: BTreeMap<String, f64>,
}

// ── Compiled corpus ──────────────────────────────────────────────────────────

/// A top-level system with its compiled pattern and domains.
#[derive(Debug, Clone)]
pub struct SystemEntry {
    pub id: String,
    pub pattern: Regex,
    pub domains: Vec<DomainEntry>,
}

#[derive(Debug, Clone)]
pub struct DomainEntry {
    pub id: String,
    pub pattern: Regex,
}

/// A cross-keyword group. `weights` holds `(system index, weight)` sorted by
/// system index.
#[derive(Debug, Clone)]
pub struct CrossGroup {
    pub id: String,
    pub pattern: Regex,
    pub weights: Vec<(usize, f64)>,
}

/// Compiled keyword corpus. Systems and domains keep declaration order, which
/// is the deterministic output order of every classification.
#[derive(Debug, Clone)]
pub struct KeywordCorpus {
    version: String,
    systems: Vec<SystemEntry>,
    cross_groups: Vec<CrossGroup>,
}

impl KeywordCorpus {
    /// The embedded default corpus, compiled once per process.
    pub fn builtin() -> Result<Arc<KeywordCorpus>, ConfigError> {
        static BUILTIN: OnceLock<Result<Arc<KeywordCorpus>, ConfigError>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| parse(BUILTIN_CORPUS, BUILTIN_PATH).map(Arc::new))
            .clone()
    }

    /// Load and validate a corpus file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let shown = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: shown.clone(),
        })?;
        let corpus = parse(&text, &shown)?;
        tracing::info!(
            path = %shown,
            version = %corpus.version,
            systems = corpus.systems.len(),
            cross_groups = corpus.cross_groups.len(),
            "loaded keyword corpus"
        );
        Ok(corpus)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        parse(text, "<inline corpus>")
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn systems(&self) -> &[SystemEntry] {
        &self.systems
    }

    pub fn cross_groups(&self) -> &[CrossGroup] {
        &self.cross_groups
    }

    pub fn system_ids(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|s| s.id.as_str())
    }

    pub fn system_index(&self, id: &str) -> Option<usize> {
        self.systems.iter().position(|s| s.id == id)
    }
}

fn parse(text: &str, path: &str) -> Result<KeywordCorpus, ConfigError> {
    let file: CorpusFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    compile(file)
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.into(),
        message: message.into(),
    }
}

fn compile(file: CorpusFile) -> Result<KeywordCorpus, ConfigError> {
    if file.version.trim().is_empty() {
        return Err(invalid("version", "must not be empty"));
    }
    if file.systems.is_empty() {
        return Err(invalid("systems", "corpus declares no systems"));
    }

    let mut system_ids = HashSet::new();
    let mut domain_ids = HashSet::new();
    let mut systems = Vec::with_capacity(file.systems.len());
    for def in file.systems {
        let field = format!("systems.{}", def.id);
        if def.id.trim().is_empty() {
            return Err(invalid("systems.id", "must not be empty"));
        }
        if !system_ids.insert(def.id.clone()) {
            return Err(invalid(field, "duplicate system id"));
        }
        let pattern = compile_alternation(&field, &def.keywords)?;

        let mut domains = Vec::with_capacity(def.domains.len());
        for domain in def.domains {
            let field = format!("{field}.domains.{}", domain.id);
            if domain.id.trim().is_empty() {
                return Err(invalid(field, "domain id must not be empty"));
            }
            if !domain_ids.insert(domain.id.clone()) {
                return Err(invalid(field, "duplicate domain id"));
            }
            domains.push(DomainEntry {
                pattern: compile_alternation(&field, &domain.keywords)?,
                id: domain.id,
            });
        }
        systems.push(SystemEntry {
            id: def.id,
            pattern,
            domains,
        });
    }

    let mut group_ids = HashSet::new();
    let mut cross_groups = Vec::with_capacity(file.cross_groups.len());
    for def in file.cross_groups {
        let field = format!("cross_groups.{}", def.id);
        if !group_ids.insert(def.id.clone()) {
            return Err(invalid(field, "duplicate cross group id"));
        }
        if def.weights.len() < 2 {
            return Err(invalid(field, "cross group must touch at least two systems"));
        }
        let mut weights = Vec::with_capacity(def.weights.len());
        for (system, weight) in &def.weights {
            let Some(index) = systems.iter().position(|s| &s.id == system) else {
                return Err(invalid(
                    format!("{field}.weights.{system}"),
                    "refers to an undeclared system",
                ));
            };
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(invalid(
                    format!("{field}.weights.{system}"),
                    format!("weight must be finite and positive, got {weight}"),
                ));
            }
            weights.push((index, *weight));
        }
        weights.sort_by_key(|(index, _)| *index);
        cross_groups.push(CrossGroup {
            pattern: compile_alternation(&field, &def.keywords)?,
            id: def.id,
            weights,
        });
    }

    Ok(KeywordCorpus {
        version: file.version,
        systems,
        cross_groups,
    })
}

/// Join keyword fragments into `(?i)\b(?:a|b|...)\b`. Every fragment must
/// compile on its own and must not match the empty string.
fn compile_alternation(field: &str, keywords: &[String]) -> Result<Regex, ConfigError> {
    if keywords.is_empty() {
        return Err(invalid(field, "keyword list must not be empty"));
    }
    for keyword in keywords {
        let anchored = Regex::new(&format!("^(?:{keyword})$")).map_err(|e| {
            invalid(field, format!("keyword `{keyword}` does not compile: {e}"))
        })?;
        if keyword.trim().is_empty() || anchored.is_match("") {
            return Err(invalid(field, format!("keyword `{keyword}` matches empty input")));
        }
    }
    let source = format!(r"(?i)\b(?:{})\b", keywords.join("|"));
    Regex::new(&source).map_err(|e| invalid(field, e.to_string()))
}
