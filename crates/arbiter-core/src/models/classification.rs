use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::CACHE_HIT_CONFIDENCE;

/// Cardinality class of a matched system set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationPattern {
    /// No system matched.
    None,
    /// Exactly one system.
    Single,
    /// Exactly two systems.
    Multi,
    /// Three or more systems.
    Cross,
}

impl ClassificationPattern {
    /// Derive the pattern from the number of matched systems.
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Self::None,
            1 => Self::Single,
            2 => Self::Multi,
            _ => Self::Cross,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Single => "single",
            Self::Multi => "multi",
            Self::Cross => "cross",
        }
    }
}

impl fmt::Display for ClassificationPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which classifier path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassifierSource {
    /// Served from the frequency-promoted pattern cache.
    #[serde(rename = "pattern-cache")]
    PatternCache,
    /// Binary keyword match only; cross-scoring inactive.
    #[serde(rename = "keyword-fast-path")]
    KeywordFastPath,
    /// Weighted cross-keyword scoring contributed.
    #[serde(rename = "keyword-weighted")]
    KeywordWeighted,
    /// Weighted scoring refined by session context.
    #[serde(rename = "keyword-weighted+context")]
    KeywordWeightedContext,
}

impl ClassifierSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PatternCache => "pattern-cache",
            Self::KeywordFastPath => "keyword-fast-path",
            Self::KeywordWeighted => "keyword-weighted",
            Self::KeywordWeightedContext => "keyword-weighted+context",
        }
    }
}

impl fmt::Display for ClassifierSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-system floating-point accumulator produced by cross-scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemScore {
    pub system_id: String,
    pub score: f64,
}

/// A `(system, domain)` pair. The domain is absent when no finer-grained
/// domain was detected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SystemDomain {
    pub system: String,
    pub domain: Option<String>,
}

impl SystemDomain {
    pub fn new(system: impl Into<String>, domain: Option<impl Into<String>>) -> Self {
        Self {
            system: system.into(),
            domain: domain.map(Into::into),
        }
    }
}

impl fmt::Display for SystemDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.domain {
            Some(domain) => write!(f, "{}/{}", self.system, domain),
            None => f.write_str(&self.system),
        }
    }
}

/// Outcome of classifying one request.
///
/// `pattern` is always derived from the number of systems, so the only way to
/// build a result is [`ClassificationResult::new`]; deserialization goes
/// through the same constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ClassificationResultRepr")]
pub struct ClassificationResult {
    systems: Vec<String>,
    domains: Vec<String>,
    pattern: ClassificationPattern,
    confidence: f64,
    classifier_source: ClassifierSource,
}

#[derive(Deserialize)]
struct ClassificationResultRepr {
    #[serde(default)]
    systems: Vec<String>,
    #[serde(default)]
    domains: Vec<String>,
    #[serde(default)]
    confidence: f64,
    classifier_source: ClassifierSource,
}

impl From<ClassificationResultRepr> for ClassificationResult {
    fn from(repr: ClassificationResultRepr) -> Self {
        Self::new(
            repr.systems,
            repr.domains,
            repr.confidence,
            repr.classifier_source,
        )
    }
}

impl ClassificationResult {
    /// Build a result. Systems and domains are deduplicated keeping first
    /// occurrence; confidence is clamped to [0, 1] (NaN becomes 0).
    pub fn new(
        systems: Vec<String>,
        domains: Vec<String>,
        confidence: f64,
        classifier_source: ClassifierSource,
    ) -> Self {
        let systems = dedup_ordered(systems);
        let domains = dedup_ordered(domains);
        Self {
            pattern: ClassificationPattern::from_count(systems.len()),
            systems,
            domains,
            confidence: clamp_confidence(confidence),
            classifier_source,
        }
    }

    /// The "no classification" terminal state.
    pub fn unclassified() -> Self {
        Self::new(Vec::new(), Vec::new(), 0.0, ClassifierSource::KeywordFastPath)
    }

    pub fn systems(&self) -> &[String] {
        &self.systems
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn pattern(&self) -> ClassificationPattern {
        self.pattern
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn classifier_source(&self) -> ClassifierSource {
        self.classifier_source
    }

    pub fn is_classified(&self) -> bool {
        !self.systems.is_empty()
    }

    /// First system paired with first domain.
    pub fn primary(&self) -> Option<SystemDomain> {
        self.systems.first().map(|system| SystemDomain {
            system: system.clone(),
            domain: self.domains.first().cloned(),
        })
    }

    /// Same systems, domains and pattern; confidence and source are ignored.
    pub fn same_classification(&self, other: &Self) -> bool {
        self.systems == other.systems
            && self.domains == other.domains
            && self.pattern == other.pattern
    }

    /// Copy of this result as served by a pattern-cache hit.
    pub fn as_cache_hit(&self) -> Self {
        Self {
            confidence: CACHE_HIT_CONFIDENCE,
            classifier_source: ClassifierSource::PatternCache,
            ..self.clone()
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp_confidence(confidence);
        self
    }

    pub fn with_source(mut self, source: ClassifierSource) -> Self {
        self.classifier_source = source;
        self
    }
}

fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn dedup_ordered(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Advisory suggestion derived from the session transition table. The
/// orchestration layer decides whether to act on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedExpansion {
    pub system: String,
    pub domain: Option<String>,
    pub transition_confidence: f64,
    pub count: u64,
    pub rationale: String,
}

/// Everything `classify` hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationOutcome {
    pub result: ClassificationResult,
    pub suggested_expansions: Vec<SuggestedExpansion>,
    /// Session prior boost folded into the confidence (0 on cache hits).
    pub prior_boost: f64,
    /// Systems hit by the binary keyword pass.
    pub binary_matches: usize,
}
