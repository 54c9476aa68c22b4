//! The facade an orchestration layer calls.
//!
//! Sessions are isolated: each owns its history, transition table and
//! constraint store. The pattern cache is shared by every session.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arbiter_classifier::{Classifier, KeywordCorpus};
use arbiter_constraints::{resolve, ConflictDetector, SemanticRuleSet};
use arbiter_core::config::ArbiterConfig;
use arbiter_core::constants::VERSION;
use arbiter_core::errors::{ArbiterError, ArbiterResult, StorageError};
use arbiter_core::models::{
    ClassificationOutcome, Constraint, ConstraintArchive, DiagnosticKind, RawConstraint,
    ResolutionReport, StateDiagnostic,
};
use arbiter_core::traits::IStateStore;
use arbiter_session::{signature, PatternCache, SessionContext};
use arbiter_storage::recovery::DiagnosticLog;
use arbiter_storage::{FileStateStore, InMemoryStateStore};
use chrono::Utc;
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;

use crate::session::EngineSession;

/// Classification and constraint-resolution engine. `Send + Sync`; share it
/// behind an `Arc`.
pub struct ArbiterEngine {
    config: ArbiterConfig,
    state: Arc<dyn IStateStore>,
    classifier: Classifier,
    detector: ConflictDetector,
    cache: PatternCache,
    sessions: DashMap<String, EngineSession>,
    diagnostics: DiagnosticLog,
}

impl std::fmt::Debug for ArbiterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArbiterEngine")
            .field("corpus_version", &self.classifier.corpus().version())
            .field("semantic_rules", &self.detector.rules().len())
            .field("cached_patterns", &self.cache.len())
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

impl ArbiterEngine {
    /// Engine persisting under `state_dir`.
    pub fn open(state_dir: impl Into<PathBuf>, config: ArbiterConfig) -> ArbiterResult<Self> {
        let store = FileStateStore::open(state_dir)?;
        Self::with_store(Arc::new(store), config)
    }

    /// Engine whose state lives only as long as the process.
    pub fn in_memory(config: ArbiterConfig) -> ArbiterResult<Self> {
        Self::with_store(Arc::new(InMemoryStateStore::new()), config)
    }

    /// Engine over any state store. Validates `config`, loads the corpus and
    /// semantic rules, and restores the pattern cache.
    pub fn with_store(state: Arc<dyn IStateStore>, config: ArbiterConfig) -> ArbiterResult<Self> {
        config.validate()?;

        let corpus = match &config.corpus_path {
            Some(path) => Arc::new(KeywordCorpus::load(Path::new(path))?),
            None => KeywordCorpus::builtin()?,
        };
        let rules = match &config.constraints.semantic_rules_path {
            Some(path) => Arc::new(SemanticRuleSet::load(Path::new(path))?),
            None => SemanticRuleSet::builtin()?,
        };
        let classifier = Classifier::new(corpus, config.calibration.clone())
            .with_context_reweight(config.session.context_reweight);
        let cache = PatternCache::from_entries(
            state.load_pattern_cache(),
            config.cache.promotion_threshold,
        );

        let engine = Self {
            classifier,
            detector: ConflictDetector::new(rules),
            cache,
            sessions: DashMap::new(),
            diagnostics: DiagnosticLog::new(),
            state,
            config,
        };
        if engine.config.cache.evict_on_open
            && engine.cache.evict(engine.config.cache.retention_days) > 0
        {
            engine.persist_cache();
        }
        tracing::info!(
            version = VERSION,
            corpus = %engine.classifier.corpus().version(),
            semantic_rules = engine.detector.rules().len(),
            cached_patterns = engine.cache.len(),
            "arbiter engine ready"
        );
        Ok(engine)
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn pattern_cache(&self) -> &PatternCache {
        &self.cache
    }

    // ── Classification ───────────────────────────────────────────────────

    /// Classify `request` in `session_id`, record it in the session history,
    /// count the transition from the previous request and promote the
    /// signature once it repeats often enough. Persistence failures are
    /// logged and kept as diagnostics; the classification is still returned.
    pub fn classify(&self, session_id: &str, request: &str) -> ClassificationOutcome {
        let span = crate::classify_span!(session_id);
        let _enter = span.enter();
        let now = Utc::now();
        let signature = signature(request);
        let mut session = self.session_mut(session_id);

        let hit = self.cache.lookup_at(&signature, now);
        let served_from_cache = hit.is_some();
        let (result, prior_boost, binary_matches) = match hit {
            Some(result) => (result, 0.0, 0),
            None => {
                let trace = self
                    .classifier
                    .classify(request, &session.context.signals_at(now));
                (trace.result, trace.prior_boost, trace.binary_matches.len())
            }
        };

        session.context.record_at(&signature, &result, now);
        let promotion = self
            .cache
            .promote_at(&signature, &result, session.context.history(), now);
        let suggested_expansions = session.context.suggest_expansions(&result);
        self.persist_context(session_id, &session.context);
        drop(session);

        if served_from_cache || promotion.changed() {
            self.persist_cache();
        }
        tracing::debug!(
            signature = %signature,
            pattern = %result.pattern(),
            confidence = result.confidence(),
            source = %result.classifier_source(),
            served_from_cache,
            suggestions = suggested_expansions.len(),
            "classification complete"
        );

        ClassificationOutcome {
            result,
            suggested_expansions,
            prior_boost,
            binary_matches,
        }
    }

    /// Same pipeline as [`classify`](Self::classify) without side effects:
    /// nothing is recorded, promoted or persisted, and cache usage is not
    /// bumped.
    pub fn evaluate(&self, session_id: &str, request: &str) -> ClassificationOutcome {
        let now = Utc::now();
        let signature = signature(request);
        let cached = self.cache.peek(&signature).map(|r| r.as_cache_hit());

        self.with_context(session_id, |context| match cached {
            Some(result) => ClassificationOutcome {
                suggested_expansions: context.suggest_expansions(&result),
                result,
                prior_boost: 0.0,
                binary_matches: 0,
            },
            None => {
                let trace = self.classifier.classify(request, &context.signals_at(now));
                ClassificationOutcome {
                    suggested_expansions: context.suggest_expansions(&trace.result),
                    prior_boost: trace.prior_boost,
                    binary_matches: trace.binary_matches.len(),
                    result: trace.result,
                }
            }
        })
    }

    // ── Constraints ──────────────────────────────────────────────────────

    /// Validate and append; persisted before returning.
    pub fn append_constraint(&self, session_id: &str, constraint: Constraint) -> ArbiterResult<()> {
        self.session_mut(session_id).constraints.append(constraint)
    }

    pub fn append_raw_constraint(&self, session_id: &str, raw: RawConstraint) -> ArbiterResult<()> {
        self.session_mut(session_id).constraints.append_raw(raw)
    }

    /// The session's active constraints in declaration order.
    pub fn constraints(&self, session_id: &str) -> Vec<Constraint> {
        self.session_mut(session_id).constraints.snapshot()
    }

    /// Detect conflicts over the current constraint set and resolve them.
    /// Unresolved conflicts are part of the report, never an error.
    pub fn resolve_constraints(&self, session_id: &str) -> ArbiterResult<ResolutionReport> {
        let mut session = self.session_mut(session_id);
        let span = crate::resolve_span!(session_id, session.constraints.len());
        let _enter = span.enter();

        let constraints = session.constraints.snapshot();
        let report = resolve(&constraints, self.detector.detect(&constraints), Utc::now());
        session.last_resolution = Some(report.clone());
        Ok(report)
    }

    /// Archive the active constraint set and start the session over with an
    /// empty one. The latest resolution report is attached when it covers
    /// exactly the archived set.
    pub fn archive_session(&self, session_id: &str) -> ArbiterResult<Option<ConstraintArchive>> {
        let span = crate::archive_span!(session_id);
        let _enter = span.enter();
        let mut session = self.session_mut(session_id);

        let declared = session.constraints.len();
        let resolution = session
            .last_resolution
            .take()
            .filter(|r| r.metadata.total_declared == declared);
        match session.constraints.archive_and_reset(resolution.clone()) {
            Ok(archive) => Ok(archive),
            Err(e) => {
                session.last_resolution = resolution;
                Err(e)
            }
        }
    }

    /// Archived constraint sets for `session_id`, oldest first.
    pub fn archives(&self, session_id: &str) -> Vec<ConstraintArchive> {
        self.state.list_archives(session_id)
    }

    // ── Cache maintenance ────────────────────────────────────────────────

    /// Drop cache entries unused for more than `max_age_days`.
    pub fn evict_cache(&self, max_age_days: i64) -> usize {
        let evicted = self.cache.evict(max_age_days);
        if evicted > 0 {
            self.persist_cache();
        }
        evicted
    }

    pub fn clear_cache(&self) -> usize {
        let cleared = self.cache.clear();
        self.persist_cache();
        tracing::info!(cleared, "pattern cache cleared");
        cleared
    }

    // ── Sessions & diagnostics ───────────────────────────────────────────

    /// Recovered state problems and failed writes since the last call.
    pub fn diagnostics(&self) -> Vec<StateDiagnostic> {
        let mut all = self.state.drain_diagnostics();
        all.extend(self.diagnostics.drain());
        all.sort_by_key(|d| d.observed_at);
        all
    }

    /// Sessions currently held in memory, sorted.
    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.iter().map(|r| r.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Release a session's in-memory state. Its persisted state is kept and
    /// reloaded on next use.
    pub fn close_session(&self, session_id: &str) -> ArbiterResult<()> {
        if self.sessions.remove(session_id).is_none() {
            return Err(ArbiterError::SessionNotFound(session_id.to_string()));
        }
        tracing::debug!(session_id, "closed session");
        Ok(())
    }

    fn session_mut(&self, session_id: &str) -> RefMut<'_, String, EngineSession> {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| EngineSession::load(session_id, &self.state, &self.config))
    }

    /// Run `f` against the session's context without registering the
    /// session.
    fn with_context<T>(&self, session_id: &str, f: impl FnOnce(&SessionContext) -> T) -> T {
        if let Some(session) = self.sessions.get(session_id) {
            return f(&session.context);
        }
        let context = SessionContext::restore(
            session_id,
            self.state.load_history(session_id),
            self.state.load_transitions(session_id),
            self.config.session.clone(),
        );
        f(&context)
    }

    // ── Persistence ──────────────────────────────────────────────────────

    fn persist_context(&self, session_id: &str, context: &SessionContext) {
        if let Err(e) = self.state.save_history(session_id, context.history().entries()) {
            self.record_write_failure(e);
        }
        if let Err(e) = self
            .state
            .save_transitions(session_id, context.transitions().records())
        {
            self.record_write_failure(e);
        }
    }

    fn persist_cache(&self) {
        if let Err(e) = self.state.save_pattern_cache(&self.cache.snapshot()) {
            self.record_write_failure(e);
        }
    }

    fn record_write_failure(&self, error: StorageError) {
        tracing::warn!(path = error.path(), error = %error, "state write failed, in-memory state is still current");
        self.diagnostics.record(StateDiagnostic::new(
            DiagnosticKind::WriteFailed,
            error.path(),
            error.to_string(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_core::models::{ClassifierSource, ConstraintType, Priority};

    fn engine() -> ArbiterEngine {
        ArbiterEngine::in_memory(ArbiterConfig::default()).unwrap()
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore(InMemoryStateStore);

    fn refuse(path: &str) -> Result<(), StorageError> {
        Err(StorageError::Io {
            path: path.to_string(),
            message: "read-only file system".to_string(),
        })
    }

    impl IStateStore for ReadOnlyStore {
        fn load_history(&self, s: &str) -> Vec<arbiter_core::models::SessionHistoryEntry> {
            self.0.load_history(s)
        }
        fn save_history(&self, s: &str, _: &[arbiter_core::models::SessionHistoryEntry]) -> Result<(), StorageError> {
            refuse(&format!("sessions/{s}/history.json"))
        }
        fn load_transitions(&self, s: &str) -> Vec<arbiter_core::models::TransitionRecord> {
            self.0.load_transitions(s)
        }
        fn save_transitions(&self, s: &str, _: &[arbiter_core::models::TransitionRecord]) -> Result<(), StorageError> {
            refuse(&format!("sessions/{s}/transitions.json"))
        }
        fn load_pattern_cache(&self) -> Vec<arbiter_core::models::PatternCacheEntry> {
            self.0.load_pattern_cache()
        }
        fn save_pattern_cache(&self, _: &[arbiter_core::models::PatternCacheEntry]) -> Result<(), StorageError> {
            refuse("pattern_cache.json")
        }
        fn load_constraints(&self, s: &str) -> Vec<Constraint> {
            self.0.load_constraints(s)
        }
        fn save_constraints(&self, s: &str, _: &[Constraint]) -> Result<(), StorageError> {
            refuse(&format!("sessions/{s}/constraints.json"))
        }
        fn save_archive(&self, a: &ConstraintArchive, _: usize) -> Result<(), StorageError> {
            refuse(&format!("sessions/{}/archive", a.session_id))
        }
        fn list_archives(&self, s: &str) -> Vec<ConstraintArchive> {
            self.0.list_archives(s)
        }
        fn drain_diagnostics(&self) -> Vec<StateDiagnostic> {
            self.0.drain_diagnostics()
        }
    }

    #[test]
    fn write_failures_become_diagnostics() {
        let engine = ArbiterEngine::with_store(
            Arc::new(ReadOnlyStore(InMemoryStateStore::new())),
            ArbiterConfig::default(),
        )
        .unwrap();
        let outcome = engine.classify("s", "design a composite index for range queries");
        assert_eq!(outcome.result.confidence(), 0.85);

        let diagnostics = engine.diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.kind == DiagnosticKind::WriteFailed));
        assert!(engine.diagnostics().is_empty());
    }

    #[test]
    fn constraint_write_failure_propagates() {
        let engine = ArbiterEngine::with_store(
            Arc::new(ReadOnlyStore(InMemoryStateStore::new())),
            ArbiterConfig::default(),
        )
        .unwrap();
        let c = Constraint::new("a", "review", ConstraintType::Requires, "t", "v", Priority::Hard);
        assert!(matches!(
            engine.append_constraint("s", c),
            Err(ArbiterError::Storage(_))
        ));
        assert!(engine.constraints("s").is_empty());
    }

    #[test]
    fn cache_hit_reports_no_boost() {
        let engine = engine();
        for _ in 0..3 {
            engine.classify("s", "design a composite index for range queries");
        }
        let hit = engine.classify("s", "design a composite index for range queries");
        assert_eq!(hit.result.classifier_source(), ClassifierSource::PatternCache);
        assert_eq!(hit.prior_boost, 0.0);
        assert_eq!(hit.binary_matches, 0);
    }

    #[test]
    fn archive_attaches_matching_resolution_only() {
        let engine = engine();
        let c = |id: &str| Constraint::new(id, "review", ConstraintType::Requires, "t", id, Priority::Soft);
        engine.append_constraint("s", c("a")).unwrap();
        engine.resolve_constraints("s").unwrap();
        let archive = engine.archive_session("s").unwrap().unwrap();
        assert!(archive.resolution.is_some());

        engine.append_constraint("s", c("b")).unwrap();
        engine.resolve_constraints("s").unwrap();
        engine.append_constraint("s", c("c")).unwrap();
        let archive = engine.archive_session("s").unwrap().unwrap();
        assert!(archive.resolution.is_none());
        assert_eq!(archive.constraints.len(), 2);
    }

    #[test]
    fn close_unknown_session_is_an_error() {
        let engine = engine();
        assert!(matches!(
            engine.close_session("nope"),
            Err(ArbiterError::SessionNotFound(_))
        ));
        engine.classify("s", "lru eviction");
        assert!(engine.close_session("s").is_ok());
        assert!(engine.session_ids().is_empty());
    }
}
