//! SessionContext — history and transitions of one session, plus the signals
//! it feeds into classification.

use arbiter_core::config::SessionConfig;
use arbiter_core::models::{
    ClassificationResult, SessionHistoryEntry, SuggestedExpansion, SystemDomain, TransitionRecord,
};
use arbiter_core::traits::IContextSignals;
use chrono::{DateTime, Utc};

use crate::boost::{compute_prior_boost, system_affinity};
use crate::history::SessionHistory;
use crate::transitions::TransitionTable;

/// What recording a classification changed.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcome {
    pub history_trimmed: bool,
    /// `(from, to)` pair counted in the transition table, if any.
    pub transition: Option<(SystemDomain, SystemDomain)>,
}

/// Per-session classification memory.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    history: SessionHistory,
    transitions: TransitionTable,
    config: SessionConfig,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>, config: SessionConfig) -> Self {
        Self {
            session_id: session_id.into(),
            history: SessionHistory::new(&config),
            transitions: TransitionTable::new(),
            config,
        }
    }

    /// Rebuild from persisted state.
    pub fn restore(
        session_id: impl Into<String>,
        history: Vec<SessionHistoryEntry>,
        transitions: Vec<TransitionRecord>,
        config: SessionConfig,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            history: SessionHistory::from_entries(history, &config),
            transitions: TransitionTable::from_records(transitions),
            config,
        }
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Signals for classifying a request at `now`: the recent window of
    /// history, most recent first.
    pub fn signals_at(&self, now: DateTime<Utc>) -> ContextSignals {
        let recent = self
            .history
            .read_recent_at(now, self.config.recent_limit, self.config.recent_window_minutes)
            .into_iter()
            .cloned()
            .collect();
        ContextSignals {
            recent,
            config: self.config.clone(),
        }
    }

    /// Append a completed classification and count the transition from the
    /// previous request, if its primary pair differs.
    pub fn record_at(
        &mut self,
        signature: &str,
        result: &ClassificationResult,
        now: DateTime<Utc>,
    ) -> RecordOutcome {
        let prev_signature = self.history.last().map(|e| e.signature.clone());
        let transition = match (&prev_signature, result.primary()) {
            (Some(prev), Some(current)) => {
                self.transitions
                    .record_transition(&self.history, prev, &current, now)
            }
            _ => None,
        };
        if let Some((from, to)) = &transition {
            tracing::debug!(session_id = %self.session_id, %from, %to, "recorded transition");
        }
        let history_trimmed = self.history.append(SessionHistoryEntry {
            signature: signature.to_string(),
            result: result.clone(),
            timestamp: now,
            prev_signature,
        });
        RecordOutcome {
            history_trimmed,
            transition,
        }
    }

    /// Advisory expansions for `result`'s primary pair.
    pub fn suggest_expansions(&self, result: &ClassificationResult) -> Vec<SuggestedExpansion> {
        let Some(primary) = result.primary() else {
            return Vec::new();
        };
        self.transitions.lookup_transitions(
            &primary.system,
            primary.domain.as_deref(),
            self.config.min_transition_confidence,
        )
    }
}

/// Owned snapshot of the recent window, consulted by the classifier.
#[derive(Debug, Clone)]
pub struct ContextSignals {
    recent: Vec<SessionHistoryEntry>,
    config: SessionConfig,
}

impl ContextSignals {
    pub fn recent(&self) -> &[SessionHistoryEntry] {
        &self.recent
    }
}

impl IContextSignals for ContextSignals {
    fn prior_boost(&self, current_systems: &[String], total_binary_matches: usize) -> f64 {
        compute_prior_boost(current_systems, total_binary_matches, &self.recent, &self.config)
    }

    fn system_affinity(&self, system_id: &str) -> f64 {
        system_affinity(system_id, &self.recent, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_core::models::ClassifierSource;
    use chrono::Duration;

    fn result(system: &str, domain: Option<&str>) -> ClassificationResult {
        ClassificationResult::new(
            vec![system.into()],
            domain.map(|d| vec![d.to_string()]).unwrap_or_default(),
            0.85,
            ClassifierSource::KeywordFastPath,
        )
    }

    #[test]
    fn record_links_previous_signature() {
        let mut ctx = SessionContext::new("s", SessionConfig::default());
        let now = Utc::now();
        ctx.record_at("a", &result("storage", Some("indexing")), now);
        ctx.record_at("b", &result("caching", None), now);
        let last = ctx.history().last().unwrap();
        assert_eq!(last.prev_signature.as_deref(), Some("a"));
    }

    #[test]
    fn differing_primary_pairs_count_a_transition() {
        let mut ctx = SessionContext::new("s", SessionConfig::default());
        let now = Utc::now();
        ctx.record_at("a", &result("storage", Some("indexing")), now);
        let outcome = ctx.record_at("b", &result("caching", None), now);
        let (from, to) = outcome.transition.unwrap();
        assert_eq!(from.to_string(), "storage/indexing");
        assert_eq!(to.to_string(), "caching");

        let same = ctx.record_at("c", &result("caching", None), now);
        assert!(same.transition.is_none());
        assert_eq!(ctx.transitions().records().len(), 1);
    }

    #[test]
    fn unclassified_requests_do_not_transition() {
        let mut ctx = SessionContext::new("s", SessionConfig::default());
        let now = Utc::now();
        ctx.record_at("a", &result("storage", None), now);
        let outcome = ctx.record_at("b", &ClassificationResult::unclassified(), now);
        assert!(outcome.transition.is_none());
        let outcome = ctx.record_at("c", &result("caching", None), now);
        assert!(outcome.transition.is_none());
    }

    #[test]
    fn suggestions_come_from_sources_into_primary() {
        let mut ctx = SessionContext::new("s", SessionConfig::default());
        let now = Utc::now();
        ctx.record_at("a", &result("storage", Some("indexing")), now);
        ctx.record_at("b", &result("caching", Some("eviction")), now);

        let suggestions = ctx.suggest_expansions(&result("caching", Some("eviction")));
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].system, "storage");
        assert_eq!(suggestions[0].domain.as_deref(), Some("indexing"));
        assert_eq!(suggestions[0].transition_confidence, 1.0);
        assert!(ctx.suggest_expansions(&ClassificationResult::unclassified()).is_empty());
    }

    #[test]
    fn signals_only_see_the_recent_window() {
        let mut ctx = SessionContext::new("s", SessionConfig::default());
        let now = Utc::now();
        ctx.record_at("old", &result("storage", None), now - Duration::hours(2));
        let signals = ctx.signals_at(now);
        assert!(signals.recent().is_empty());
        assert_eq!(signals.prior_boost(&["storage".to_string()], 1), 0.0);

        ctx.record_at("new", &result("storage", None), now);
        let signals = ctx.signals_at(now);
        assert!((signals.prior_boost(&["storage".to_string()], 1) - 0.05).abs() < 1e-12);
        assert_eq!(signals.system_affinity("storage"), 1.0);
    }

    #[test]
    fn restore_keeps_history_and_transitions() {
        let mut ctx = SessionContext::new("s", SessionConfig::default());
        let now = Utc::now();
        ctx.record_at("a", &result("storage", None), now);
        ctx.record_at("b", &result("caching", None), now);
        let restored = SessionContext::restore(
            "s",
            ctx.history().entries().to_vec(),
            ctx.transitions().records().to_vec(),
            SessionConfig::default(),
        );
        assert_eq!(restored.history().len(), 2);
        assert_eq!(restored.transitions().records().len(), 1);
    }
}
