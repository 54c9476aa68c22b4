//! Per-session engine state, held in the engine's session registry.

use std::sync::Arc;

use arbiter_constraints::ConstraintStore;
use arbiter_core::config::ArbiterConfig;
use arbiter_core::models::ResolutionReport;
use arbiter_core::traits::IStateStore;
use arbiter_session::SessionContext;

/// Everything the engine keeps for one session. Never shared across
/// sessions.
#[derive(Debug)]
pub struct EngineSession {
    pub context: SessionContext,
    pub constraints: ConstraintStore,
    /// Report from the most recent `resolve_constraints`, attached to the
    /// next archive.
    pub last_resolution: Option<ResolutionReport>,
}

impl EngineSession {
    /// Rebuild a session from persisted state. Missing state is a fresh
    /// session.
    pub fn load(session_id: &str, state: &Arc<dyn IStateStore>, config: &ArbiterConfig) -> Self {
        let context = SessionContext::restore(
            session_id,
            state.load_history(session_id),
            state.load_transitions(session_id),
            config.session.clone(),
        );
        let constraints = ConstraintStore::open(
            session_id,
            Arc::clone(state),
            config.constraints.archive_retention,
        );
        tracing::debug!(
            session_id,
            history = context.history().len(),
            constraints = constraints.len(),
            "loaded session"
        );
        Self {
            context,
            constraints,
            last_resolution: None,
        }
    }
}
