//! # arbiter-session
//!
//! Per-session memory of past classifications and the process-wide pattern
//! cache.
//!
//! - **History**: bounded, time-ordered log; trimmed to the most recent 80%
//!   when full.
//! - **Boost**: decayed overlap between the current systems and recent
//!   history, capped at 0.10.
//! - **Transitions**: `(from, to)` frequency table behind suggested
//!   expansions.
//! - **Pattern cache**: normalized-signature memo promoted after repeated
//!   identical classifications.

pub mod boost;
pub mod context;
pub mod history;
pub mod pattern_cache;
pub mod signature;
pub mod transitions;

pub use context::{ContextSignals, RecordOutcome, SessionContext};
pub use history::SessionHistory;
pub use pattern_cache::{PatternCache, PromotionOutcome};
pub use signature::signature;
pub use transitions::TransitionTable;
