//! # arbiter-constraints
//!
//! Declarative constraints contributed by analysis stages, and the pipeline
//! that finds and settles conflicts between them.
//!
//! 1. [`ConstraintStore`] accumulates validated constraints per session.
//! 2. [`ConflictDetector`] runs the structural and semantic tiers pairwise.
//! 3. [`resolution::resolve`] applies hard-over-soft and reports the rest.

pub mod detection;
pub mod resolution;
pub mod store;

pub use detection::{conflict_id, ConflictDetector, SemanticRule, SemanticRuleSet};
pub use resolution::resolve;
pub use store::ConstraintStore;

use arbiter_core::models::{Constraint, ResolutionReport};
use chrono::Utc;

/// Detect and resolve conflicts in one pass.
pub fn detect_and_resolve(detector: &ConflictDetector, constraints: &[Constraint]) -> ResolutionReport {
    resolve(constraints, detector.detect(constraints), Utc::now())
}
