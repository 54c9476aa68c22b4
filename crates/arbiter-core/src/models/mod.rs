mod classification;
mod conflict;
mod constraint;
mod diagnostic;
mod resolution;
mod session;
mod transition;

pub use classification::{
    ClassificationOutcome, ClassificationPattern, ClassificationResult, ClassifierSource,
    SuggestedExpansion, SystemDomain, SystemScore,
};
pub use conflict::{ConflictRecord, ConflictTier, ConflictType, Resolution};
pub use constraint::{Constraint, ConstraintType, Priority, RawConstraint};
pub use diagnostic::{DiagnosticKind, StateDiagnostic};
pub use resolution::{ConstraintArchive, ResolutionReport, ResolutionSummary};
pub use session::{PatternCacheEntry, SessionHistoryEntry};
pub use transition::TransitionRecord;
