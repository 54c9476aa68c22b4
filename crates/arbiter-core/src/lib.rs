//! # arbiter-core
//!
//! Foundation crate for the Arbiter classification and constraint resolution
//! engine. Defines the shared models, errors, config, constants, and the
//! persisted-state trait. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::ArbiterConfig;
pub use errors::{ArbiterError, ArbiterResult};
pub use models::{
    ClassificationPattern, ClassificationResult, ClassifierSource, ConflictRecord, Constraint,
    ConstraintType, Priority,
};
pub use traits::{IContextSignals, IStateStore};
