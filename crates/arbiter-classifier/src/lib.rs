//! # arbiter-classifier
//!
//! Two-pass keyword classification of free-text requests into systems and
//! domains.
//!
//! 1. **Binary pass**: per-system word-boundary alternation; domains are
//!    detected for every matched system.
//! 2. **Weighted pass**: cross-keyword groups contribute weighted scores to
//!    several systems at once. Runs unless pass 1 found exactly one system.
//!
//! Confidence comes from a pure calibrator; session signals enter through
//! [`arbiter_core::traits::IContextSignals`].

pub mod calibrator;
pub mod corpus;
pub mod cross_scorer;
pub mod engine;
pub mod matcher;

pub use calibrator::{calibrate, CalibrationInput};
pub use corpus::KeywordCorpus;
pub use cross_scorer::CrossScores;
pub use engine::{ClassificationTrace, Classifier};
pub use matcher::BinaryMatcher;
