//! # arbiter-engine
//!
//! Facade over the Arbiter crates. One [`ArbiterEngine`] serves many
//! sessions:
//!
//! - `classify` / `evaluate`: request → systems, domains, confidence, with
//!   the pattern cache in front and session signals behind.
//! - `append_constraint` / `resolve_constraints` / `archive_session`: the
//!   constraint pipeline.
//! - Cache maintenance and state diagnostics.
//!
//! Call [`tracing_setup::init_tracing`] once to get log output.

pub mod engine;
pub mod session;
pub mod tracing_setup;

pub use engine::ArbiterEngine;
pub use session::EngineSession;
