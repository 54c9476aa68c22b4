//! Logging for embedders: `EnvFilter`-driven `tracing` subscriber and
//! per-operation spans.

pub mod setup;
pub mod spans;

pub use setup::{init_tracing, init_tracing_from_config, init_tracing_with_filter, LOG_ENV_VAR};
