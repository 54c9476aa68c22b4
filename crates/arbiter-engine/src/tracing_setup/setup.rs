//! Tracing initialization.

use std::sync::Once;

use arbiter_core::config::defaults::DEFAULT_LOG_FILTER;
use arbiter_core::config::ObservabilityConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding per-crate log levels, e.g.
/// `ARBITER_LOG=arbiter_session=debug,arbiter_storage=warn`.
pub const LOG_ENV_VAR: &str = "ARBITER_LOG";

static INIT: Once = Once::new();

/// Install the global subscriber from `ARBITER_LOG`, falling back to
/// `arbiter=info`. Idempotent.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    install(filter, false);
}

/// Install with an explicit filter directive, ignoring the environment.
pub fn init_tracing_with_filter(directives: &str) {
    install(EnvFilter::new(directives), false);
}

/// `ARBITER_LOG` still wins over the configured filter when set.
pub fn init_tracing_from_config(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    install(filter, config.json_logs);
}

fn install(filter: EnvFilter, json: bool) {
    INIT.call_once(|| {
        let text = (!json).then(|| {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
        });
        let json = json.then(|| fmt::layer().json().with_target(true).with_current_span(true));

        // An embedder may already own the global subscriber.
        if let Err(error) = tracing_subscriber::registry()
            .with(text)
            .with(json)
            .with(filter)
            .try_init()
        {
            tracing::debug!(%error, "global subscriber already set, keeping it");
        }
    });
}
