//! Span definitions per engine operation.

/// Span around one classification.
#[macro_export]
macro_rules! classify_span {
    ($session_id:expr) => {
        tracing::info_span!("arbiter.classify", session_id = %$session_id)
    };
}

/// Span around a detect-and-resolve run.
#[macro_export]
macro_rules! resolve_span {
    ($session_id:expr, $constraints:expr) => {
        tracing::info_span!("arbiter.resolve", session_id = %$session_id, constraints = $constraints)
    };
}

/// Span around archival of a session's constraint set.
#[macro_export]
macro_rules! archive_span {
    ($session_id:expr) => {
        tracing::info_span!("arbiter.archive", session_id = %$session_id)
    };
}
