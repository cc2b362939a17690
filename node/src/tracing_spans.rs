//! [`tracing::Span`] constructors for node operations.
//!
//! Consistent span names and fields make a request's log lines easy to
//! correlate, including the ones emitted from the blocking pool.

use tracing::{info_span, Span};

/// Span covering one registration: extraction, mining and the commit.
pub fn register_span(key: &str) -> Span {
    info_span!("register", key = %key)
}

/// Span covering one verification request.
pub fn verify_span(key: &str) -> Span {
    info_span!("verify", key = %key)
}

/// Span covering a full ledger integrity walk.
pub fn ledger_check_span() -> Span {
    info_span!("ledger_check")
}
