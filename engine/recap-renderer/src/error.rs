//! Error types for LLM prose rewriting

use thiserror::Error;

/// Errors from the optional prose-rewriting layer.
///
/// The deterministic renderer itself is infallible; these only surface from
/// rewriter implementations, and callers fall back to the deterministic
/// text on any of them.
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Model returned an empty response")]
    EmptyResponse,
}
