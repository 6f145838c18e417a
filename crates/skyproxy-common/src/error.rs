//! Error types for session handling.

use thiserror::Error;

/// Errors raised while validating a caller-supplied session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The session carries no usable access token.
    #[error("Session access token is empty")]
    EmptyAccessToken,

    /// The session could not be decoded into the expected shape.
    #[error("Malformed session: {0}")]
    Malformed(String),
}
