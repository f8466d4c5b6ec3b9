//! Error types for completion provider clients.

use thiserror::Error;

/// Broad classification of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    /// Missing or rejected credentials.
    Auth,
    /// The request itself was malformed or referenced an unknown model.
    InvalidRequest,
    /// Provider-side rate limiting.
    RateLimited,
    /// Provider-side failure.
    Upstream,
    /// Transport-level failure before a status was received.
    Transport,
    /// The response body did not match the expected shape.
    Malformed,
}

/// Error raised by a completion provider client.
#[derive(Debug, Error)]
pub enum LlmError {
    /// A required credential variable was unset at construction time.
    #[error("missing required environment variable {0}")]
    MissingCredentials(&'static str),

    /// Non-success HTTP status from the provider.
    #[error("completion provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a status (DNS, TLS, connect, timeout).
    #[error("completion provider transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("malformed completion provider response: {0}")]
    Malformed(String),
}

impl LlmError {
    /// Classification of this error, independent of its payload.
    pub fn kind(&self) -> LlmErrorKind {
        match self {
            LlmError::MissingCredentials(_) => LlmErrorKind::Auth,
            LlmError::Http { status, .. } => classify_http_status(*status),
            LlmError::Transport(_) => LlmErrorKind::Transport,
            LlmError::Malformed(_) => LlmErrorKind::Malformed,
        }
    }
}

/// Map an HTTP status code from the provider to an error kind.
pub fn classify_http_status(status: u16) -> LlmErrorKind {
    match status {
        401 | 403 => LlmErrorKind::Auth,
        429 => LlmErrorKind::RateLimited,
        s if s >= 500 => LlmErrorKind::Upstream,
        _ => LlmErrorKind::InvalidRequest,
    }
}
