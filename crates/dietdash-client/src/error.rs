//! Error types for the `DietDash` API client.
//!
//! A tagged union discriminated at the transport boundary: an HTTP error
//! response, no response at all, and a failure to build the request are
//! three different things, and transport success with an undecodable
//! payload is a fourth. No variant is ever retried; every error is terminal
//! for the call that produced it.

use dietdash_core::error::CryptoError;

/// All errors that can occur on an API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Invalid client configuration.
    #[error("api config error: {0}")]
    Config(String),

    /// The server responded with an error status. `message` is the
    /// decrypted error body when it was a valid envelope, the raw body
    /// text otherwise.
    #[error("http error {status}: {message}")]
    Http { status: u16, message: String },

    /// No response from server.
    #[error("no response from server")]
    Network(#[source] reqwest::Error),

    /// The fixed per-request timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// The request could not be constructed.
    #[error("request error: {0}")]
    Request(String),

    /// Transport succeeded but the response payload failed to open or
    /// parse. Kept apart from [`ApiError::Http`] so callers can tell a
    /// broken envelope from an application error.
    #[error("response payload error: {0}")]
    Decode(#[from] CryptoError),
}

impl ApiError {
    /// HTTP status code, when the server responded at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is an authentication failure (401 or 403).
    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}
