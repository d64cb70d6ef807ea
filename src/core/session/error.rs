//! Error types for the session client.

use thiserror::Error;

/// Errors raised by session operations.
///
/// Transport failures and non-2xx responses are raised for state-changing
/// operations (start, send, end) so the caller can decide whether to retry.
/// Best-effort operations (`health_check`, `voices`) never surface these;
/// they degrade to status reports or empty results instead.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Transport-level failure: unreachable host, DNS, timeout, TLS.
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The server answered with a non-2xx status. The message is taken from
    /// the response body when one is present, else it is a generic status
    /// line.
    #[error("server returned HTTP {status}: {message}")]
    ApiError { status: u16, message: String },

    /// A send or end was attempted on a call with no active session. Raised
    /// locally, before any network traffic.
    #[error("no active session")]
    NoActiveSession,

    /// An open was attempted while a session is already active.
    #[error("a session is already active; end it first")]
    SessionActive,

    /// Client-side configuration problem (bad base URL, unbuildable client).
    #[error("invalid configuration: {0}")]
    ConfigurationError(String),
}

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
