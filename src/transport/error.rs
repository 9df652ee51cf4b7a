//! Transport error types

use thiserror::Error;

/// Transport error with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Status(code), message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Decode, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Other, message)
    }

    /// Classify a reqwest send/read failure
    pub fn from_reqwest(context: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(format!("{context}: request timed out: {err}"))
        } else if err.is_connect() {
            Self::connect(format!("{context}: connection failed: {err}"))
        } else if err.is_decode() {
            Self::decode(format!("{context}: {err}"))
        } else {
            Self::other(format!("{context}: {err}"))
        }
    }
}

/// Failure classification. The conversation core treats every kind the same;
/// the distinction is for logs and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Request exceeded the client timeout
    Timeout,
    /// Could not reach the backend
    Connect,
    /// Backend answered with a non-2xx status
    Status(u16),
    /// Body was not the JSON we expected
    Decode,
    Other,
}

impl TransportErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Status(_) => "status",
            Self::Decode => "decode",
            Self::Other => "other",
        }
    }
}
