use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty submission, rejected before anything is sent upstream.
    InvalidInput,
    /// Missing credential or a provider that cannot serve the task.
    ConfigError,
    /// The upstream host could not be reached.
    NetworkError,
    /// The upstream answered with a status other than 200.
    UpstreamError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "Invalid input"),
            Self::ConfigError => write!(f, "Configuration error"),
            Self::NetworkError => write!(f, "Network error"),
            Self::UpstreamError => write!(f, "Upstream error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {detail}")]
pub struct GatewayError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl GatewayError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn invalid_input(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, detail)
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigError, detail)
    }

    pub fn network(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkError, detail)
    }

    /// Status code and body are kept verbatim, e.g. `429 - {"error":"rate limited"}`.
    pub fn upstream(status: u16, body: &str) -> Self {
        Self::new(ErrorKind::UpstreamError, format!("{status} - {body}"))
    }
}

/// The only value callers ever consume: the answer text or a classified error.
pub type GatewayResult = Result<String, GatewayError>;
