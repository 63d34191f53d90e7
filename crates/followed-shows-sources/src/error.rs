use thiserror::Error;

/// How a failed call should be treated by a retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Likely to succeed if tried again (timeouts, 5xx, rate limiting)
    Transient,
    /// Certain to fail again (4xx, malformed payloads, missing credentials)
    Permanent,
}

/// Errors raised while talking to the remote list service
#[derive(Error, Debug)]
pub enum SourceError {
    /// Transport-level failure (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("{endpoint} returned {status}: {body}")]
    Http {
        status: u16,
        endpoint: String,
        body: String,
    },

    /// The service answered but the body could not be decoded
    #[error("Failed to parse response from {endpoint}: {message}")]
    Parse { endpoint: String, message: String },

    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SourceError {
    pub fn http(status: reqwest::StatusCode, endpoint: impl Into<String>, body: String) -> Self {
        SourceError::Http {
            status: status.as_u16(),
            endpoint: endpoint.into(),
            body,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            SourceError::Request(e) => {
                if e.is_builder() || e.is_decode() || e.is_redirect() {
                    FailureKind::Permanent
                } else if let Some(status) = e.status() {
                    classify_status(status.as_u16())
                } else {
                    FailureKind::Transient
                }
            }
            SourceError::Http { status, .. } => classify_status(*status),
            SourceError::Parse { .. }
            | SourceError::NotAuthenticated(_)
            | SourceError::Config(_) => FailureKind::Permanent,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind() == FailureKind::Transient
    }

    /// HTTP status when the failure came from a service response
    pub fn status(&self) -> Option<u16> {
        match self {
            SourceError::Http { status, .. } => Some(*status),
            SourceError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// 408 and 429 are the only client errors worth repeating
fn classify_status(status: u16) -> FailureKind {
    match status {
        408 | 429 | 500..=599 => FailureKind::Transient,
        _ => FailureKind::Permanent,
    }
}
