use followed_shows_sources::SourceError;
use thiserror::Error;

use crate::retry::RetryError;

/// Failure of a followed-list operation, carrying the original cause
#[derive(Error, Debug)]
pub enum FollowedError {
    /// The list service could not be constructed (missing token, bad config)
    #[error("List service is unavailable: {0}")]
    ServiceUnavailable(#[source] SourceError),

    #[error("Failed to {operation}: {source}")]
    Permanent {
        operation: &'static str,
        #[source]
        source: SourceError,
    },

    #[error("Failed to {operation} after {attempts} attempts: {source}")]
    Exhausted {
        operation: &'static str,
        attempts: u32,
        #[source]
        source: SourceError,
    },
}

impl FollowedError {
    pub(crate) fn from_retry(operation: &'static str, err: RetryError<SourceError>) -> Self {
        match err {
            RetryError::Permanent(source) => FollowedError::Permanent { operation, source },
            RetryError::Exhausted { attempts, last } => FollowedError::Exhausted {
                operation,
                attempts,
                source: last,
            },
        }
    }

    /// The underlying service error
    pub fn source_error(&self) -> &SourceError {
        match self {
            FollowedError::ServiceUnavailable(source) => source,
            FollowedError::Permanent { source, .. } => source,
            FollowedError::Exhausted { source, .. } => source,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, FollowedError::Exhausted { .. })
    }
}
