use serde::{Deserialize, Serialize};

/// Cross-service identifiers for a show
///
/// Supplied by callers when following or unfollowing a show. Every field is
/// optional; whatever is present is sent to the remote service untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ShowRef {
    pub trakt_id: Option<u64>,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<u32>,
}

impl ShowRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trakt_id(mut self, trakt_id: u64) -> Self {
        self.trakt_id = Some(trakt_id);
        self
    }

    pub fn with_imdb_id(mut self, imdb_id: impl Into<String>) -> Self {
        self.imdb_id = Some(imdb_id.into());
        self
    }

    pub fn with_tmdb_id(mut self, tmdb_id: u32) -> Self {
        self.tmdb_id = Some(tmdb_id);
        self
    }

    /// Get the primary identifier (prefer trakt_id, fallback to others)
    ///
    /// Only used for log lines and human output.
    pub fn primary_id(&self) -> Option<String> {
        self.trakt_id
            .map(|id| format!("trakt:{}", id))
            .or_else(|| self.imdb_id.clone())
            .or_else(|| self.tmdb_id.map(|id| format!("tmdb:{}", id)))
    }

    /// Check if all ID fields are empty
    pub fn is_empty(&self) -> bool {
        self.trakt_id.is_none() && self.imdb_id.is_none() && self.tmdb_id.is_none()
    }
}
