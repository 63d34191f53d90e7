use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tracking metadata for one show on the followed list
///
/// Rebuilt from the remote list on every fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FollowedEntry {
    /// Remote id of the list item (not the show)
    pub list_entry_id: Option<u64>,
    pub followed_at: Option<DateTime<Utc>>,
}
