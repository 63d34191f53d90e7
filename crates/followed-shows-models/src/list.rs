use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the list that holds the user's followed shows
pub const FOLLOWED_LIST_NAME: &str = "Following";

/// Identifier of a remote list, owned by the remote service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ListId(pub u64);

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ListId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListPrivacy {
    #[default]
    Private,
    Friends,
    Public,
    /// Visible to anyone holding the share link
    Link,
    /// Any privacy value this client does not know about
    #[serde(other)]
    Unknown,
}

impl ListPrivacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListPrivacy::Private => "private",
            ListPrivacy::Friends => "friends",
            ListPrivacy::Public => "public",
            ListPrivacy::Link => "link",
            ListPrivacy::Unknown => "unknown",
        }
    }
}

/// A named list as the remote service reports it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteList {
    pub id: ListId,
    pub name: String,
    pub privacy: ListPrivacy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub item_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RemoteList {
    pub fn new(id: ListId, name: impl Into<String>, privacy: ListPrivacy) -> Self {
        Self {
            id,
            name: name.into(),
            privacy,
            slug: None,
            description: None,
            item_count: 0,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_followed_list(&self) -> bool {
        self.name == FOLLOWED_LIST_NAME
    }
}
