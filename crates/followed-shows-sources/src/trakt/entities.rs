use chrono::{DateTime, Utc};
use followed_shows_models::{ListId, ListPrivacy, RemoteList, ShowRef};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Whose lists a request targets
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UserSlug {
    /// The owner of the access token
    #[default]
    Me,
    Named(String),
}

impl UserSlug {
    pub fn from_config(user: Option<&str>) -> Self {
        match user.map(str::trim) {
            Some(name) if !name.is_empty() && name != "me" => UserSlug::Named(name.to_string()),
            _ => UserSlug::Me,
        }
    }

    /// Path segment for this user, URL-encoded
    pub fn as_path(&self) -> Cow<'_, str> {
        match self {
            UserSlug::Me => Cow::Borrowed("me"),
            UserSlug::Named(name) => urlencoding::encode(name),
        }
    }
}

/// Extended projection requested for list items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extended {
    NoSeasons,
}

impl Extended {
    pub fn as_str(&self) -> &'static str {
        match self {
            Extended::NoSeasons => "noseasons",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListIds {
    pub trakt: u64,
    #[serde(default)]
    pub slug: Option<String>,
}

/// List as returned by `/users/{id}/lists`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraktList {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub privacy: Option<ListPrivacy>,
    #[serde(default)]
    pub item_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub ids: ListIds,
}

impl From<TraktList> for RemoteList {
    fn from(list: TraktList) -> Self {
        RemoteList {
            id: ListId(list.ids.trakt),
            name: list.name,
            // Trakt omits privacy on some older lists; those are private
            privacy: list.privacy.unwrap_or_default(),
            slug: list.ids.slug,
            description: list.description,
            item_count: list.item_count.unwrap_or(0),
            created_at: list.created_at,
            updated_at: list.updated_at,
        }
    }
}

/// Body of a create-list request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewList {
    pub name: String,
    pub privacy: ListPrivacy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewList {
    pub fn new(name: impl Into<String>, privacy: ListPrivacy) -> Self {
        Self {
            name: name.into(),
            privacy,
            description: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShowIds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trakt: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tvdb: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl From<&ShowRef> for ShowIds {
    fn from(show: &ShowRef) -> Self {
        ShowIds {
            trakt: show.trakt_id,
            imdb: show.imdb_id.clone(),
            tmdb: show.tmdb_id,
            tvdb: None,
            slug: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TraktShow {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub ids: ShowIds,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub certification: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub first_aired: Option<DateTime<Utc>>,
}

/// One item of a user list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListEntry {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub listed_at: Option<DateTime<Utc>>,
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub show: Option<TraktShow>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncShow {
    pub ids: ShowIds,
}

/// Batch payload for adding to or removing from a list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncItems {
    pub shows: Vec<SyncShow>,
}

impl SyncItems {
    /// One entry per show, identifiers copied as given
    pub fn from_shows(shows: &[ShowRef]) -> Self {
        SyncItems {
            shows: shows
                .iter()
                .map(|show| SyncShow { ids: ShowIds::from(show) })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncStats {
    #[serde(default)]
    pub movies: u32,
    #[serde(default)]
    pub shows: u32,
    #[serde(default)]
    pub seasons: u32,
    #[serde(default)]
    pub episodes: u32,
    #[serde(default)]
    pub people: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncNotFound {
    #[serde(default)]
    pub shows: Vec<SyncShow>,
}

/// Response of the add/remove item endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncResponse {
    #[serde(default)]
    pub added: Option<SyncStats>,
    #[serde(default)]
    pub existing: Option<SyncStats>,
    #[serde(default)]
    pub deleted: Option<SyncStats>,
    #[serde(default)]
    pub not_found: Option<SyncNotFound>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_slug_path() {
        assert_eq!(UserSlug::Me.as_path(), "me");
        assert_eq!(UserSlug::Named("sean rudford".to_string()).as_path(), "sean%20rudford");
        assert_eq!(UserSlug::from_config(None), UserSlug::Me);
        assert_eq!(UserSlug::from_config(Some("  ")), UserSlug::Me);
        assert_eq!(UserSlug::from_config(Some("me")), UserSlug::Me);
        assert_eq!(UserSlug::from_config(Some("justin")), UserSlug::Named("justin".to_string()));
    }

    #[test]
    fn test_trakt_list_into_remote_list() {
        let json = r#"{
            "name": "Following",
            "description": null,
            "privacy": "private",
            "display_numbers": false,
            "allow_comments": true,
            "sort_by": "rank",
            "sort_how": "asc",
            "created_at": "2014-10-11T17:00:54.000Z",
            "updated_at": "2014-10-11T17:00:54.000Z",
            "item_count": 5,
            "comment_count": 0,
            "likes": 0,
            "ids": { "trakt": 55, "slug": "following" }
        }"#;
        let list: TraktList = serde_json::from_str(json).unwrap();
        let remote: RemoteList = list.into();

        assert_eq!(remote.id, ListId(55));
        assert_eq!(remote.name, "Following");
        assert_eq!(remote.privacy, ListPrivacy::Private);
        assert_eq!(remote.slug.as_deref(), Some("following"));
        assert_eq!(remote.item_count, 5);
        assert!(remote.created_at.is_some());
    }

    #[test]
    fn test_sync_items_keep_missing_ids_missing() {
        let shows = vec![
            ShowRef::new().with_trakt_id(1388).with_imdb_id("tt0903747").with_tmdb_id(1396),
            ShowRef::new().with_imdb_id("tt1520211"),
            ShowRef::new(),
        ];
        let items = SyncItems::from_shows(&shows);

        assert_eq!(items.len(), 3);
        assert_eq!(items.shows[0].ids.trakt, Some(1388));
        assert_eq!(items.shows[0].ids.imdb.as_deref(), Some("tt0903747"));
        assert_eq!(items.shows[0].ids.tmdb, Some(1396));
        assert_eq!(items.shows[1].ids, ShowIds { imdb: Some("tt1520211".to_string()), ..ShowIds::default() });
        assert_eq!(items.shows[2].ids, ShowIds::default());

        let json = serde_json::to_value(&items).unwrap();
        assert_eq!(json["shows"][1], serde_json::json!({ "ids": { "imdb": "tt1520211" } }));
        assert_eq!(json["shows"][2], serde_json::json!({ "ids": {} }));
    }

    #[test]
    fn test_list_entry_parses_show_item() {
        let json = r#"{
            "rank": 1,
            "id": 101,
            "listed_at": "2014-06-16T06:07:12.000Z",
            "type": "show",
            "show": {
                "title": "Breaking Bad",
                "year": 2008,
                "ids": { "trakt": 1, "slug": "breaking-bad", "tvdb": 81189, "imdb": "tt0903747", "tmdb": 1396 },
                "network": "AMC",
                "genres": ["drama"]
            }
        }"#;
        let entry: ListEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, Some(101));
        assert_eq!(entry.item_type.as_deref(), Some("show"));
        let show = entry.show.unwrap();
        assert_eq!(show.title.as_deref(), Some("Breaking Bad"));
        assert_eq!(show.ids.tvdb, Some(81189));
        assert_eq!(show.genres, Some(vec!["drama".to_string()]));
    }
}
