use followed_shows_models::{ListId, RemoteList};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::SourceError;
use crate::trakt::entities::{Extended, ListEntry, NewList, SyncItems, SyncResponse, TraktList, UserSlug};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create the reqwest Client used for every Trakt call
pub fn create_trakt_client() -> Client {
    Client::builder()
        .user_agent(concat!("followed-shows/", env!("CARGO_PKG_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Connection details shared by every request
pub struct TraktApi<'a> {
    pub client: &'a Client,
    pub base_url: &'a str,
    pub access_token: &'a str,
    pub client_id: &'a str,
}

impl<'a> TraktApi<'a> {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("trakt-api-version", "2")
            .header("trakt-api-key", self.client_id)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
    }
}

/// Turn a non-success status into a classified error, keeping the body for diagnostics
async fn check_status(response: Response, endpoint: &str) -> Result<Response, SourceError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    Err(SourceError::http(status, endpoint, error_text))
}

async fn parse_body<T: DeserializeOwned>(response: Response, endpoint: &str) -> Result<T, SourceError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| SourceError::Parse {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}

/// Fetch every list owned by `user`
pub async fn list_user_lists(api: &TraktApi<'_>, user: &UserSlug) -> Result<Vec<RemoteList>, SourceError> {
    let path = format!("/users/{}/lists", user.as_path());
    let endpoint = format!("GET {}", path);

    let response = api.authorized(api.client.get(api.url(&path))).send().await?;
    let response = check_status(response, &endpoint).await?;
    let lists: Vec<TraktList> = parse_body(response, &endpoint).await?;

    debug!("Fetched {} Trakt lists for {}", lists.len(), user.as_path());
    Ok(lists.into_iter().map(RemoteList::from).collect())
}

/// Create a new list for `user`
pub async fn create_user_list(
    api: &TraktApi<'_>,
    user: &UserSlug,
    list: &NewList,
) -> Result<RemoteList, SourceError> {
    let path = format!("/users/{}/lists", user.as_path());
    let endpoint = format!("POST {}", path);

    let response = api
        .authorized(api.client.post(api.url(&path)))
        .json(list)
        .send()
        .await?;
    let response = check_status(response, &endpoint).await?;
    let created: TraktList = parse_body(response, &endpoint).await?;

    debug!("Created Trakt list '{}' (id={})", created.name, created.ids.trakt);
    Ok(created.into())
}

/// Fetch the show items of a list
pub async fn get_list_items(
    api: &TraktApi<'_>,
    user: &UserSlug,
    list_id: ListId,
    extended: Extended,
) -> Result<Vec<ListEntry>, SourceError> {
    let path = format!("/users/{}/lists/{}/items/show", user.as_path(), list_id);
    let endpoint = format!("GET {}", path);

    let response = api
        .authorized(api.client.get(api.url(&path)))
        .query(&[("extended", extended.as_str())])
        .send()
        .await?;
    let response = check_status(response, &endpoint).await?;
    let items: Vec<ListEntry> = parse_body(response, &endpoint).await?;

    debug!("Fetched {} items from Trakt list {}", items.len(), list_id);
    Ok(items)
}

/// Add shows to a list
pub async fn add_list_items(
    api: &TraktApi<'_>,
    user: &UserSlug,
    list_id: ListId,
    items: &SyncItems,
) -> Result<SyncResponse, SourceError> {
    let path = format!("/users/{}/lists/{}/items", user.as_path(), list_id);
    let endpoint = format!("POST {}", path);

    let response = api
        .authorized(api.client.post(api.url(&path)))
        .json(items)
        .send()
        .await?;
    let response = check_status(response, &endpoint).await?;
    let result: SyncResponse = parse_body(response, &endpoint).await?;

    debug!(
        "Trakt list {} add: sent={}, added={}, existing={}, not_found={}",
        list_id,
        items.len(),
        result.added.as_ref().map(|s| s.shows).unwrap_or(0),
        result.existing.as_ref().map(|s| s.shows).unwrap_or(0),
        result.not_found.as_ref().map(|n| n.shows.len()).unwrap_or(0),
    );
    Ok(result)
}

/// Remove shows from a list
pub async fn delete_list_items(
    api: &TraktApi<'_>,
    user: &UserSlug,
    list_id: ListId,
    items: &SyncItems,
) -> Result<SyncResponse, SourceError> {
    let path = format!("/users/{}/lists/{}/items/remove", user.as_path(), list_id);
    let endpoint = format!("POST {}", path);

    let response = api
        .authorized(api.client.post(api.url(&path)))
        .json(items)
        .send()
        .await?;
    let response = check_status(response, &endpoint).await?;
    let result: SyncResponse = parse_body(response, &endpoint).await?;

    debug!(
        "Trakt list {} remove: sent={}, deleted={}, not_found={}",
        list_id,
        items.len(),
        result.deleted.as_ref().map(|s| s.shows).unwrap_or(0),
        result.not_found.as_ref().map(|n| n.shows.len()).unwrap_or(0),
    );
    Ok(result)
}
