use async_trait::async_trait;
use followed_shows_config::{CredentialStore, TraktConfig, DEFAULT_TRAKT_API_URL};
use followed_shows_models::{ListId, RemoteList};
use reqwest::Client;
use std::sync::Arc;
use tracing::warn;

use crate::error::SourceError;
use crate::traits::UserListService;
use crate::trakt::api::{self, TraktApi};
use crate::trakt::entities::{Extended, ListEntry, NewList, SyncItems, SyncResponse, UserSlug};

#[derive(Clone)]
pub struct TraktClient {
    client: Arc<Client>,
    base_url: String,
    client_id: String,
    access_token: String,
}

impl std::fmt::Debug for TraktClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraktClient")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl TraktClient {
    pub fn new(client_id: String, access_token: String) -> Result<Self, SourceError> {
        if client_id.trim().is_empty() {
            return Err(SourceError::Config("Trakt client_id is empty".to_string()));
        }
        if access_token.trim().is_empty() {
            return Err(SourceError::NotAuthenticated("Trakt access token is empty".to_string()));
        }

        Ok(Self {
            client: Arc::new(api::create_trakt_client()),
            base_url: DEFAULT_TRAKT_API_URL.to_string(),
            client_id,
            access_token,
        })
    }

    /// Point the client at another API host (staging, mock servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build a client from the `[trakt]` config section and stored credentials
    pub fn from_config(config: &TraktConfig, credentials: &CredentialStore) -> Result<Self, SourceError> {
        if !config.enabled {
            return Err(SourceError::Config("Trakt is not enabled".to_string()));
        }

        let access_token = credentials.resolve_trakt_access_token().ok_or_else(|| {
            SourceError::NotAuthenticated(
                "No Trakt access token found; run `followed-shows config trakt` or set TRAKT_ACCESS_TOKEN".to_string(),
            )
        })?;
        if credentials.is_trakt_token_expired() {
            warn!("Stored Trakt access token has expired; requests will likely be rejected");
        }

        Ok(Self::new(config.client_id.clone(), access_token)?.with_base_url(config.api_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api(&self) -> TraktApi<'_> {
        TraktApi {
            client: &self.client,
            base_url: &self.base_url,
            access_token: &self.access_token,
            client_id: &self.client_id,
        }
    }
}

#[async_trait]
impl UserListService for TraktClient {
    async fn list_user_lists(&self, user: &UserSlug) -> Result<Vec<RemoteList>, SourceError> {
        api::list_user_lists(&self.api(), user).await
    }

    async fn create_user_list(&self, user: &UserSlug, list: &NewList) -> Result<RemoteList, SourceError> {
        api::create_user_list(&self.api(), user, list).await
    }

    async fn get_list_items(
        &self,
        user: &UserSlug,
        list_id: ListId,
        extended: Extended,
    ) -> Result<Vec<ListEntry>, SourceError> {
        api::get_list_items(&self.api(), user, list_id, extended).await
    }

    async fn add_list_items(
        &self,
        user: &UserSlug,
        list_id: ListId,
        items: &SyncItems,
    ) -> Result<SyncResponse, SourceError> {
        api::add_list_items(&self.api(), user, list_id, items).await
    }

    async fn delete_list_items(
        &self,
        user: &UserSlug,
        list_id: ListId,
        items: &SyncItems,
    ) -> Result<SyncResponse, SourceError> {
        api::delete_list_items(&self.api(), user, list_id, items).await
    }
}
