use async_trait::async_trait;
use followed_shows_models::{ListId, RemoteList};

use crate::error::SourceError;
use crate::trakt::entities::{Extended, ListEntry, NewList, SyncItems, SyncResponse, UserSlug};

/// Remote user-list operations the followed list is built on
///
/// Every method is a single network round trip. Implementations classify
/// their failures through [`SourceError::kind`] so callers can decide what
/// to retry.
#[async_trait]
pub trait UserListService: Send + Sync {
    async fn list_user_lists(&self, user: &UserSlug) -> Result<Vec<RemoteList>, SourceError>;

    async fn create_user_list(&self, user: &UserSlug, list: &NewList) -> Result<RemoteList, SourceError>;

    async fn get_list_items(
        &self,
        user: &UserSlug,
        list_id: ListId,
        extended: Extended,
    ) -> Result<Vec<ListEntry>, SourceError>;

    async fn add_list_items(
        &self,
        user: &UserSlug,
        list_id: ListId,
        items: &SyncItems,
    ) -> Result<SyncResponse, SourceError>;

    async fn delete_list_items(
        &self,
        user: &UserSlug,
        list_id: ListId,
        items: &SyncItems,
    ) -> Result<SyncResponse, SourceError>;
}
