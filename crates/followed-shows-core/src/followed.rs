//! The user's "Following" list on the remote service.
//!
//! Every operation goes straight to the service; nothing is cached apart from
//! the service handle itself, which is built on first use.
//!
//! Resolution is check-then-create: two processes resolving at the same time
//! can both see no "Following" list and both create one. Nothing here
//! deduplicates afterwards.

use followed_shows_models::{
    FollowedEntry, ListId, ListPrivacy, RemoteList, Show, ShowRef, FOLLOWED_LIST_NAME,
};
use followed_shows_sources::{
    Extended, ListEntry, NewList, SourceError, SyncItems, UserListService, UserSlug,
};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::error::FollowedError;
use crate::mappers::{pair_mapper_of, ListEntryToFollowedEntry, ListEntryToShow, Mapper, PairMapper};
use crate::retry::RetryPolicy;

type ServiceFactory<S> = Box<dyn Fn() -> Result<Arc<S>, SourceError> + Send + Sync>;

pub struct FollowedListResolver<S: UserListService + ?Sized> {
    service: OnceCell<Arc<S>>,
    factory: ServiceFactory<S>,
    user: UserSlug,
    retry: RetryPolicy,
    mapper: PairMapper<ListEntry, FollowedEntry, Show>,
}

impl<S: UserListService + ?Sized + 'static> FollowedListResolver<S> {
    /// `factory` is called on first use; once it succeeds the service is reused
    pub fn new<F>(factory: F, retry: RetryPolicy) -> Self
    where
        F: Fn() -> Result<Arc<S>, SourceError> + Send + Sync + 'static,
    {
        Self {
            service: OnceCell::new(),
            factory: Box::new(factory),
            user: UserSlug::Me,
            retry,
            mapper: pair_mapper_of(ListEntryToFollowedEntry, ListEntryToShow),
        }
    }

    /// Resolver over an already constructed service
    pub fn with_service(service: Arc<S>, retry: RetryPolicy) -> Self {
        Self {
            service: OnceCell::new_with(Some(service.clone())),
            factory: Box::new(move || Ok(service.clone())),
            user: UserSlug::Me,
            retry,
            mapper: pair_mapper_of(ListEntryToFollowedEntry, ListEntryToShow),
        }
    }

    pub fn with_user(mut self, user: UserSlug) -> Self {
        self.user = user;
        self
    }

    pub fn with_mappers(
        mut self,
        entry_mapper: impl Mapper<ListEntry, FollowedEntry> + 'static,
        show_mapper: impl Mapper<ListEntry, Show> + 'static,
    ) -> Self {
        self.mapper = pair_mapper_of(entry_mapper, show_mapper);
        self
    }

    pub fn user(&self) -> &UserSlug {
        &self.user
    }

    async fn service(&self) -> Result<&S, FollowedError> {
        let service = self
            .service
            .get_or_try_init(|| async { (self.factory)() })
            .await
            .map_err(FollowedError::ServiceUnavailable)?;
        Ok(&**service)
    }

    /// Find the "Following" list, creating it (private) when it does not exist
    pub async fn resolve_followed_list(&self) -> Result<RemoteList, FollowedError> {
        let service = self.service().await?;
        let user = &self.user;

        let existing = self
            .retry
            .execute(move || async move {
                let lists = service.list_user_lists(user).await?;
                Ok::<_, SourceError>(lists.into_iter().find(RemoteList::is_followed_list))
            })
            .await
            .map_err(|e| FollowedError::from_retry("fetch user lists", e))?;

        if let Some(list) = existing {
            debug!("Found followed list '{}' (id={})", list.name, list.id);
            return Ok(list);
        }

        let new_list = NewList::new(FOLLOWED_LIST_NAME, ListPrivacy::Private);
        let new_list = &new_list;
        let created = self
            .retry
            .execute(move || service.create_user_list(user, new_list))
            .await
            .map_err(|e| FollowedError::from_retry("create followed list", e))?;

        info!("Created followed list '{}' (id={})", created.name, created.id);
        Ok(created)
    }

    pub async fn add_shows_to_list(&self, list_id: ListId, shows: &[ShowRef]) -> Result<(), FollowedError> {
        let service = self.service().await?;
        let user = &self.user;
        let items = SyncItems::from_shows(shows);
        let items = &items;

        self.retry
            .execute(move || service.add_list_items(user, list_id, items))
            .await
            .map_err(|e| FollowedError::from_retry("add shows to list", e))?;
        Ok(())
    }

    pub async fn remove_shows_from_list(&self, list_id: ListId, shows: &[ShowRef]) -> Result<(), FollowedError> {
        let service = self.service().await?;
        let user = &self.user;
        let items = SyncItems::from_shows(shows);
        let items = &items;

        self.retry
            .execute(move || service.delete_list_items(user, list_id, items))
            .await
            .map_err(|e| FollowedError::from_retry("remove shows from list", e))?;
        Ok(())
    }

    /// Shows on the list, in the order the service returns them
    pub async fn list_shows_in_list(&self, list_id: ListId) -> Result<Vec<(FollowedEntry, Show)>, FollowedError> {
        let service = self.service().await?;
        let user = &self.user;
        let mapper = &self.mapper;

        self.retry
            .execute(move || async move {
                let items = service.get_list_items(user, list_id, Extended::NoSeasons).await?;
                Ok::<_, SourceError>(mapper.map_all(&items))
            })
            .await
            .map_err(|e| FollowedError::from_retry("fetch list items", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use followed_shows_sources::{ShowIds, SyncResponse, SyncShow, TraktShow};
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeService {
        lists: Vec<RemoteList>,
        items: Vec<ListEntry>,
        failures: Mutex<HashMap<&'static str, VecDeque<SourceError>>>,
        calls: Mutex<HashMap<&'static str, u32>>,
        created: Mutex<Vec<NewList>>,
        added: Mutex<Vec<SyncItems>>,
        removed: Mutex<Vec<SyncItems>>,
    }

    impl FakeService {
        fn with_lists(lists: Vec<RemoteList>) -> Self {
            Self {
                lists,
                ..Self::default()
            }
        }

        fn fail(self, op: &'static str, errors: Vec<SourceError>) -> Self {
            self.failures.lock().unwrap().insert(op, errors.into());
            self
        }

        fn record(&self, op: &'static str) -> Result<(), SourceError> {
            *self.calls.lock().unwrap().entry(op).or_insert(0) += 1;
            match self.failures.lock().unwrap().get_mut(op).and_then(|q| q.pop_front()) {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        fn calls(&self, op: &str) -> u32 {
            self.calls.lock().unwrap().get(op).copied().unwrap_or(0)
        }
    }

    #[async_trait]
    impl UserListService for FakeService {
        async fn list_user_lists(&self, _user: &UserSlug) -> Result<Vec<RemoteList>, SourceError> {
            self.record("lists")?;
            Ok(self.lists.clone())
        }

        async fn create_user_list(&self, _user: &UserSlug, list: &NewList) -> Result<RemoteList, SourceError> {
            self.record("create")?;
            self.created.lock().unwrap().push(list.clone());
            Ok(RemoteList::new(ListId(999), list.name.clone(), list.privacy))
        }

        async fn get_list_items(
            &self,
            _user: &UserSlug,
            _list_id: ListId,
            extended: Extended,
        ) -> Result<Vec<ListEntry>, SourceError> {
            assert_eq!(extended, Extended::NoSeasons);
            self.record("items")?;
            Ok(self.items.clone())
        }

        async fn add_list_items(
            &self,
            _user: &UserSlug,
            _list_id: ListId,
            items: &SyncItems,
        ) -> Result<SyncResponse, SourceError> {
            self.record("add")?;
            self.added.lock().unwrap().push(items.clone());
            Ok(SyncResponse::default())
        }

        async fn delete_list_items(
            &self,
            _user: &UserSlug,
            _list_id: ListId,
            items: &SyncItems,
        ) -> Result<SyncResponse, SourceError> {
            self.record("remove")?;
            self.removed.lock().unwrap().push(items.clone());
            Ok(SyncResponse::default())
        }
    }

    fn http_error(status: u16) -> SourceError {
        SourceError::Http {
            status,
            endpoint: "test".to_string(),
            body: String::new(),
        }
    }

    fn resolver(service: Arc<FakeService>) -> FollowedListResolver<FakeService> {
        FollowedListResolver::with_service(service, RetryPolicy::new(3, |_| Duration::ZERO))
    }

    fn show_entry(id: u64, title: &str) -> ListEntry {
        ListEntry {
            id: Some(id),
            rank: None,
            listed_at: Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, id as u32 % 60).unwrap()),
            item_type: Some("show".to_string()),
            show: Some(TraktShow {
                title: Some(title.to_string()),
                ids: ShowIds {
                    trakt: Some(id * 10),
                    ..ShowIds::default()
                },
                ..TraktShow::default()
            }),
        }
    }

    mod resolve {
        use super::*;

        #[tokio::test]
        async fn test_existing_list_is_returned_without_create() {
            let mut following = RemoteList::new(ListId(7), "Following", ListPrivacy::Public);
            following.description = Some("mine".to_string());
            let service = Arc::new(FakeService::with_lists(vec![
                RemoteList::new(ListId(1), "Watch Later", ListPrivacy::Private),
                following.clone(),
            ]));

            let list = resolver(service.clone()).resolve_followed_list().await.unwrap();

            assert_eq!(list, following);
            assert_eq!(service.calls("lists"), 1);
            assert_eq!(service.calls("create"), 0);
        }

        #[tokio::test]
        async fn test_first_match_wins() {
            let service = Arc::new(FakeService::with_lists(vec![
                RemoteList::new(ListId(3), "Following", ListPrivacy::Private),
                RemoteList::new(ListId(4), "Following", ListPrivacy::Private),
            ]));

            let list = resolver(service).resolve_followed_list().await.unwrap();
            assert_eq!(list.id, ListId(3));
        }

        #[tokio::test]
        async fn test_missing_list_is_created_once() {
            let service = Arc::new(FakeService::with_lists(vec![
                RemoteList::new(ListId(1), "following", ListPrivacy::Private),
                RemoteList::new(ListId(2), "Favourites", ListPrivacy::Public),
            ]));

            let list = resolver(service.clone()).resolve_followed_list().await.unwrap();

            assert_eq!(list.id, ListId(999));
            assert_eq!(service.calls("create"), 1);
            let created = service.created.lock().unwrap();
            assert_eq!(*created, vec![NewList::new("Following", ListPrivacy::Private)]);
        }

        #[tokio::test]
        async fn test_transient_list_failure_is_retried() {
            let service = Arc::new(
                FakeService::with_lists(vec![RemoteList::new(ListId(5), "Following", ListPrivacy::Private)])
                    .fail("lists", vec![http_error(502), http_error(503)]),
            );

            let list = resolver(service.clone()).resolve_followed_list().await.unwrap();

            assert_eq!(list.id, ListId(5));
            assert_eq!(service.calls("lists"), 3);
        }

        #[tokio::test]
        async fn test_permanent_create_failure_surfaces() {
            let service = Arc::new(FakeService::default().fail("create", vec![http_error(422)]));

            let err = resolver(service.clone()).resolve_followed_list().await.unwrap_err();

            match &err {
                FollowedError::Permanent { operation, source } => {
                    assert_eq!(*operation, "create followed list");
                    assert_eq!(source.status(), Some(422));
                }
                other => panic!("Expected Permanent, got {:?}", other),
            }
            assert_eq!(service.calls("create"), 1);
        }

        #[tokio::test]
        async fn test_exhausted_lookup_does_not_create() {
            let service = Arc::new(
                FakeService::default().fail("lists", vec![http_error(500), http_error(500), http_error(500)]),
            );

            let err = resolver(service.clone()).resolve_followed_list().await.unwrap_err();

            assert!(err.is_exhausted());
            assert_eq!(err.source_error().status(), Some(500));
            assert_eq!(service.calls("lists"), 3);
            assert_eq!(service.calls("create"), 0);
        }
    }

    mod items {
        use super::*;

        #[tokio::test]
        async fn test_add_sends_every_show_verbatim() {
            let service = Arc::new(FakeService::default());
            let shows = vec![
                ShowRef::new().with_trakt_id(1).with_imdb_id("tt1").with_tmdb_id(11),
                ShowRef::new().with_imdb_id("tt2"),
                ShowRef::new(),
            ];

            resolver(service.clone()).add_shows_to_list(ListId(7), &shows).await.unwrap();

            let added = service.added.lock().unwrap();
            assert_eq!(added.len(), 1);
            assert_eq!(
                added[0].shows,
                vec![
                    SyncShow { ids: ShowIds { trakt: Some(1), imdb: Some("tt1".to_string()), tmdb: Some(11), ..ShowIds::default() } },
                    SyncShow { ids: ShowIds { imdb: Some("tt2".to_string()), ..ShowIds::default() } },
                    SyncShow { ids: ShowIds::default() },
                ]
            );
        }

        #[tokio::test]
        async fn test_remove_sends_every_show() {
            let service = Arc::new(FakeService::default());
            let shows = vec![ShowRef::new().with_trakt_id(1), ShowRef::new().with_tmdb_id(2)];

            resolver(service.clone()).remove_shows_from_list(ListId(7), &shows).await.unwrap();

            let removed = service.removed.lock().unwrap();
            assert_eq!(removed[0].shows.len(), 2);
            assert_eq!(removed[0].shows[1].ids.tmdb, Some(2));
            assert_eq!(service.calls("add"), 0);
        }

        #[tokio::test]
        async fn test_add_exhausts_retries() {
            let service = Arc::new(
                FakeService::default().fail("add", vec![http_error(429), http_error(503), http_error(504)]),
            );

            let err = resolver(service.clone())
                .add_shows_to_list(ListId(7), &[ShowRef::new().with_trakt_id(1)])
                .await
                .unwrap_err();

            match err {
                FollowedError::Exhausted { attempts, source, .. } => {
                    assert_eq!(attempts, 3);
                    assert_eq!(source.status(), Some(504));
                }
                other => panic!("Expected Exhausted, got {:?}", other),
            }
            assert_eq!(service.calls("add"), 3);
        }

        #[tokio::test]
        async fn test_remove_permanent_failure_not_retried() {
            let service = Arc::new(FakeService::default().fail("remove", vec![http_error(404)]));

            let err = resolver(service.clone())
                .remove_shows_from_list(ListId(7), &[ShowRef::new().with_trakt_id(1)])
                .await
                .unwrap_err();

            assert!(matches!(err, FollowedError::Permanent { .. }));
            assert_eq!(service.calls("remove"), 1);
        }

        #[tokio::test]
        async fn test_list_shows_preserves_order() {
            let service = Arc::new(FakeService {
                items: vec![show_entry(3, "Gamma"), show_entry(1, "Alpha"), show_entry(2, "Beta")],
                ..FakeService::default()
            });

            let pairs = resolver(service).list_shows_in_list(ListId(7)).await.unwrap();

            assert_eq!(pairs.len(), 3);
            let summary: Vec<_> = pairs
                .iter()
                .map(|(entry, show)| (entry.list_entry_id, show.title.as_str(), show.ids.trakt_id))
                .collect();
            assert_eq!(
                summary,
                vec![
                    (Some(3), "Gamma", Some(30)),
                    (Some(1), "Alpha", Some(10)),
                    (Some(2), "Beta", Some(20)),
                ]
            );
        }

        #[tokio::test]
        async fn test_list_shows_with_custom_mappers() {
            let service = Arc::new(FakeService {
                items: vec![show_entry(1, "Alpha"), show_entry(2, "Beta")],
                ..FakeService::default()
            });

            let pairs = resolver(service)
                .with_mappers(
                    |e: &ListEntry| FollowedEntry { list_entry_id: e.id.map(|id| id + 100), followed_at: None },
                    |_: &ListEntry| Show { title: "fixed".to_string(), ..Show::default() },
                )
                .list_shows_in_list(ListId(7))
                .await
                .unwrap();

            assert_eq!(pairs[0].0.list_entry_id, Some(101));
            assert_eq!(pairs[1].0.list_entry_id, Some(102));
            assert!(pairs.iter().all(|(_, show)| show.title == "fixed"));
        }

        #[tokio::test]
        async fn test_list_shows_empty() {
            let service = Arc::new(FakeService::default());
            let pairs = resolver(service.clone()).list_shows_in_list(ListId(7)).await.unwrap();
            assert!(pairs.is_empty());
            assert_eq!(service.calls("items"), 1);
        }
    }

    mod factory {
        use super::*;

        #[tokio::test]
        async fn test_factory_runs_once() {
            let service = Arc::new(FakeService::with_lists(vec![RemoteList::new(
                ListId(1),
                "Following",
                ListPrivacy::Private,
            )]));
            let builds = Arc::new(AtomicU32::new(0));
            let resolver = {
                let service = service.clone();
                let builds = builds.clone();
                FollowedListResolver::new(
                    move || {
                        builds.fetch_add(1, Ordering::SeqCst);
                        Ok(service.clone())
                    },
                    RetryPolicy::no_retry(),
                )
            };

            let list = resolver.resolve_followed_list().await.unwrap();
            resolver.add_shows_to_list(list.id, &[ShowRef::new().with_trakt_id(1)]).await.unwrap();
            resolver.list_shows_in_list(list.id).await.unwrap();

            assert_eq!(builds.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_factory_failure_is_reported_and_retried_later() {
            let builds = Arc::new(AtomicU32::new(0));
            let resolver: FollowedListResolver<FakeService> = {
                let builds = builds.clone();
                FollowedListResolver::new(
                    move || {
                        if builds.fetch_add(1, Ordering::SeqCst) == 0 {
                            Err(SourceError::NotAuthenticated("no token".to_string()))
                        } else {
                            Ok(Arc::new(FakeService::default()))
                        }
                    },
                    RetryPolicy::no_retry(),
                )
            };

            let err = resolver.list_shows_in_list(ListId(1)).await.unwrap_err();
            assert!(matches!(err, FollowedError::ServiceUnavailable(SourceError::NotAuthenticated(_))));

            resolver.list_shows_in_list(ListId(1)).await.unwrap();
            assert_eq!(builds.load(Ordering::SeqCst), 2);
        }

        #[tokio::test]
        async fn test_concurrent_operations_share_service() {
            let service = Arc::new(FakeService {
                items: vec![show_entry(1, "Alpha")],
                ..FakeService::default()
            });
            let resolver = Arc::new(resolver(service.clone()));
            let shows = [ShowRef::new().with_trakt_id(5)];

            let (a, b) = tokio::join!(
                resolver.list_shows_in_list(ListId(1)),
                resolver.add_shows_to_list(ListId(1), &shows),
            );

            assert_eq!(a.unwrap().len(), 1);
            b.unwrap();
            assert_eq!(service.calls("items"), 1);
            assert_eq!(service.calls("add"), 1);
        }
    }
}
