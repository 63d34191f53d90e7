//! Builds a resolver backed by the Trakt API from configuration
//!
//! The Trakt client is not created here: construction is deferred to the
//! first operation, so a missing token only surfaces when the list is used.

use followed_shows_config::{Config, CredentialStore};
use followed_shows_sources::{SourceError, TraktClient, UserSlug};
use std::sync::Arc;

use crate::followed::FollowedListResolver;
use crate::retry::RetryPolicy;

pub fn trakt_resolver(config: &Config, credentials: CredentialStore) -> FollowedListResolver<TraktClient> {
    let trakt_config = config.trakt.clone();
    let user = UserSlug::from_config(trakt_config.as_ref().and_then(|t| t.user.as_deref()));

    FollowedListResolver::new(
        move || {
            let trakt_config = trakt_config
                .as_ref()
                .ok_or_else(|| SourceError::Config("Trakt is not configured".to_string()))?;
            TraktClient::from_config(trakt_config, &credentials).map(Arc::new)
        },
        RetryPolicy::from_config(&config.retry),
    )
    .with_user(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FollowedError;
    use followed_shows_config::{RetryConfig, TraktConfig};
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_missing_trakt_section_fails_lazily() {
        let config = Config::default();
        let resolver = trakt_resolver(&config, CredentialStore::new(PathBuf::from("/tmp/unused")));

        assert_eq!(resolver.user(), &UserSlug::Me);
        let err = resolver.resolve_followed_list().await.unwrap_err();
        assert!(matches!(err, FollowedError::ServiceUnavailable(SourceError::Config(_))));
    }

    #[test]
    fn test_configured_user_is_used() {
        let config = Config {
            trakt: Some(TraktConfig {
                enabled: true,
                client_id: "id".to_string(),
                api_url: "https://api.trakt.tv".to_string(),
                user: Some("sean".to_string()),
            }),
            retry: RetryConfig::default(),
            logging: None,
        };
        let resolver = trakt_resolver(&config, CredentialStore::new(PathBuf::from("/tmp/unused")));
        assert_eq!(resolver.user(), &UserSlug::Named("sean".to_string()));
    }
}
