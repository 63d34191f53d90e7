pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{Config, LoggingConfig, RetryConfig, TraktConfig, DEFAULT_TRAKT_API_URL};
pub use credentials::{CredentialStore, TRAKT_ACCESS_TOKEN_ENV};
pub use paths::{PathManager, container_base_path};
