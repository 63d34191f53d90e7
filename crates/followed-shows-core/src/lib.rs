pub mod error;
pub mod factory;
pub mod followed;
pub mod mappers;
pub mod retry;

pub use error::FollowedError;
pub use factory::trakt_resolver;
pub use followed::FollowedListResolver;
pub use mappers::{pair_mapper_of, ListEntryToFollowedEntry, ListEntryToShow, Mapper, PairMapper};
pub use retry::{RetryError, RetryPolicy, Retryable};
