pub mod error;
pub mod traits;
pub mod trakt;

pub use error::{FailureKind, SourceError};
pub use traits::UserListService;
pub use trakt::entities::{
    Extended, ListEntry, ListIds, NewList, ShowIds, SyncItems, SyncNotFound, SyncResponse,
    SyncShow, SyncStats, TraktList, TraktShow, UserSlug,
};
pub use trakt::TraktClient;
