pub mod followed_entry;
pub mod list;
pub mod show;
pub mod show_ref;

pub use followed_entry::FollowedEntry;
pub use list::{ListId, ListPrivacy, RemoteList, FOLLOWED_LIST_NAME};
pub use show::Show;
pub use show_ref::ShowRef;
