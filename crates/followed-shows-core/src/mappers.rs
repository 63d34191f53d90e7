use followed_shows_models::{FollowedEntry, Show, ShowRef};
use followed_shows_sources::{ListEntry, TraktShow};
use std::sync::Arc;

/// Pure conversion from one representation to another
pub trait Mapper<F, T>: Send + Sync {
    fn map(&self, from: &F) -> T;
}

impl<F, T, Func> Mapper<F, T> for Func
where
    Func: Fn(&F) -> T + Send + Sync,
{
    fn map(&self, from: &F) -> T {
        self(from)
    }
}

/// Trakt list item -> show domain model
#[derive(Debug, Clone, Copy, Default)]
pub struct ListEntryToShow;

impl Mapper<ListEntry, Show> for ListEntryToShow {
    fn map(&self, from: &ListEntry) -> Show {
        match from.show {
            Some(ref show) => trakt_show_to_show(show),
            None => Show::default(),
        }
    }
}

fn trakt_show_to_show(show: &TraktShow) -> Show {
    Show {
        ids: ShowRef {
            trakt_id: show.ids.trakt,
            imdb_id: show.ids.imdb.clone(),
            tmdb_id: show.ids.tmdb,
        },
        tvdb_id: show.ids.tvdb,
        slug: show.ids.slug.clone(),
        title: show.title.clone().unwrap_or_default(),
        year: show.year,
        overview: show.overview.clone(),
        network: show.network.clone(),
        status: show.status.clone(),
        runtime: show.runtime,
        certification: show.certification.clone(),
        country: show.country.clone(),
        genres: show.genres.clone().unwrap_or_default(),
        first_aired: show.first_aired,
    }
}

/// Trakt list item -> followed-list tracking metadata
#[derive(Debug, Clone, Copy, Default)]
pub struct ListEntryToFollowedEntry;

impl Mapper<ListEntry, FollowedEntry> for ListEntryToFollowedEntry {
    fn map(&self, from: &ListEntry) -> FollowedEntry {
        FollowedEntry {
            list_entry_id: from.id,
            followed_at: from.listed_at,
        }
    }
}

/// Applies two mappers to the same item, producing a pair
pub struct PairMapper<F, A, B> {
    first: Arc<dyn Mapper<F, A>>,
    second: Arc<dyn Mapper<F, B>>,
}

impl<F, A, B> Clone for PairMapper<F, A, B> {
    fn clone(&self) -> Self {
        Self {
            first: Arc::clone(&self.first),
            second: Arc::clone(&self.second),
        }
    }
}

impl<F, A, B> PairMapper<F, A, B> {
    pub fn map(&self, item: &F) -> (A, B) {
        (self.first.map(item), self.second.map(item))
    }

    /// Map every item, keeping input order
    pub fn map_all(&self, items: &[F]) -> Vec<(A, B)> {
        items.iter().map(|item| self.map(item)).collect()
    }
}

pub fn pair_mapper_of<F, A, B>(
    first: impl Mapper<F, A> + 'static,
    second: impl Mapper<F, B> + 'static,
) -> PairMapper<F, A, B> {
    PairMapper {
        first: Arc::new(first),
        second: Arc::new(second),
    }
}
