/// Movie metadata provider abstraction
///
/// Everything the client shows comes from an external metadata service. The
/// rest of the crate only talks to it through this trait so the service can be
/// swapped out, and faked in tests.
use crate::{
    error::AppResult,
    models::{Credits, ListingPage, MovieDetails, MovieId, SearchPage, VideoRef},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    /// Search movies by title, one page at a time (pages start at 1)
    async fn search_movies(&self, query: &str, page: u32) -> AppResult<SearchPage>;

    /// Upcoming releases, one page at a time
    async fn get_upcoming(&self, page: u32) -> AppResult<ListingPage>;

    /// Movies trending this week
    async fn get_trending(&self) -> AppResult<ListingPage>;

    /// Videos attached to a movie, used to locate a playable trailer
    async fn get_movie_videos(&self, id: MovieId) -> AppResult<Vec<VideoRef>>;

    async fn get_movie_details(&self, id: MovieId) -> AppResult<MovieDetails>;

    async fn get_movie_credits(&self, id: MovieId) -> AppResult<Credits>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
