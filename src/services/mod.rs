pub mod debounce;
pub mod favorites;
pub mod feed;
pub mod images;
pub mod movie_detail;
pub mod providers;
pub mod search;
pub mod trailer;

pub use favorites::{FavoriteEvent, FavoritesStore};
pub use feed::UpcomingFeed;
pub use providers::{MovieProvider, TmdbProvider};
pub use search::{SearchSession, SearchState};
