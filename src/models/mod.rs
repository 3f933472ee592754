use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod movie;
pub mod tmdb;
pub mod video;

pub use movie::{CastMember, Credits, Genre, MovieDetails};
pub use video::VideoRef;

/// TMDB movie identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MovieId {
    fn from(id: u64) -> Self {
        MovieId(id)
    }
}

/// Minimal movie record as listed by search, trending and upcoming endpoints.
///
/// Field names follow the TMDB JSON so the persisted favorites array keeps the
/// same shape as the API objects it was built from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
}

impl MovieSummary {
    /// Creates a summary with only an id and a title
    pub fn new(id: impl Into<MovieId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            poster_path: None,
            backdrop_path: None,
            overview: String::new(),
            release_date: String::new(),
            vote_average: 0.0,
        }
    }

    /// Year component of the release date, if one can be read
    pub fn release_year(&self) -> Option<i32> {
        release_year(&self.release_date)
    }

    /// Rating formatted the way cards display it, e.g. `7.3/10`
    pub fn rating_label(&self) -> String {
        rating_label(self.vote_average)
    }
}

pub(crate) fn release_year(release_date: &str) -> Option<i32> {
    if let Ok(date) = NaiveDate::parse_from_str(release_date, "%Y-%m-%d") {
        return Some(date.year());
    }
    release_date.get(..4).and_then(|year| year.parse().ok())
}

pub(crate) fn rating_label(vote_average: f64) -> String {
    format!("{:.1}/10", vote_average)
}

/// Clamp a rating to the 0..=10 scale, mapping non-finite values to 0
pub(crate) fn clamp_rating(vote_average: f64) -> f64 {
    if vote_average.is_finite() {
        vote_average.clamp(0.0, 10.0)
    } else {
        0.0
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub results: Vec<MovieSummary>,
    pub page: u32,
    pub total_pages: u32,
}

impl SearchPage {
    /// Whether the service reports pages beyond this one
    pub fn declares_more(&self) -> bool {
        !self.results.is_empty() && self.page < self.total_pages
    }
}

/// One page of a listing endpoint (upcoming, trending)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPage {
    pub results: Vec<MovieSummary>,
    pub page: u32,
    pub total_pages: u32,
}

impl ListingPage {
    pub fn declares_more(&self) -> bool {
        !self.results.is_empty() && self.page < self.total_pages
    }
}
