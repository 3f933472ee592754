//! Raw TMDB response shapes.
//!
//! Every field is optional here. Values are checked and coerced into the domain
//! types at this boundary: list entries that cannot be read are dropped one by
//! one instead of failing the whole response.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{
    clamp_rating, CastMember, Credits, Genre, ListingPage, MovieDetails, MovieId, MovieSummary,
    SearchPage, VideoRef,
};

/// Parse each element independently, keeping only those that deserialize
fn parse_each<T: DeserializeOwned>(values: Option<Vec<serde_json::Value>>) -> Vec<T> {
    values
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| serde_json::from_value::<T>(value).ok())
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Movie entry from list endpoints (`/search/movie`, `/movie/upcoming`, `/trending/...`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbMovie {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl TmdbMovie {
    /// Entries without an id or a title cannot be shown or favorited
    pub fn into_summary(self) -> Option<MovieSummary> {
        let id = self.id?;
        let title = non_empty(self.title)?;

        Some(MovieSummary {
            id: MovieId(id),
            title,
            poster_path: non_empty(self.poster_path),
            backdrop_path: non_empty(self.backdrop_path),
            overview: self.overview.unwrap_or_default(),
            release_date: self.release_date.unwrap_or_default(),
            vote_average: clamp_rating(self.vote_average.unwrap_or_default()),
        })
    }
}

/// Paginated list envelope
#[derive(Debug, Default, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub results: Option<Vec<serde_json::Value>>,
}

impl TmdbPage {
    fn into_parts(self, requested_page: u32) -> (Vec<MovieSummary>, u32, u32) {
        let page = self.page.filter(|p| *p > 0).unwrap_or(requested_page);
        let total_pages = self.total_pages.unwrap_or(page);
        let results = parse_each::<TmdbMovie>(self.results)
            .into_iter()
            .filter_map(TmdbMovie::into_summary)
            .collect();
        (results, page, total_pages)
    }

    pub fn into_search_page(self, requested_page: u32) -> SearchPage {
        let (results, page, total_pages) = self.into_parts(requested_page);
        SearchPage {
            results,
            page,
            total_pages,
        }
    }

    pub fn into_listing_page(self, requested_page: u32) -> ListingPage {
        let (results, page, total_pages) = self.into_parts(requested_page);
        ListingPage {
            results,
            page,
            total_pages,
        }
    }
}

/// Response from `GET /movie/{id}`
#[derive(Debug, Default, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub tagline: Option<String>,
}

impl TmdbMovieDetails {
    pub fn into_details(self) -> Option<MovieDetails> {
        let id = self.id?;
        let title = non_empty(self.title)?;

        Some(MovieDetails {
            id: MovieId(id),
            title,
            poster_path: non_empty(self.poster_path),
            backdrop_path: non_empty(self.backdrop_path),
            overview: self.overview.unwrap_or_default(),
            release_date: self.release_date.unwrap_or_default(),
            vote_average: clamp_rating(self.vote_average.unwrap_or_default()),
            runtime: self.runtime,
            genres: parse_each::<Genre>(self.genres),
            tagline: non_empty(self.tagline),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct TmdbCastMember {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    character: Option<String>,
    #[serde(default)]
    profile_path: Option<String>,
}

/// Response from `GET /movie/{id}/credits`
#[derive(Debug, Default, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Option<Vec<serde_json::Value>>,
}

impl From<TmdbCredits> for Credits {
    fn from(raw: TmdbCredits) -> Self {
        let cast = parse_each::<TmdbCastMember>(raw.cast)
            .into_iter()
            .filter_map(|member| {
                Some(CastMember {
                    id: member.id?,
                    name: non_empty(member.name)?,
                    character: member.character.unwrap_or_default(),
                    profile_path: non_empty(member.profile_path),
                })
            })
            .collect();
        Credits { cast }
    }
}

#[derive(Debug, Default, Deserialize)]
struct TmdbVideo {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    site: Option<String>,
    #[serde(default, rename = "type")]
    video_type: Option<String>,
}

/// Response from `GET /movie/{id}/videos`
#[derive(Debug, Default, Deserialize)]
pub struct TmdbVideos {
    #[serde(default)]
    pub results: Option<Vec<serde_json::Value>>,
}

impl From<TmdbVideos> for Vec<VideoRef> {
    fn from(raw: TmdbVideos) -> Self {
        parse_each::<TmdbVideo>(raw.results)
            .into_iter()
            .filter_map(|video| {
                let key = non_empty(video.key)?;
                Some(VideoRef {
                    id: video.id.unwrap_or_else(|| key.clone()),
                    key,
                    name: video.name.unwrap_or_default(),
                    site: video.site.unwrap_or_default(),
                    video_type: video.video_type.unwrap_or_default(),
                })
            })
            .collect()
    }
}
