/// TMDB (The Movie Database) v3 API provider
///
/// Authenticates with the `api_key` query parameter. Every response is read
/// into the raw types in `models::tmdb` and coerced into domain types there.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{
        tmdb::{TmdbCredits, TmdbMovieDetails, TmdbPage, TmdbVideos},
        Credits, ListingPage, MovieDetails, MovieId, SearchPage, VideoRef,
    },
    services::providers::MovieProvider,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

const PROVIDER_NAME: &str = "tmdb";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            language,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_language.clone(),
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), path)
    }

    /// Issues a GET and decodes the body into a raw response type
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = self.endpoint(path);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("TMDB resource {}", path)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        tracing::debug!(path = %path, bytes = response_text.len(), "Raw TMDB API response");

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(error = %e, path = %path, "Failed to deserialize TMDB response");
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl MovieProvider for TmdbProvider {
    async fn search_movies(&self, query: &str, page: u32) -> AppResult<SearchPage> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }
        let page = page.max(1);

        let raw: TmdbPage = self
            .get_json(
                "/search/movie",
                &[
                    ("query", query.to_string()),
                    ("page", page.to_string()),
                    ("include_adult", "false".to_string()),
                ],
            )
            .await?;
        let results = raw.into_search_page(page);

        tracing::info!(
            query = %query,
            page = results.page,
            total_pages = results.total_pages,
            results = results.results.len(),
            provider = PROVIDER_NAME,
            "Movie search completed"
        );

        Ok(results)
    }

    async fn get_upcoming(&self, page: u32) -> AppResult<ListingPage> {
        let page = page.max(1);
        let raw: TmdbPage = self
            .get_json("/movie/upcoming", &[("page", page.to_string())])
            .await?;
        let listing = raw.into_listing_page(page);

        tracing::info!(
            page = listing.page,
            results = listing.results.len(),
            provider = PROVIDER_NAME,
            "Upcoming movies fetched"
        );

        Ok(listing)
    }

    async fn get_trending(&self) -> AppResult<ListingPage> {
        let raw: TmdbPage = self.get_json("/trending/movie/week", &[]).await?;
        let listing = raw.into_listing_page(1);

        tracing::info!(
            results = listing.results.len(),
            provider = PROVIDER_NAME,
            "Trending movies fetched"
        );

        Ok(listing)
    }

    async fn get_movie_videos(&self, id: MovieId) -> AppResult<Vec<VideoRef>> {
        let raw: TmdbVideos = self.get_json(&format!("/movie/{}/videos", id), &[]).await?;
        Ok(raw.into())
    }

    async fn get_movie_details(&self, id: MovieId) -> AppResult<MovieDetails> {
        let raw: TmdbMovieDetails = self.get_json(&format!("/movie/{}", id), &[]).await?;
        raw.into_details().ok_or_else(|| {
            AppError::ExternalApi(format!("TMDB details for movie {} missing id or title", id))
        })
    }

    async fn get_movie_credits(&self, id: MovieId) -> AppResult<Credits> {
        let raw: TmdbCredits = self
            .get_json(&format!("/movie/{}/credits", id), &[])
            .await?;
        Ok(raw.into())
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
