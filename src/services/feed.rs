use std::sync::Arc;

use crate::{
    models::MovieSummary,
    services::{providers::MovieProvider, search::merge_unique},
};

/// Movies trending this week. Any failure yields an empty list.
pub async fn load_trending(provider: &dyn MovieProvider) -> Vec<MovieSummary> {
    match provider.get_trending().await {
        Ok(listing) => listing.results,
        Err(e) => {
            tracing::warn!(error = %e, provider = provider.name(), "Failed to load trending movies");
            Vec::new()
        }
    }
}

/// The movie featured in the hero banner
pub fn spotlight(trending: &[MovieSummary]) -> Option<&MovieSummary> {
    trending.first()
}

/// "New Release" list of upcoming movies, loaded one page at a time
pub struct UpcomingFeed {
    provider: Arc<dyn MovieProvider>,
    movies: Vec<MovieSummary>,
    /// Last page successfully loaded, 0 before the first load
    page: u32,
    has_more: bool,
    last_error: Option<String>,
}

impl UpcomingFeed {
    pub fn new(provider: Arc<dyn MovieProvider>) -> Self {
        Self {
            provider,
            movies: Vec::new(),
            page: 0,
            has_more: true,
            last_error: None,
        }
    }

    pub fn movies(&self) -> &[MovieSummary] {
        &self.movies
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Fetches the next page and appends it. Returns whether a page was added.
    ///
    /// A failed fetch keeps what was already loaded and leaves the cursor in
    /// place, so calling again retries the same page.
    pub async fn load_next_page(&mut self) -> bool {
        if !self.has_more {
            return false;
        }

        let next = self.page + 1;
        match self.provider.get_upcoming(next).await {
            Ok(listing) => {
                self.has_more = listing.declares_more();
                self.page = next;
                self.last_error = None;
                merge_unique(&mut self.movies, listing.results);

                tracing::debug!(
                    page = next,
                    movies = self.movies.len(),
                    has_more = self.has_more,
                    "Upcoming page appended"
                );
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, page = next, "Failed to load upcoming movies");
                self.last_error = Some(e.to_string());
                false
            }
        }
    }
}
