#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use movie_scout::{
    error::{AppError, AppResult},
    models::{Credits, ListingPage, MovieDetails, MovieId, MovieSummary, SearchPage, VideoRef},
    services::MovieProvider,
};
use tokio::sync::oneshot;

type PageKey = (String, u32);

/// Provider with scripted search pages. A page can be gated so its response
/// is held back until the test releases it.
#[derive(Default)]
pub struct FakeProvider {
    pages: Mutex<HashMap<PageKey, SearchPage>>,
    gates: Mutex<HashMap<PageKey, oneshot::Receiver<()>>>,
    calls: Mutex<Vec<PageKey>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, query: &str, page: u32, ids: &[u64], total_pages: u32) -> Self {
        let results = ids
            .iter()
            .map(|id| MovieSummary::new(*id, format!("{} #{}", query, id)))
            .collect();
        self.pages.lock().unwrap().insert(
            (query.to_string(), page),
            SearchPage {
                results,
                page,
                total_pages,
            },
        );
        self
    }

    /// Holds the response for (query, page) until the returned sender fires
    pub fn gate(&self, query: &str, page: u32) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .insert((query.to_string(), page), rx);
        tx
    }

    pub fn calls(&self) -> Vec<PageKey> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MovieProvider for FakeProvider {
    async fn search_movies(&self, query: &str, page: u32) -> AppResult<SearchPage> {
        let key = (query.to_string(), page);
        self.calls.lock().unwrap().push(key.clone());

        let gate = self.gates.lock().unwrap().remove(&key);
        if let Some(gate) = gate {
            gate.await
                .map_err(|_| AppError::ExternalApi("gate dropped".to_string()))?;
        }

        let scripted = self.pages.lock().unwrap().get(&key).cloned();
        scripted.ok_or_else(|| {
            AppError::ExternalApi(format!("no page scripted for {:?} page {}", query, page))
        })
    }

    async fn get_upcoming(&self, page: u32) -> AppResult<ListingPage> {
        Ok(ListingPage {
            results: vec![],
            page,
            total_pages: page,
        })
    }

    async fn get_trending(&self) -> AppResult<ListingPage> {
        Ok(ListingPage::default())
    }

    async fn get_movie_videos(&self, _id: MovieId) -> AppResult<Vec<VideoRef>> {
        Ok(vec![])
    }

    async fn get_movie_details(&self, id: MovieId) -> AppResult<MovieDetails> {
        Err(AppError::NotFound(format!("movie {}", id)))
    }

    async fn get_movie_credits(&self, _id: MovieId) -> AppResult<Credits> {
        Ok(Credits::default())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Lets spawned tasks run without advancing the paused clock
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

pub fn ids(movies: &[MovieSummary]) -> Vec<u64> {
    movies.iter().map(|m| m.id.0).collect()
}
