//! Debounced, paginated movie search.
//!
//! `SearchSession` turns raw query edits into a result list that grows page by
//! page. State lives in a `watch` channel so a front end can re-render on
//! every change, and so spawned fetch tasks can write results back.
//!
//! Every fetch carries a ticket (generation, page). The generation is bumped
//! on each query change; a response is applied only if its ticket still
//! matches the current state, so a superseded query can never leak results
//! into a newer one regardless of the order the network resolves in.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{
    error::AppError,
    models::{MovieSummary, SearchPage},
    services::{debounce::Debouncer, providers::MovieProvider},
};

/// Default quiescence window between the last keystroke and the search
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    /// Waiting for the query to stay unchanged for the debounce window
    Debouncing,
    Fetching { page: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub query: String,
    /// Page cursor, starts at 1
    pub page: u32,
    /// Accumulated results in page arrival order, unique by id
    pub results: Vec<MovieSummary>,
    pub has_more: bool,
    pub phase: SearchPhase,
    /// Request token, bumped on every query change
    pub generation: u64,
    pub last_error: Option<String>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            results: Vec::new(),
            has_more: true,
            phase: SearchPhase::Idle,
            generation: 0,
            last_error: None,
        }
    }
}

impl SearchState {
    pub fn in_flight(&self) -> bool {
        matches!(self.phase, SearchPhase::Fetching { .. })
    }

    pub fn is_idle(&self) -> bool {
        self.phase == SearchPhase::Idle
    }

    fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Starts a new query lifetime
    fn reset(&mut self, query: String) {
        self.generation += 1;
        self.query = query;
        self.page = 1;
        self.results.clear();
        self.has_more = true;
        self.last_error = None;
        self.phase = if self.has_query() {
            SearchPhase::Debouncing
        } else {
            SearchPhase::Idle
        };
    }

    fn ticket(&self) -> FetchTicket {
        FetchTicket {
            generation: self.generation,
            query: self.query.clone(),
            page: self.page,
        }
    }

    fn apply_page(&mut self, page: u32, response: SearchPage) {
        let has_more = response.declares_more();
        if page == 1 {
            self.results.clear();
        }
        merge_unique(&mut self.results, response.results);
        self.has_more = has_more;
        self.last_error = None;
        self.phase = SearchPhase::Idle;
    }

    fn apply_failure(&mut self, error: &AppError) {
        self.results.clear();
        self.has_more = false;
        self.last_error = Some(error.to_string());
        self.phase = SearchPhase::Idle;
    }
}

/// Appends `incoming` to `held`, skipping ids already present
pub fn merge_unique(held: &mut Vec<MovieSummary>, incoming: Vec<MovieSummary>) {
    let mut seen: HashSet<_> = held.iter().map(|movie| movie.id).collect();
    held.extend(incoming.into_iter().filter(|movie| seen.insert(movie.id)));
}

/// Identifies which query lifetime and page a fetch was issued for
#[derive(Debug, Clone)]
struct FetchTicket {
    generation: u64,
    query: String,
    page: u32,
}

impl FetchTicket {
    fn is_current(&self, state: &SearchState) -> bool {
        state.generation == self.generation && state.page == self.page
    }
}

pub struct SearchSession {
    provider: Arc<dyn MovieProvider>,
    state: Arc<watch::Sender<SearchState>>,
    debouncer: Debouncer,
    fetch_task: Option<JoinHandle<()>>,
}

impl SearchSession {
    pub fn new(provider: Arc<dyn MovieProvider>, debounce: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            provider,
            state: Arc::new(state),
            debouncer: Debouncer::new(debounce),
            fetch_task: None,
        }
    }

    pub fn snapshot(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Records a new query. State is reset synchronously; the fetch for page 1
    /// happens once the query has been stable for the debounce window. A blank
    /// query clears results and issues nothing. The unchanged query is ignored
    /// unless its last fetch failed.
    pub fn set_query(&mut self, text: impl Into<String>) {
        let query = text.into();
        {
            // Re-entering the query after a failure searches again
            let state = self.state.borrow();
            if state.query == query && state.last_error.is_none() {
                return;
            }
        }

        self.cancel_pending();

        let mut ticket = None;
        self.state.send_modify(|state| {
            state.reset(query);
            if state.has_query() {
                ticket = Some(state.ticket());
            }
        });

        if let Some(ticket) = ticket {
            tracing::debug!(
                query = %ticket.query,
                generation = ticket.generation,
                "Search query changed, debouncing"
            );
            let fetch = run_fetch(self.provider.clone(), self.state.clone(), ticket);
            self.debouncer.schedule(fetch);
        }
    }

    /// Requests the next page for the current query, bypassing the debounce.
    ///
    /// Returns `false` without doing anything while a fetch is in flight or a
    /// query is still debouncing, when no more pages exist, or when there is
    /// no query.
    pub fn load_next_page(&mut self) -> bool {
        let mut ticket = None;
        self.state.send_if_modified(|state| {
            if !state.is_idle() || !state.has_more || !state.has_query() {
                return false;
            }
            state.page += 1;
            state.phase = SearchPhase::Fetching { page: state.page };
            ticket = Some(state.ticket());
            true
        });

        match ticket {
            Some(ticket) => {
                tracing::debug!(query = %ticket.query, page = ticket.page, "Loading next search page");
                self.spawn_fetch(ticket);
                true
            }
            None => false,
        }
    }

    /// Re-runs the current query from page 1 immediately. Used after a failure.
    pub fn retry(&mut self) -> bool {
        {
            let state = self.state.borrow();
            if !state.has_query() || state.in_flight() {
                return false;
            }
        }

        self.cancel_pending();

        let mut ticket = None;
        self.state.send_modify(|state| {
            let query = std::mem::take(&mut state.query);
            state.reset(query);
            state.phase = SearchPhase::Fetching { page: 1 };
            ticket = Some(state.ticket());
        });

        match ticket {
            Some(ticket) => {
                self.spawn_fetch(ticket);
                true
            }
            None => false,
        }
    }

    fn spawn_fetch(&mut self, ticket: FetchTicket) {
        let fetch = run_fetch(self.provider.clone(), self.state.clone(), ticket);
        self.fetch_task = Some(tokio::spawn(fetch));
    }

    fn cancel_pending(&mut self) {
        self.debouncer.cancel();
        if let Some(task) = self.fetch_task.take() {
            task.abort();
        }
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Fetches the page named by `ticket` and applies it if still current
async fn run_fetch(
    provider: Arc<dyn MovieProvider>,
    state: Arc<watch::Sender<SearchState>>,
    ticket: FetchTicket,
) {
    let mut still_current = false;
    state.send_if_modified(|current| {
        if !ticket.is_current(current) {
            return false;
        }
        still_current = true;
        let fetching = SearchPhase::Fetching { page: ticket.page };
        if current.phase == fetching {
            return false;
        }
        current.phase = fetching;
        true
    });
    if !still_current {
        return;
    }

    let outcome = provider.search_movies(&ticket.query, ticket.page).await;

    state.send_if_modified(|current| {
        if !ticket.is_current(current) {
            tracing::debug!(
                query = %ticket.query,
                page = ticket.page,
                generation = ticket.generation,
                current_generation = current.generation,
                "Discarding stale search response"
            );
            return false;
        }

        match outcome {
            Ok(response) => {
                current.apply_page(ticket.page, response);
                tracing::info!(
                    query = %ticket.query,
                    page = ticket.page,
                    results = current.results.len(),
                    has_more = current.has_more,
                    provider = provider.name(),
                    "Search page applied"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    query = %ticket.query,
                    page = ticket.page,
                    "Search fetch failed"
                );
                current.apply_failure(&e);
            }
        }
        true
    });
}
