//! Favorites list with write-through persistence.
//!
//! The full list is serialized to a single storage slot after every change.
//! If that write fails the in-memory change is rolled back, so memory always
//! equals what was last persisted, and the error is returned to the caller.

use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::{
    error::{AppError, AppResult},
    models::{MovieId, MovieSummary},
    storage::KeyValueStorage,
};

/// Storage slot holding the JSON array of favorites
pub const FAVORITES_KEY: &str = "movie-favorites";

const EVENT_CAPACITY: usize = 32;

/// Change notification shown to the user as a toast
#[derive(Debug, Clone, PartialEq)]
pub enum FavoriteEvent {
    Added { id: MovieId, title: String },
    Removed { id: MovieId, title: String },
}

impl Display for FavoriteEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FavoriteEvent::Added { title, .. } => write!(f, "{} added", title),
            FavoriteEvent::Removed { title, .. } => write!(f, "{} removed", title),
        }
    }
}

pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStorage>,
    favorites: Vec<MovieSummary>,
    events: broadcast::Sender<FavoriteEvent>,
}

impl FavoritesStore {
    /// Loads the persisted list. Never fails: a missing, unreadable or
    /// malformed slot yields an empty list.
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let favorites = Self::read_slot(storage.as_ref());
        tracing::info!(
            count = favorites.len(),
            backend = storage.name(),
            "Favorites loaded"
        );

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            storage,
            favorites,
            events,
        }
    }

    fn read_slot(storage: &dyn KeyValueStorage) -> Vec<MovieSummary> {
        let stored = match storage.get(FAVORITES_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read favorites, starting empty");
                return Vec::new();
            }
        };

        let parsed: Vec<MovieSummary> = match serde_json::from_str(&stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Stored favorites are malformed, starting empty");
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        parsed
            .into_iter()
            .filter(|movie| seen.insert(movie.id))
            .collect()
    }

    pub fn favorites(&self) -> &[MovieSummary] {
        &self.favorites
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    pub fn is_favorite(&self, id: MovieId) -> bool {
        self.favorites.iter().any(|movie| movie.id == id)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FavoriteEvent> {
        self.events.subscribe()
    }

    /// Appends `movie` unless its id is already present.
    /// Returns whether the list changed.
    pub fn add(&mut self, movie: MovieSummary) -> AppResult<bool> {
        if self.is_favorite(movie.id) {
            return Ok(false);
        }

        let event = FavoriteEvent::Added {
            id: movie.id,
            title: movie.title.clone(),
        };
        self.favorites.push(movie);

        if let Err(e) = self.persist() {
            self.favorites.pop();
            return Err(e);
        }

        self.notify(event);
        Ok(true)
    }

    /// Removes the entry with `id`, if any. Returns whether the list changed.
    pub fn remove(&mut self, id: MovieId) -> AppResult<bool> {
        let Some(index) = self.favorites.iter().position(|movie| movie.id == id) else {
            return Ok(false);
        };

        let removed = self.favorites.remove(index);
        if let Err(e) = self.persist() {
            self.favorites.insert(index, removed);
            return Err(e);
        }

        self.notify(FavoriteEvent::Removed {
            id,
            title: removed.title,
        });
        Ok(true)
    }

    /// Removes `movie` if present, adds it otherwise.
    /// Returns whether it is a favorite afterwards.
    pub fn toggle(&mut self, movie: MovieSummary) -> AppResult<bool> {
        if self.is_favorite(movie.id) {
            self.remove(movie.id)?;
            Ok(false)
        } else {
            self.add(movie)?;
            Ok(true)
        }
    }

    fn persist(&self) -> AppResult<()> {
        let json = serde_json::to_string(&self.favorites)?;
        self.storage.set(FAVORITES_KEY, &json).map_err(|e| {
            tracing::error!(error = %e, backend = self.storage.name(), "Failed to persist favorites");
            AppError::Storage(format!("could not save favorites: {}", e))
        })
    }

    fn notify(&self, event: FavoriteEvent) {
        tracing::info!(notification = %event, count = self.favorites.len(), "Favorites changed");
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
