//! Key-value persistence port.
//!
//! The favorites list lives in a single named slot. The store only needs
//! get/set/remove on string values, so the medium behind it is swappable: a
//! directory of JSON files, a Redis server, or an in-process map.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::{Config, FavoritesBackend};
use crate::error::{AppError, AppResult};

pub mod file;
pub mod redis;

pub use self::file::FileStorage;
pub use self::redis::RedisStorage;

/// Synchronous string key-value storage
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStorage: Send + Sync {
    /// Returns `None` when the key has never been written
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Replaces the whole value stored under `key`
    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    fn remove(&self, key: &str) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// In-process storage. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage with one slot already written
    pub fn with_slot(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut slots) = storage.slots.lock() {
            slots.insert(key.to_string(), value.to_string());
        }
        storage
    }

    fn slots(&self) -> AppResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| AppError::Internal("memory storage lock poisoned".to_string()))
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.slots()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.slots()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.slots()?.remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Opens the storage backend selected by the configuration
pub fn open(config: &Config) -> AppResult<Arc<dyn KeyValueStorage>> {
    let storage: Arc<dyn KeyValueStorage> = match config.favorites_backend {
        FavoritesBackend::File => Arc::new(FileStorage::new(config.favorites_dir.clone())),
        FavoritesBackend::Redis => Arc::new(
            RedisStorage::open(&config.redis_url)?.with_timeout(config.redis_timeout()),
        ),
        FavoritesBackend::Memory => Arc::new(MemoryStorage::new()),
    };

    tracing::info!(backend = storage.name(), "Favorites storage opened");
    Ok(storage)
}
