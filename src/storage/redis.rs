use std::time::Duration;

use ::redis::{Client, Commands, Connection};

use crate::error::AppResult;
use crate::storage::KeyValueStorage;

const KEY_NAMESPACE: &str = "movie-scout";

/// Bound on connecting and on each command
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Creates a Redis client for the favorites slot
pub fn create_redis_client(redis_url: &str) -> AppResult<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Storage backed by a Redis server, keys namespaced as `movie-scout:{key}`
#[derive(Clone)]
pub struct RedisStorage {
    redis_client: Client,
    timeout: Duration,
}

impl RedisStorage {
    pub fn new(redis_client: Client) -> Self {
        Self {
            redis_client,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn open(redis_url: &str) -> AppResult<Self> {
        Ok(Self::new(create_redis_client(redis_url)?))
    }

    fn namespaced(key: &str) -> String {
        format!("{}:{}", KEY_NAMESPACE, key)
    }

    fn connection(&self) -> AppResult<Connection> {
        let conn = self.redis_client.get_connection_with_timeout(self.timeout)?;
        conn.set_read_timeout(Some(self.timeout))?;
        conn.set_write_timeout(Some(self.timeout))?;
        Ok(conn)
    }
}

impl KeyValueStorage for RedisStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.connection()?;
        let value: Option<String> = conn.get(Self::namespaced(key))?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut conn = self.connection()?;
        let _: () = conn.set(Self::namespaced(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let mut conn = self.connection()?;
        let _: () = conn.del(Self::namespaced(key))?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
