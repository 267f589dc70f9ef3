use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::auth::Credential;
use crate::error::AppError;

/// Identity of a cached query: resource name plus its parameters, scoped to the
/// credential that fetched it so users never see each other's data.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    resource: &'static str,
    params: String,
    scope: String,
}

impl QueryKey {
    pub fn new(resource: &'static str, params: impl Into<String>, credential: &Credential) -> Self {
        Self {
            resource,
            params: params.into(),
            scope: credential.token().to_string(),
        }
    }
}

impl fmt::Debug for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.resource, self.params)
    }
}

struct Entry {
    value: serde_json::Value,
    stored_at: Instant,
}

/// TTL cache of upstream query results.
///
/// Values are stored as JSON so one cache serves every resource type. Concurrent
/// misses on the same key wait on a per-key lock so only one upstream request
/// is issued.
#[derive(Clone)]
pub struct QueryCache {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<QueryKey, Entry>>>,
    inflight: Arc<Mutex<HashMap<QueryKey, Arc<Mutex<()>>>>>,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
            inflight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() >= self.ttl {
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    pub async fn put<T: Serialize>(&self, key: QueryKey, value: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(value)?;
        self.entries.write().await.insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
        Ok(())
    }

    /// Returns the cached value for `key`, or runs `fetch` and caches its result.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        if let Some(hit) = self.get(&key).await {
            debug!("cache hit {:?}", key);
            return Ok(hit);
        }

        let lock = {
            let mut inflight = self.inflight.lock().await;
            inflight.entry(key.clone()).or_default().clone()
        };
        let _guard = lock.lock().await;

        // Another task may have filled the entry while we waited.
        if let Some(hit) = self.get(&key).await {
            debug!("cache hit after wait {:?}", key);
            return Ok(hit);
        }

        debug!("cache miss {:?}", key);
        let result = fetch().await;
        let stored = match &result {
            Ok(value) => self.put(key.clone(), value).await,
            Err(_) => Ok(()),
        };

        self.inflight.lock().await.remove(&key);
        stored?;
        result
    }

    /// Drops every entry belonging to `resource`, across all parameters and users.
    pub async fn invalidate_resource(&self, resource: &str) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| key.resource != resource);
        before - entries.len()
    }

    /// Drops entries older than the TTL. Returns how many were removed.
    ///
    /// Also forgets fetch locks nobody holds any more, which a cancelled
    /// caller leaves behind.
    pub async fn evict_expired(&self) -> usize {
        self.inflight
            .lock()
            .await
            .retain(|_, lock| Arc::strong_count(lock) > 1);

        let ttl = self.ttl;
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        before - entries.len()
    }

    /// Number of keys with a fetch currently in progress.
    pub async fn pending_fetches(&self) -> usize {
        self.inflight.lock().await.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
