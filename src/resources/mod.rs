//! Cached access to each upstream entity collection.
//!
//! Queries are keyed by resource name, parameters and credential; every
//! mutation invalidates the resources it can affect so the next read refetches.

pub mod classes;
pub mod courses;
pub mod exports;
pub mod profile;
pub mod schedules;
pub mod students;
pub mod teachers;
pub mod wallets;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::Credential;
use crate::cache::{QueryCache, QueryKey};
use crate::error::AppError;
use crate::upstream::ApiClient;

pub use exports::ExportKind;

#[derive(Clone)]
pub struct Resources {
    api: ApiClient,
    cache: QueryCache,
}

impl Resources {
    pub fn new(api: ApiClient, cache: QueryCache) -> Self {
        Self { api, cache }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    async fn cached_get<T>(
        &self,
        resource: &'static str,
        credential: &Credential,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
    {
        // Pairs are serialized as JSON so values containing `&` or `=` stay distinct.
        let params = serde_json::to_string(&(path, query))?;
        let key = QueryKey::new(resource, params, credential);
        self.cache
            .get_or_fetch(key, || self.api.get(credential, path, query))
            .await
    }

    async fn invalidate(&self, resources: &[&str]) {
        for resource in resources {
            let dropped = self.cache.invalidate_resource(resource).await;
            if dropped > 0 {
                tracing::debug!("invalidated {} cached {} queries", dropped, resource);
            }
        }
    }
}
