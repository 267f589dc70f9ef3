use std::sync::Arc;

use crate::cache::QueryCache;
use crate::config::AppConfig;
use crate::resources::Resources;
use crate::upstream::{ApiClient, Transport};

#[derive(Clone)]
pub struct AppState {
    pub resources: Resources,
}

impl AppState {
    pub fn new(transport: Arc<dyn Transport>, config: &AppConfig) -> Self {
        let api = ApiClient::new(transport, config.retry);
        let cache = QueryCache::new(config.cache_ttl);
        Self {
            resources: Resources::new(api, cache),
        }
    }
}
