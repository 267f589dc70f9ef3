use std::time::Duration;

use tracing::{debug, info};

use crate::cache::QueryCache;

/// Periodically drops expired query cache entries.
pub struct CacheSweeper {
    cache: QueryCache,
    interval: Duration,
}

impl CacheSweeper {
    pub fn new(cache: QueryCache, interval_secs: u64) -> Self {
        Self {
            cache,
            interval: Duration::from_secs(interval_secs.max(1)),
        }
    }

    /// Sweeps forever; spawn it as a background task and abort to stop.
    pub async fn start(self) {
        info!("Starting cache sweeper (interval: {:?}, ttl: {:?})", self.interval, self.cache.ttl());

        loop {
            tokio::time::sleep(self.interval).await;
            self.sweep_once().await;
        }
    }

    pub async fn sweep_once(&self) -> usize {
        let evicted = self.cache.evict_expired().await;
        if evicted > 0 {
            info!("Cache sweep evicted {} expired entries", evicted);
        } else {
            debug!(
                "Cache sweep found nothing to evict ({} fetches pending)",
                self.cache.pending_fetches().await
            );
        }
        evicted
    }
}
