use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;
use crate::retry::RetryPolicy;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub bind_addr: SocketAddr,
    pub cache_ttl: Duration,
    pub cache_sweep_interval_secs: u64,
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let api_base_url = env::var("API_BASE_URL")
            .map_err(|_| AppError::Config("API_BASE_URL is not set".to_string()))?;

        let bind_addr = env_or("BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000)))?;
        let cache_ttl_secs: u64 = env_or("CACHE_TTL_SECS", 300)?;
        let cache_sweep_interval_secs = env_or("CACHE_SWEEP_INTERVAL_SECS", 60)?;
        let max_retries = env_or("RETRY_MAX_ATTEMPTS", 3)?;
        let base_delay_ms: u64 = env_or("RETRY_BASE_DELAY_MS", 1000)?;
        let max_delay_ms: u64 = env_or("RETRY_MAX_DELAY_MS", 30_000)?;
        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30)?;

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            bind_addr,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            cache_sweep_interval_secs,
            retry: RetryPolicy {
                max_retries,
                base_delay: Duration::from_millis(base_delay_ms),
                max_delay: Duration::from_millis(max_delay_ms),
            },
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, raw))),
        Err(_) => Ok(default),
    }
}
