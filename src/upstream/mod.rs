pub mod dto;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::Credential;
use crate::error::AppError;
use crate::retry::RetryPolicy;

pub use dto::Download;

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub credential: Credential,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>, credential: &Credential) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            credential: credential.clone(),
        }
    }

    pub fn query(mut self, pairs: &[(&str, String)]) -> Self {
        self.query
            .extend(pairs.iter().map(|(k, v)| (k.to_string(), v.clone())));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One round trip to the school API. Implementations return every response,
/// successful or not; status handling lives in [`ApiClient`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError>;
}

pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        let base_url = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .map_err(|e| AppError::Config(format!("Invalid API_BASE_URL {}: {}", base_url, e)))?;
        Ok(Self { client, base_url })
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url, AppError> {
        let mut url = self
            .base_url
            .join(request.path.trim_start_matches('/'))
            .map_err(|e| AppError::BadRequest(format!("Invalid path {}: {}", request.path, e)))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        let url = self.url_for(&request)?;
        let request_id = Uuid::new_v4().to_string();
        debug!("{} {} request_id={}", request.method, url.path(), request_id);

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header("Authorization", request.credential.bearer())
            .header("Accept", "application/json")
            .header("X-Request-Id", &request_id);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let header_text = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header_text("content-type");
        let content_disposition = header_text("content-disposition");

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?
            .to_vec();

        Ok(ApiResponse {
            status,
            content_type,
            content_disposition,
            body,
        })
    }
}

/// Authenticated JSON client for the school API.
///
/// Every call takes the caller's [`Credential`] explicitly. GETs are retried
/// under the configured [`RetryPolicy`]; mutations are sent exactly once.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let request = ApiRequest::new(Method::GET, path, credential).query(query);
        let response = self.execute_with_retry(request).await?;
        Ok(dto::decode(&response.body)?)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        credential: &Credential,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        self.send_json(Method::POST, credential, path, body).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        credential: &Credential,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        self.send_json(Method::PUT, credential, path, body).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        credential: &Credential,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        self.send_json(Method::PATCH, credential, path, body).await
    }

    pub async fn delete(&self, credential: &Credential, path: &str) -> Result<(), AppError> {
        let request = ApiRequest::new(Method::DELETE, path, credential);
        self.execute(request).await?;
        Ok(())
    }

    /// Fetches a binary export. The filename comes from `Content-Disposition`
    /// when present, otherwise `fallback_name`.
    pub async fn download(
        &self,
        credential: &Credential,
        path: &str,
        query: &[(&str, String)],
        fallback_name: &str,
    ) -> Result<Download, AppError> {
        let request = ApiRequest::new(Method::GET, path, credential).query(query);
        let response = self.execute_with_retry(request).await?;

        let filename = response
            .content_disposition
            .as_deref()
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| fallback_name.to_string());
        let content_type = response
            .content_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());

        Ok(Download {
            filename,
            content_type,
            bytes: response.body,
        })
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        credential: &Credential,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let request = ApiRequest::new(method, path, credential).json(serde_json::to_value(body)?);
        let response = self.execute(request).await?;
        if response.body.is_empty() {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }
        Ok(dto::decode(&response.body)?)
    }

    async fn execute_with_retry(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        let mut attempt = 0;
        loop {
            match self.execute(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay(attempt);
                    warn!(
                        "GET {} failed (attempt {}): {}; retrying in {:?}",
                        request.path,
                        attempt + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        let method = request.method.clone();
        let path = request.path.clone();
        let response = self.transport.send(request).await?;
        info!("{} {} -> {}", method, path, response.status);

        if response.is_success() {
            Ok(response)
        } else {
            Err(error_from_response(&response))
        }
    }
}

/// Maps a non-2xx response onto the error taxonomy. A 4xx carrying a
/// `message` is a business-rule rejection and keeps the server's wording.
pub fn error_from_response(response: &ApiResponse) -> AppError {
    let message = serde_json::from_slice::<dto::ErrorBody>(&response.body)
        .ok()
        .and_then(|b| b.message_text());

    match response.status {
        401 => AppError::Unauthorized,
        404 => AppError::NotFound,
        400..=499 if message.is_some() && response.status != 429 => {
            AppError::Rejected(message.unwrap_or_default())
        }
        status => AppError::Upstream {
            status,
            message: message.unwrap_or_else(|| {
                String::from_utf8_lossy(&response.body).chars().take(200).collect()
            }),
        },
    }
}

/// Builds an upstream path from raw segments, percent-encoding each one so an
/// id can never add segments, a query or a fragment. Empty, `.` and `..`
/// segments are rejected.
pub fn path_for(segments: &[&str]) -> Result<String, AppError> {
    if let Some(bad) = segments
        .iter()
        .find(|s| s.is_empty() || **s == "." || **s == "..")
    {
        return Err(AppError::BadRequest(format!("Invalid id: {:?}", bad)));
    }

    let mut url = Url::parse("http://upstream.invalid/")
        .map_err(|e| AppError::Config(format!("Failed to build path: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| AppError::Config("Failed to build path".to_string()))?
        .clear()
        .extend(segments);
    Ok(url.path().to_string())
}

fn filename_from_disposition(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}
