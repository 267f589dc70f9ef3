#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use edudash::config::AppConfig;
use edudash::error::AppError;
use edudash::retry::RetryPolicy;
use edudash::state::AppState;
use edudash::upstream::{ApiRequest, ApiResponse, Transport};
use serde_json::Value;

/// In-memory stand-in for the school API.
///
/// Each `(method, path)` holds a queue of responses; the last one repeats.
/// Unscripted routes answer 404. Every request is recorded.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(String, String), VecDeque<Result<ApiResponse, String>>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.push(method, path, Ok(json_response(status, &body)))
    }

    pub fn on_raw(&self, method: &str, path: &str, response: ApiResponse) -> &Self {
        self.push(method, path, Ok(response))
    }

    pub fn on_transport_error(&self, method: &str, path: &str) -> &Self {
        self.push(method, path, Err("connection reset".to_string()))
    }

    fn push(&self, method: &str, path: &str, response: Result<ApiResponse, String>) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self, method: &str, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method.as_str() == method && r.path == path)
            .count()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        let key = (request.method.to_string(), request.path.clone());
        self.requests.lock().unwrap().push(request);

        let mut routes = self.routes.lock().unwrap();
        let next = match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(AppError::Transport(message)),
            None => Ok(json_response(404, &serde_json::json!({ "message": "not scripted" }))),
        }
    }
}

pub fn json_response(status: u16, body: &Value) -> ApiResponse {
    ApiResponse {
        status,
        content_type: Some("application/json".to_string()),
        content_disposition: None,
        body: serde_json::to_vec(body).unwrap(),
    }
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        api_base_url: "http://school.test/api".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        cache_ttl: Duration::from_secs(60),
        cache_sweep_interval_secs: 60,
        retry: fast_retry(),
        request_timeout: Duration::from_secs(5),
    }
}

pub fn test_state(transport: Arc<ScriptedTransport>) -> AppState {
    AppState::new(transport, &test_config())
}

pub fn profile(role: &str) -> Value {
    serde_json::json!({
        "id": "u1",
        "username": "admin01",
        "fullname": "Nguyễn Văn A",
        "role": role,
    })
}

pub fn teacher(id: &str, name: &str, busy: &[i64]) -> Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "email": format!("{}@school.test", id),
        "skills": ["speaking"],
        "busySchedule": busy,
    })
}

pub fn class(id: &str, name: &str, class_type: &str, teacher_name: Option<&str>) -> Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "studentCount": 12,
        "lessonsPerWeek": 2,
        "classType": class_type,
        "teacher": teacher_name.map(|n| serde_json::json!({ "id": format!("t-{}", n), "name": n })),
        "createdAt": "2024-09-01T08:00:00Z",
    })
}
