mod common;

use std::time::Instant;

use edudash::auth::Credential;
use edudash::error::AppError;
use edudash::models::{Course, NewCourseRequest};
use edudash::retry::RetryPolicy;
use edudash::upstream::{ApiClient, ApiResponse};
use serde_json::json;

use common::{ScriptedTransport, fast_retry, json_response};

fn credential() -> Credential {
    Credential::new("token-123")
}

fn course_json(id: &str) -> serde_json::Value {
    json!({ "id": id, "name": "IELTS 6.5", "totalLessons": 24, "price": 4500000 })
}

#[tokio::test]
async fn test_bearer_token_is_attached_to_every_call() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/courses", 200, json!([course_json("k1")]));
    let client = ApiClient::new(transport.clone(), fast_retry());

    let courses: Vec<Course> = client.get(&credential(), "/courses", &[]).await.unwrap();
    assert_eq!(courses.len(), 1);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].credential.bearer(), "Bearer token-123");
}

#[tokio::test]
async fn test_wrapped_and_bare_bodies_decode_the_same() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/courses/k1", 200, json!({ "data": course_json("k1") }));
    transport.on("GET", "/courses/k2", 200, course_json("k2"));
    let client = ApiClient::new(transport.clone(), fast_retry());

    let wrapped: Course = client.get(&credential(), "/courses/k1", &[]).await.unwrap();
    let bare: Course = client.get(&credential(), "/courses/k2", &[]).await.unwrap();
    assert_eq!(wrapped.id, "k1");
    assert_eq!(bare.id, "k2");
    assert_eq!(wrapped.total_lessons, 24);
}

#[tokio::test]
async fn test_get_retries_server_errors_then_succeeds() {
    let transport = ScriptedTransport::new();
    transport
        .on("GET", "/courses", 503, json!({}))
        .on("GET", "/courses", 503, json!({}))
        .on("GET", "/courses", 503, json!({}))
        .on("GET", "/courses", 200, json!([]));
    let client = ApiClient::new(transport.clone(), fast_retry());

    let courses: Vec<Course> = client.get(&credential(), "/courses", &[]).await.unwrap();
    assert!(courses.is_empty());
    assert_eq!(transport.calls("GET", "/courses"), 4);
}

#[tokio::test]
async fn test_get_gives_up_after_max_retries() {
    let transport = ScriptedTransport::new();
    transport.on_transport_error("GET", "/courses");
    let client = ApiClient::new(transport.clone(), fast_retry());

    let result: Result<Vec<Course>, AppError> = client.get(&credential(), "/courses", &[]).await;
    assert!(matches!(result, Err(AppError::Transport(_))));
    assert_eq!(transport.calls("GET", "/courses"), 4);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/courses/missing", 404, json!({ "message": "Course not found" }));
    let client = ApiClient::new(transport.clone(), fast_retry());

    let result: Result<Course, AppError> = client.get(&credential(), "/courses/missing", &[]).await;
    assert!(matches!(result, Err(AppError::NotFound)));
    assert_eq!(transport.calls("GET", "/courses/missing"), 1);
}

#[tokio::test]
async fn test_mutations_are_sent_once() {
    let transport = ScriptedTransport::new();
    transport.on("POST", "/courses", 500, json!({}));
    let client = ApiClient::new(transport.clone(), fast_retry());

    let req = NewCourseRequest {
        name: "TOEIC".to_string(),
        description: None,
        total_lessons: 20,
        price: 3_000_000,
    };
    let result: Result<Course, AppError> = client.post(&credential(), "/courses", &req).await;

    assert!(matches!(result, Err(AppError::Upstream { status: 500, .. })));
    assert_eq!(transport.calls("POST", "/courses"), 1);

    let sent = &transport.requests()[0];
    assert_eq!(sent.body.as_ref().unwrap()["totalLessons"], json!(20));
}

#[tokio::test]
async fn test_business_rejection_keeps_server_message() {
    let transport = ScriptedTransport::new();
    transport.on("POST", "/students", 409, json!({ "message": "Tên đăng nhập đã tồn tại" }));
    transport.on("POST", "/teachers", 400, json!({ "message": ["name must not be empty", "email must be an email"] }));
    transport.on("POST", "/classes", 400, json!({ "error": "Bad Request" }));
    let client = ApiClient::new(transport.clone(), fast_retry());

    let err = client
        .post::<_, serde_json::Value>(&credential(), "/students", &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(&err, AppError::Rejected(_)));
    assert_eq!(err.user_message(), "Tên đăng nhập đã tồn tại");

    let err = client
        .post::<_, serde_json::Value>(&credential(), "/teachers", &json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "name must not be empty; email must be an email");

    let err = client
        .post::<_, serde_json::Value>(&credential(), "/classes", &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Upstream { status: 400, .. }));
    assert_eq!(err.user_message(), edudash::error::GENERIC_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_unauthorized_maps_to_its_own_variant() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/auth/me", 401, json!({ "message": "jwt expired" }));
    let client = ApiClient::new(transport.clone(), fast_retry());

    let result: Result<serde_json::Value, AppError> = client.get(&credential(), "/auth/me", &[]).await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let transport = ScriptedTransport::new();
    transport.on_raw(
        "DELETE",
        "/courses/k1",
        ApiResponse {
            status: 204,
            ..ApiResponse::default()
        },
    );
    let client = ApiClient::new(transport.clone(), fast_retry());

    client.delete(&credential(), "/courses/k1").await.unwrap();
}

#[tokio::test]
async fn test_download_uses_content_disposition_name() {
    let transport = ScriptedTransport::new();
    transport.on_raw(
        "GET",
        "/exports/students",
        ApiResponse {
            status: 200,
            content_type: Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string()),
            content_disposition: Some("attachment; filename=\"hoc-vien.xlsx\"".to_string()),
            body: vec![0x50, 0x4b, 0x03, 0x04],
        },
    );
    transport.on_raw(
        "GET",
        "/exports/wallets",
        ApiResponse {
            status: 200,
            content_type: None,
            content_disposition: None,
            body: vec![1, 2, 3],
        },
    );
    let client = ApiClient::new(transport.clone(), fast_retry());

    let named = client
        .download(&credential(), "/exports/students", &[], "fallback.xlsx")
        .await
        .unwrap();
    assert_eq!(named.filename, "hoc-vien.xlsx");
    assert_eq!(named.bytes, vec![0x50, 0x4b, 0x03, 0x04]);

    let unnamed = client
        .download(&credential(), "/exports/wallets", &[], "wallets.pdf")
        .await
        .unwrap();
    assert_eq!(unnamed.filename, "wallets.pdf");
    assert_eq!(unnamed.content_type, "application/octet-stream");
}

#[tokio::test]
async fn test_retry_waits_between_attempts() {
    let transport = ScriptedTransport::new();
    transport
        .on("GET", "/courses", 502, json!({}))
        .on("GET", "/courses", 200, json!([]));
    let policy = RetryPolicy {
        max_retries: 3,
        base_delay: std::time::Duration::from_millis(40),
        max_delay: std::time::Duration::from_millis(40),
    };
    let client = ApiClient::new(transport.clone(), policy);

    let started = Instant::now();
    let _: Vec<Course> = client.get(&credential(), "/courses", &[]).await.unwrap();
    assert!(started.elapsed() >= std::time::Duration::from_millis(40));
    assert_eq!(transport.calls("GET", "/courses"), 2);
}

#[test]
fn test_json_response_helper_is_success() {
    assert!(json_response(204, &json!(null)).is_success());
    assert!(!json_response(302, &json!(null)).is_success());
}
