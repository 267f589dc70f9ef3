mod common;

use std::time::Duration;

use edudash::auth::Credential;
use edudash::cache::QueryCache;
use edudash::models::{ClassType, NewClassRequest, ScheduleQuery, WalletPeriod, WalletType};
use edudash::resources::Resources;
use edudash::upstream::ApiClient;
use serde_json::json;

use common::{ScriptedTransport, class, fast_retry, teacher};

fn resources(transport: std::sync::Arc<ScriptedTransport>, ttl: Duration) -> Resources {
    Resources::new(ApiClient::new(transport, fast_retry()), QueryCache::new(ttl))
}

#[tokio::test]
async fn test_queries_are_served_from_cache_within_ttl() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/teachers", 200, json!([teacher("t1", "Cô Lan", &[0, 1])]));
    let resources = resources(transport.clone(), Duration::from_secs(60));
    let credential = Credential::new("abc");

    let first = resources.list_teachers(&credential).await.unwrap();
    let second = resources.list_teachers(&credential).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].busy_schedule, vec![0, 1]);
    assert_eq!(transport.calls("GET", "/teachers"), 1);
}

#[tokio::test]
async fn test_expired_entries_are_refetched() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/teachers", 200, json!([]));
    let resources = resources(transport.clone(), Duration::from_millis(20));
    let credential = Credential::new("abc");

    resources.list_teachers(&credential).await.unwrap();
    tokio::time::sleep(Duration::from_millis(40)).await;
    resources.list_teachers(&credential).await.unwrap();

    assert_eq!(transport.calls("GET", "/teachers"), 2);
}

#[tokio::test]
async fn test_cache_is_scoped_per_credential() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/teachers", 200, json!([]));
    let resources = resources(transport.clone(), Duration::from_secs(60));

    resources.list_teachers(&Credential::new("alice")).await.unwrap();
    resources.list_teachers(&Credential::new("bob")).await.unwrap();

    assert_eq!(transport.calls("GET", "/teachers"), 2);
}

#[tokio::test]
async fn test_mutation_invalidates_the_resource() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/classes", 200, json!([class("c1", "IELTS", "speaking", None)]));
    transport.on("POST", "/classes", 200, class("c2", "TOEIC", "listening", None));
    let resources = resources(transport.clone(), Duration::from_secs(60));
    let credential = Credential::new("abc");

    resources.list_classes(&credential).await.unwrap();
    resources.list_classes(&credential).await.unwrap();
    assert_eq!(transport.calls("GET", "/classes"), 1);

    let created = resources
        .create_class(
            &credential,
            &NewClassRequest {
                name: "TOEIC".to_string(),
                lessons_per_week: 2,
                class_type: Some(ClassType::Listening),
                teacher_id: None,
                auto_schedule: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(created.id, "c2");

    resources.list_classes(&credential).await.unwrap();
    assert_eq!(transport.calls("GET", "/classes"), 2);
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let transport = ScriptedTransport::new();
    transport
        .on("GET", "/courses", 400, json!({ "message": "bad filter" }))
        .on("GET", "/courses", 200, json!([]));
    let resources = resources(transport.clone(), Duration::from_secs(60));
    let credential = Credential::new("abc");

    assert!(resources.list_courses(&credential).await.is_err());
    assert!(resources.list_courses(&credential).await.unwrap().is_empty());
    assert_eq!(transport.calls("GET", "/courses"), 2);
}

#[tokio::test]
async fn test_concurrent_reads_share_one_request() {
    let transport = ScriptedTransport::new();
    transport.on("GET", "/students", 200, json!([]));
    let resources = resources(transport.clone(), Duration::from_secs(60));
    let credential = Credential::new("abc");

    let (a, b, c) = tokio::join!(
        resources.list_students(&credential),
        resources.list_students(&credential),
        resources.list_students(&credential),
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(transport.calls("GET", "/students"), 1);
}

#[tokio::test]
async fn test_wallet_summary_passes_period_and_decodes_types() {
    let transport = ScriptedTransport::new();
    transport.on(
        "GET",
        "/wallets/delta-summary",
        200,
        json!({
            "v1": { "opening": 100, "closing": 150, "in": 80, "out": 30 },
            "v7": { "opening": 0, "closing": 0, "in": 0, "out": 0 },
        }),
    );
    let resources = resources(transport.clone(), Duration::from_secs(60));

    let period = WalletPeriod {
        from: chrono::NaiveDate::from_ymd_opt(2024, 9, 1),
        to: chrono::NaiveDate::from_ymd_opt(2024, 9, 30),
    };
    let summary = resources
        .wallet_delta_summary(&Credential::new("abc"), &period)
        .await
        .unwrap();

    assert_eq!(summary.len(), 2);
    assert_eq!(summary[&WalletType::V1].inflow, 80);

    let sent = &transport.requests()[0];
    assert!(sent.query.contains(&("from".to_string(), "2024-09-01".to_string())));
    assert!(sent.query.contains(&("to".to_string(), "2024-09-30".to_string())));
}

fn schedule_entry(class_id: &str) -> serde_json::Value {
    json!({
        "classId": class_id,
        "className": "IELTS 6.5",
        "teacherId": "t1",
        "teacherName": "Cô Lan",
        "lesson": 1,
        "slotTime": 0,
    })
}

#[tokio::test]
async fn test_query_values_containing_separators_are_cached_apart() {
    let transport = ScriptedTransport::new();
    transport
        .on("GET", "/schedules", 200, json!([schedule_entry("a&teacherId=b")]))
        .on("GET", "/schedules", 200, json!([schedule_entry("a")]));
    let resources = resources(transport.clone(), Duration::from_secs(60));
    let credential = Credential::new("abc");

    let embedded = ScheduleQuery {
        class_id: Some("a&teacherId=b".to_string()),
        teacher_id: None,
    };
    let split = ScheduleQuery {
        class_id: Some("a".to_string()),
        teacher_id: Some("b".to_string()),
    };

    let first = resources.list_schedules(&credential, &embedded).await.unwrap();
    let second = resources.list_schedules(&credential, &split).await.unwrap();

    assert_eq!(first[0].class_id, "a&teacherId=b");
    assert_eq!(second[0].class_id, "a");
    assert_eq!(transport.calls("GET", "/schedules"), 2);
}
