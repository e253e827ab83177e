mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::common::{PREFIX, TestApp};

fn statuses(groups: &Value) -> Vec<(String, String)> {
    groups
        .as_array()
        .expect("groups response is not an array")
        .iter()
        .map(|g| {
            (
                g.get("groupName")
                    .and_then(Value::as_str)
                    .expect("group misses groupName")
                    .to_string(),
                g.get("status")
                    .and_then(Value::as_str)
                    .expect("group misses status")
                    .to_string(),
            )
        })
        .collect()
}

#[tokio::test]
async fn every_group_is_listed_with_a_status() {
    let app = TestApp::seeded().await;

    let response = app.get(&format!("{PREFIX}/groups/alice")).await;
    assert_eq!(response.status, StatusCode::OK);

    let groups = response.json();
    assert_eq!(
        statuses(&groups),
        vec![
            ("FIN_DAILY".to_string(), "Unsubscribed".to_string()),
            ("RISK_WEEKLY".to_string(), "Unsubscribed".to_string()),
            ("OPS_MONTHLY".to_string(), "Unsubscribed".to_string()),
        ]
    );

    let first = &groups[0];
    assert_eq!(first.get("username").and_then(Value::as_str), Some("alice"));
    assert_eq!(
        first.get("description").and_then(Value::as_str),
        Some("Daily finance reports")
    );
    assert!(first.get("id").and_then(Value::as_i64).is_some());
}

#[tokio::test]
async fn unknown_subscriber_gets_empty_404() {
    let app = TestApp::seeded().await;

    let response = app.get(&format!("{PREFIX}/groups/mallory")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn request_marks_group_pending() {
    let app = TestApp::seeded().await;

    let response = app
        .post_json(
            &format!("{PREFIX}/request"),
            json!({ "username": "alice", "groupName": "RISK_WEEKLY" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.text(),
        "Subscription request sent for: RISK_WEEKLY"
    );

    let response = app.get(&format!("{PREFIX}/groups/alice")).await;
    let alice_groups = statuses(&response.json());
    assert_eq!(
        alice_groups[1],
        ("RISK_WEEKLY".to_string(), "Pending".to_string())
    );

    // other subscribers are unaffected
    let response = app.get(&format!("{PREFIX}/groups/bob")).await;
    assert!(
        statuses(&response.json())
            .iter()
            .all(|(_, status)| status == "Unsubscribed")
    );
}

#[tokio::test]
async fn duplicate_or_subscribed_request_is_rejected() {
    let app = TestApp::seeded().await;
    let id = app.pending_request_id("alice", "FIN_DAILY").await;

    let response = app
        .post_json(
            &format!("{PREFIX}/request"),
            json!({ "username": "alice", "groupName": "FIN_DAILY" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.text(),
        "Failed to send request. Already subscribed or pending."
    );

    let response = app
        .post_json(
            &format!("{PREFIX}/admin/process-request"),
            json!({ "id": id, "action": "approve" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .post_json(
            &format!("{PREFIX}/request"),
            json!({ "username": "alice", "groupName": "FIN_DAILY" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.text(),
        "Failed to send request. Already subscribed or pending."
    );
}

#[tokio::test]
async fn request_requires_username_and_known_group() {
    let app = TestApp::seeded().await;

    let response = app
        .post_json(&format!("{PREFIX}/request"), json!({ "username": "alice" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Group name is required.");

    let response = app
        .post_json(
            &format!("{PREFIX}/request"),
            json!({ "username": "  ", "groupName": "FIN_DAILY" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Username is required.");

    let response = app
        .post_json(
            &format!("{PREFIX}/request"),
            json!({ "username": "alice", "groupName": "NO_SUCH_GROUP" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Failed to send request. Group not found.");

    let response = app
        .post_json(
            &format!("{PREFIX}/request"),
            json!({ "subscriberUsername": "mallory", "groupName": "FIN_DAILY" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.text(),
        "Failed to send request. Subscriber not found."
    );
}
