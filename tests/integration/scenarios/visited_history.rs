use crate::helpers::{client::TestClient, mock_server::MockServer};
use axum::http::StatusCode;
use serde_json::json;

fn subs(body: &serde_json::Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|v| v["sub"].as_str().unwrap().to_string())
        .collect()
}

/// 観点: 追加・重複排除・削除が API 経由で反映されるか
#[tokio::test]
async fn test_history_add_and_remove() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock.base_url()).await;

    let (status, _, body) = client.get("/api/history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    client
        .post_json("/api/history/add", json!({ "sub": "/r/Pics" }))
        .await;
    client
        .post_json("/api/history/add", json!({ "sub": "aww" }))
        .await;
    let (status, _, body) = client
        .post_json("/api/history/add", json!({ "sub": "pics" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subs(&body), vec!["pics", "aww"]);
    assert!(body[0]["visitedAt"].is_i64());

    let (status, _, body) = client
        .post_json("/api/history/remove", json!({ "sub": "AWW" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subs(&body), vec!["pics"]);
}

/// 観点: 不正な本文は 4xx で弾かれるか
#[tokio::test]
async fn test_history_rejects_bad_payload() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock.base_url()).await;

    let (status, _, _) = client
        .post_json("/api/history/add", json!({ "name": "pics" }))
        .await;
    assert!(status.is_client_error());
}
