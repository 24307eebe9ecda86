use crate::helpers::{client::TestClient, mock_server::MockServer};
use axum::http::StatusCode;

/// 観点: subreddit ページが表示用 URL 付きの投稿を返し、訪問履歴に記録されるか
#[tokio::test]
async fn test_subreddit_page_records_visit() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock.base_url()).await;

    let (status, _, body) = client.get("/r/EarthPorn").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sub"], "/r/EarthPorn");
    assert_eq!(body["hasMore"], true);

    let image = &body["posts"][0];
    assert_eq!(image["type"], "image");
    assert_eq!(
        image["displayUrl"],
        "/api/image?url=https%3A%2F%2Fi.redd.it%2Fphoto.jpg"
    );
    assert_eq!(image["authorUrl"], "/u/alice");
    assert_eq!(
        image["postUrl"],
        "https://old.reddit.com/r/EarthPorn/comments/p1_image/photo/"
    );

    // self サムネイルは表示しない
    assert_eq!(body["posts"][1]["displayUrl"], "");

    let visited = client.state.history.list().await;
    assert_eq!(visited.len(), 1);
    assert_eq!(visited[0].sub, "EarthPorn");
}

/// 観点: ユーザーページは履歴に残さないか
#[tokio::test]
async fn test_user_page_does_not_record_visit() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock.base_url()).await;

    let (status, _, body) = client.get("/u/alice").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sub"], "/user/alice");
    assert!(client.state.history.list().await.is_empty());
}

/// 観点: 存在しない subreddit のページは 404 になり、履歴にも残らないか
#[tokio::test]
async fn test_missing_subreddit_page() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock.base_url()).await;

    let (status, _, body) = client.get("/r/missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    assert!(client.state.history.list().await.is_empty());
}

/// 観点: 壊れた応答で読み込めなかったページも履歴に残さないか
#[tokio::test]
async fn test_broken_subreddit_page_is_not_recorded() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock.base_url()).await;

    client.get("/r/EarthPorn").await;
    let (status, _, _) = client.get("/r/broken").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let visited = client.state.history.list().await;
    assert_eq!(visited.len(), 1);
    assert_eq!(visited[0].sub, "EarthPorn");
}
