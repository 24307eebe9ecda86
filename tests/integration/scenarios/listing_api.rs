use crate::helpers::{client::TestClient, mock_server::MockServer};
use axum::http::{header, StatusCode};

/// 観点: subreddit の一覧が正規化され、キャッシュヘッダー付きで返るか
#[tokio::test]
async fn test_subreddit_listing_success() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock.base_url()).await;

    let (status, headers, body) = client.get("/api/reddit?subReddit=pics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=300");
    assert_eq!(body["after"], "t3_page2");
    assert_eq!(body["hasMore"], true);
    assert!(body["error"].is_null());

    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["type"], "image");
    assert_eq!(posts[0]["preview"]["images"][0]["source"]["width"], 1024);
    assert_eq!(posts[1]["type"], "text");
    assert_eq!(posts[1]["selftext"], "What is this?");
}

/// 観点: after カーソルで次のページを取得でき、最終ページでは hasMore が false になるか
#[tokio::test]
async fn test_pagination_with_cursor() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock.base_url()).await;

    let (status, _, body) = client
        .get("/api/reddit?subReddit=pics&sorting=new&t=day&after=t3_page2")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["after"].is_null());
    assert_eq!(body["hasMore"], false);
    assert_eq!(body["posts"][0]["id"], "p2_image");
}

/// 観点: 同じリクエストは TTL 内ならキャッシュから返り、上流は 1 回しか呼ばれないか
#[tokio::test]
async fn test_repeated_request_is_cached() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock.base_url()).await;

    let (first, _, first_body) = client.get("/api/reddit?subReddit=pics").await;
    let (second, _, second_body) = client.get("/api/reddit?subReddit=pics").await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(first_body, second_body);
    assert_eq!(mock.hits(), 1);

    // カーソルが違えば別のキー
    client.get("/api/reddit?subReddit=pics&after=t3_page2").await;
    assert_eq!(mock.hits(), 2);
}

/// 観点: username 指定でユーザーの投稿一覧を取得できるか
#[tokio::test]
async fn test_user_listing() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock.base_url()).await;

    let (status, _, body) = client.get("/api/reddit?username=alice").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"][0]["subreddit"], "u_alice");
}

/// 観点: 上流の 404 はメッセージ付きの 404 になり、キャッシュされないか
#[tokio::test]
async fn test_upstream_not_found() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock.base_url()).await;

    let (status, _, body) = client.get("/api/reddit?subReddit=missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");

    client.get("/api/reddit?subReddit=missing").await;
    assert_eq!(mock.hits(), 2);
}

/// 観点: 解釈できない本文は取得失敗として 404 になるか
#[tokio::test]
async fn test_malformed_upstream_body() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock.base_url()).await;

    let (status, _, body) = client.get("/api/reddit?subReddit=broken").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Failed to fetch listing");
}

/// 観点: subreddit も username もなければ上流に行かずに 400 になるか
#[tokio::test]
async fn test_missing_identifier() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock.base_url()).await;

    let (status, _, body) = client.get("/api/reddit?subReddit=%20%20").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "need a username or subreddit");
    assert_eq!(mock.hits(), 0);
}

/// 観点: 空や解釈できないクエリ値は 400 にならず、既定値で上流に問い合わせるか
#[tokio::test]
async fn test_blank_and_unknown_query_values_fall_back_to_defaults() {
    let mock = MockServer::start().await;
    let client = TestClient::new(&mock.base_url()).await;

    let (status, _, body) = client
        .get("/api/reddit?subReddit=pics&limit=&sorting=&t=")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"].as_array().unwrap().len(), 2);
    assert_eq!(mock.hits(), 1);
    let upstream = mock.last_request().unwrap();
    assert_eq!(upstream.file, "top.json");
    assert_eq!(upstream.params["limit"], "30");
    assert_eq!(upstream.params["t"], "week");

    let (status, _, _) = client
        .get("/api/reddit?subReddit=aww&limit=abc&sorting=controversial&t=forever")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(mock.hits(), 2);
    let upstream = mock.last_request().unwrap();
    assert_eq!(upstream.file, "top.json");
    assert_eq!(upstream.params["limit"], "30");
    assert_eq!(upstream.params["t"], "week");
}
