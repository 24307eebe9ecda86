use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Reddit の JSON API を模したローカルサーバー
///
/// - `missing` という subreddit は 404 を返す
/// - `broken` という subreddit は JSON でない本文を返す
/// - `after` なしの 1 ページ目は `t3_page2` を、2 ページ目は null を返す
pub struct MockServer {
    pub port: u16,
    recorder: Recorder,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

/// 上流に届いたリクエストの記録
#[derive(Clone, Default)]
struct Recorder {
    hits: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<UpstreamRequest>>>,
}

impl Recorder {
    fn record(&self, file: &str, params: &HashMap<String, String>) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(UpstreamRequest {
            file: file.to_string(),
            params: params.clone(),
        });
    }
}

/// 最後に届いたリクエストのファイル名 (`hot.json` など) とクエリ
#[derive(Clone, Debug)]
pub struct UpstreamRequest {
    pub file: String,
    pub params: HashMap<String, String>,
}

impl MockServer {
    pub async fn start() -> Self {
        let recorder = Recorder::default();
        let app = Router::new()
            .route("/r/:sub/:file", get(handle_subreddit))
            .route("/user/:name/submitted/:file", get(handle_user))
            .with_state(recorder.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    rx.await.ok();
                })
                .await
                .unwrap();
        });

        MockServer {
            port,
            recorder,
            shutdown_tx: Some(tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// 上流に届いたリクエスト数
    pub fn hits(&self) -> usize {
        self.recorder.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<UpstreamRequest> {
        self.recorder.last.lock().unwrap().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn handle_subreddit(
    State(recorder): State<Recorder>,
    Path((sub, file)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    recorder.record(&file, &params);

    match sub.as_str() {
        "missing" => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "message": "Not Found", "error": 404 })),
        )
            .into_response(),
        "broken" => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        _ => Json(listing_page(&sub, params.get("after"))).into_response(),
    }
}

async fn handle_user(
    State(recorder): State<Recorder>,
    Path((name, file)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    recorder.record(&file, &params);
    Json(listing_page(&format!("u_{}", name), params.get("after")))
}

fn listing_page(sub: &str, after: Option<&String>) -> serde_json::Value {
    let (prefix, next) = match after {
        None => ("p1", Some("t3_page2")),
        Some(_) => ("p2", None),
    };

    serde_json::json!({
        "kind": "Listing",
        "data": {
            "after": next,
            "children": [
                {
                    "kind": "t3",
                    "data": {
                        "id": format!("{}_image", prefix),
                        "name": format!("t3_{}_image", prefix),
                        "author": "alice",
                        "subreddit": sub,
                        "domain": "i.redd.it",
                        "permalink": format!("/r/{}/comments/{}_image/photo/", sub, prefix),
                        "thumbnail": "https://b.thumbs.redditmedia.com/thumb.jpg",
                        "title": "A photo",
                        "url": "https://i.redd.it/photo.jpg",
                        "post_hint": "image",
                        "preview": {
                            "images": [
                                { "source": { "url": "https://preview.redd.it/photo.jpg", "width": 1024, "height": 768 } }
                            ]
                        }
                    }
                },
                {
                    "kind": "t3",
                    "data": {
                        "id": format!("{}_text", prefix),
                        "author": "bob",
                        "subreddit": sub,
                        "domain": format!("self.{}", sub),
                        "permalink": format!("/r/{}/comments/{}_text/question/", sub, prefix),
                        "thumbnail": "self",
                        "title": "A question",
                        "url": format!("https://www.reddit.com/r/{}/comments/{}_text/question/", sub, prefix),
                        "selftext": "What is this?"
                    }
                }
            ]
        }
    })
}
