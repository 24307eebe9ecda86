use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};

pub const DEFAULT_SUBREDDIT: &str = "pics";

/// トップは既定の subreddit へ 302 で飛ばす
pub async fn root() -> impl IntoResponse {
    (
        StatusCode::FOUND,
        [(header::LOCATION, format!("/r/{}", DEFAULT_SUBREDDIT))],
    )
}

pub async fn health() -> &'static str {
    "OK"
}
