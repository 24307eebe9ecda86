//! 画面向けのページデータ
//!
//! 描画そのものは扱わず、各投稿に表示用 URL を付けた JSON を返す。

use crate::error::AppError;
use crate::state::{ListingQuery, SharedState};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use beeld_core::{media, Post};
use listing::{ListingResponse, Sorting};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PagePost {
    #[serde(flatten)]
    pub post: Post,
    #[serde(rename = "displayUrl")]
    pub display_url: String,
    #[serde(rename = "authorUrl")]
    pub author_url: String,
    #[serde(rename = "postUrl")]
    pub post_url: String,
}

impl From<Post> for PagePost {
    fn from(post: Post) -> Self {
        Self {
            display_url: media::post_display_url(&post),
            author_url: media::author_url(&post),
            post_url: media::post_url(&post),
            post,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageData {
    /// `/r/<slug>` または `/user/<name>`
    pub sub: String,
    pub posts: Vec<PagePost>,
    pub after: Option<String>,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

pub async fn subreddit_page(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    Query(mut query): Query<ListingQuery>,
) -> Result<Json<PageData>, AppError> {
    tracing::info!("Subreddit page: {}", slug);

    query.sub_reddit = Some(slug.clone());
    query.username = None;
    let page = load_page(&state, format!("/r/{}", slug), query).await?;

    // 読み込めたページだけ履歴に残す。保存に失敗してもページは返す
    if let Err(e) = state.history.add(&slug).await {
        tracing::warn!("Failed to record visit to {}: {:#}", slug, e);
    }

    Ok(page)
}

pub async fn user_page(
    State(state): State<SharedState>,
    Path(username): Path<String>,
    Query(mut query): Query<ListingQuery>,
) -> Result<Json<PageData>, AppError> {
    tracing::info!("User page: {}", username);

    query.sub_reddit = None;
    let sub = format!("/user/{}", username);
    query.username = Some(username);
    load_page(&state, sub, query).await
}

async fn load_page(
    state: &SharedState,
    sub: String,
    query: ListingQuery,
) -> Result<Json<PageData>, AppError> {
    let request = query.into_request(Sorting::Hot);
    match state.listing.get_listing(&request).await {
        ListingResponse::Success {
            posts,
            after,
            has_more,
        } => Ok(Json(PageData {
            sub,
            posts: posts.into_iter().map(PagePost::from).collect(),
            after,
            has_more,
        })),
        ListingResponse::Failure { error } => {
            tracing::warn!("Page load for {} failed: {}", sub, error);
            Err(error.into())
        }
    }
}
