use crate::error::AppError;
use crate::state::{ImageQuery, SharedState};
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};

/// Reddit CDN の画像・動画をそのまま中継する
pub async fn proxy_image(
    State(state): State<SharedState>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, AppError> {
    let media = media_proxy::proxy_media(state.media_fetcher.as_ref(), query.url.as_deref()).await?;

    Ok((
        [
            (header::CONTENT_TYPE, media.content_type),
            (header::CACHE_CONTROL, media_proxy::CACHE_CONTROL.to_string()),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
        ],
        media.body,
    )
        .into_response())
}
