use crate::error::AppError;
use crate::state::{ListingQuery, SharedState};
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
};
use listing::{ListingBody, ListingResponse, Sorting};

pub const LISTING_CACHE_CONTROL: &str = "public, max-age=300";

pub async fn reddit_listing(
    State(state): State<SharedState>,
    Query(query): Query<ListingQuery>,
) -> Result<Response, AppError> {
    tracing::info!(
        "Received listing request (subReddit={:?}, username={:?}, after={:?})",
        query.sub_reddit,
        query.username,
        query.after
    );

    let request = query.into_request(Sorting::default());
    match state.listing.get_listing(&request).await {
        ListingResponse::Success {
            posts,
            after,
            has_more,
        } => {
            let body = ListingBody {
                posts,
                after,
                has_more,
                error: None,
            };
            Ok((
                [(header::CACHE_CONTROL, LISTING_CACHE_CONTROL)],
                Json(body),
            )
                .into_response())
        }
        ListingResponse::Failure { error } => {
            tracing::warn!("Listing request failed: {}", error);
            Err(error.into())
        }
    }
}
