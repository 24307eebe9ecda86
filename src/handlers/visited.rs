use crate::error::AppError;
use crate::state::SharedState;
use ::history::VisitedSub;
use axum::{extract::State, response::Json};

#[derive(serde::Deserialize)]
pub struct SubPayload {
    pub sub: String,
}

pub async fn history_list(State(state): State<SharedState>) -> Json<Vec<VisitedSub>> {
    Json(state.history.list().await)
}

/// 追加後の履歴を返す
pub async fn history_add(
    State(state): State<SharedState>,
    Json(payload): Json<SubPayload>,
) -> Result<Json<Vec<VisitedSub>>, AppError> {
    state.history.add(&payload.sub).await?;
    Ok(Json(state.history.list().await))
}

pub async fn history_remove(
    State(state): State<SharedState>,
    Json(payload): Json<SubPayload>,
) -> Result<Json<Vec<VisitedSub>>, AppError> {
    state.history.remove(&payload.sub).await?;
    Ok(Json(state.history.list().await))
}
