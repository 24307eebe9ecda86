use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use listing::ListingError;
use media_proxy::ProxyError;
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    /// 上流のステータスをそのまま返す
    Upstream(StatusCode, String),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Upstream(status, msg) => (status, msg),
            AppError::Internal(err) => {
                error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

// Anyhow conversion
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

// 識別子の欠落だけが 400、それ以外の取得失敗は 404
impl From<ListingError> for AppError {
    fn from(err: ListingError) -> Self {
        match err {
            ListingError::InvalidRequest => AppError::BadRequest(err.message()),
            other => AppError::NotFound(other.message()),
        }
    }
}

impl From<ProxyError> for AppError {
    fn from(err: ProxyError) -> Self {
        let message = err.message();
        match err {
            ProxyError::Fetch(e) => {
                error!("Proxy fetch failed: {:#}", e);
                AppError::Upstream(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            other => {
                let status = StatusCode::from_u16(other.status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                match status {
                    StatusCode::BAD_REQUEST => AppError::BadRequest(message),
                    StatusCode::NOT_FOUND => AppError::NotFound(message),
                    status => AppError::Upstream(status, message),
                }
            }
        }
    }
}
