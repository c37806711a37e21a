use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error("unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            // Callers treat an unreachable store as "unknown, fail safe".
            AppError::Store(_) => (StatusCode::SERVICE_UNAVAILABLE, "StoreError"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
        };

        if let AppError::Store(e) = &self {
            tracing::error!(error = %e, "store operation failed");
        }

        let body = serde_json::json!({
            "success": false,
            "errorCode": code,
            "error": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
