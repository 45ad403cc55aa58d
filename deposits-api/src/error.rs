use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use shared_types::ErrorResponse;

/// Error taxonomy shared by every endpoint. Validation and authorization
/// failures are detected before any write; external sync failures never
/// surface here (they are logged and swallowed at the fan-out boundary).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// Covers both "org does not exist" and "org is not owned by the
    /// caller" so the response does not leak which one failed.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Pool exhausted or the store otherwise unreachable.
    #[error("Database unavailable: {0}")]
    StoreUnavailable(#[from] r2d2::Error),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl actix_web::error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::FORBIDDEN,
            ApiError::Store(_) | ApiError::StoreUnavailable(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            // Store and internal details stay in the logs
            ApiError::Store(_) | ApiError::StoreUnavailable(_) | ApiError::Internal(_) => {
                tracing::error!("request failed: {}", self);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse { error: message })
    }
}
