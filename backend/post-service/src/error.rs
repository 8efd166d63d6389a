/// Error types for post-service
///
/// Errors are converted to message-only JSON envelopes for API clients.
/// Internal detail (database and upstream error strings) is logged, never
/// returned verbatim.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for post-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing required input; rejected before any remote
    /// call or persistence.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Id does not resolve to a live (non-deleted) post.
    #[error("post does not exist")]
    NotFound,

    /// Caller identity missing or unusable.
    #[error("unauthorized")]
    Unauthorized(String),

    /// Caller identity does not match the stored owner.
    #[error("forbidden")]
    Forbidden(String),

    /// Image or profile RPC failed or timed out. Always fatal to the
    /// enclosing creation, never substituted with defaults.
    #[error("upstream call failed: {0}")]
    Upstream(String),

    /// Store operation failed.
    #[error("database error: {0}")]
    Database(String),
}

impl AppError {
    /// Message exposed to API clients. 5xx-class detail stays in the logs.
    fn client_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound => "post does not exist".to_string(),
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::Forbidden(msg) => msg.clone(),
            AppError::Upstream(_) | AppError::Database(_) => {
                "something went wrong".to_string()
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        HttpResponse::build(status).json(serde_json::json!({
            "message": self.client_message(),
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            AppError::Validation("missing body".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Forbidden("not the owner".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Upstream("profile call failed".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Database("pool closed".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn server_errors_do_not_leak_detail() {
        let err = AppError::Database("connection refused to 10.0.0.3:5432".into());
        assert_eq!(err.client_message(), "something went wrong");

        let err = AppError::Upstream("user-service timed out".into());
        assert_eq!(err.client_message(), "something went wrong");
    }

    #[test]
    fn client_errors_keep_their_message() {
        let err = AppError::Validation("post body is required".into());
        assert_eq!(err.client_message(), "post body is required");
    }
}
