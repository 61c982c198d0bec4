//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use triage_client::ClientError;
use triage_core::dto::repo::ErrorBody;

use crate::service::repo_service::RepoError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    UpstreamError { message: String, cause: ClientError },
}

impl ApiError {
    /// Map a service error, using `message` for any upstream failure
    pub fn from_repo(err: RepoError, message: &str) -> Self {
        match err {
            RepoError::MissingRepo => ApiError::BadRequest("Repository is required".to_string()),
            RepoError::Upstream(cause) => ApiError::UpstreamError {
                message: message.to_string(),
                cause,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::UpstreamError { message, cause } => {
                tracing::error!("{}: {}", message, cause);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
