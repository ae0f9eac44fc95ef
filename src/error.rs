//! Error types for the storage, service and HTTP layers.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Failures coming out of a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique / foreign-key / check violation. `detail` is safe to show.
    #[error("constraint violated: {detail}")]
    Constraint { detail: String },
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
    #[error("unsupported database url `{0}`")]
    UnsupportedBackend(String),
}

impl StoreError {
    pub fn is_constraint(&self) -> bool {
        matches!(self, StoreError::Constraint { .. })
    }
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("answer not added: {detail}")]
    AnswerNotAdded { detail: String },
    #[error("user `{0}` already exists")]
    UserExists(String),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What handlers return; maps onto HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("invalid or missing api key")]
    Unauthorized,
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Quiz(QuizError::AnswerNotAdded { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Quiz(QuizError::UserExists(_)) => StatusCode::CONFLICT,
            ApiError::Quiz(QuizError::Store(e)) | ApiError::Store(e) if e.is_constraint() => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Quiz(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Driver errors stay in the log.
        let detail = if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("request failed: {self}");
            "internal error".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(ErrorBody { detail })
    }
}
