use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;
use thiserror::Error;
use crate::models::models::{Outcome, PostId};

/// Failures reported by the store. All of them are recoverable.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("Username already exists. Please choose a different username.")]
    DuplicateUser,

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("User {0} not found.")]
    UnknownUser(String),

    #[error("Post ID {0} not found.")]
    NotFound(PostId),

    #[error("Post ID {0} not found or you don't have permission.")]
    NotFoundOrForbidden(PostId),

    #[error("No post ids left to assign.")]
    IdsExhausted,

    #[error("Failed to persist store: {0}")]
    Persist(#[from] std::io::Error),

    #[error("Failed to encode store: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Unauthorized".to_string())
    }

    fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::InternalError(msg) => msg,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(Outcome::<()>::failure(self.message()))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let msg = err.to_string();
        match err {
            StoreError::InvalidInput(_) => ApiError::BadRequest(msg),
            StoreError::DuplicateUser => ApiError::Conflict(msg),
            StoreError::InvalidCredentials => ApiError::Unauthorized(msg),
            StoreError::UnknownUser(_)
            | StoreError::NotFound(_)
            | StoreError::NotFoundOrForbidden(_) => ApiError::NotFound(msg),
            StoreError::IdsExhausted
            | StoreError::Persist(_)
            | StoreError::Encode(_)
            | StoreError::Poisoned => {
                tracing::error!("store failure: {msg}");
                ApiError::InternalError("Internal server error".to_string())
            }
        }
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(_: serde_json::Error) -> Self {
        ApiError::BadRequest("Invalid JSON body".to_string())
    }
}
