//! HTTP mapping of failures. Every error body is `{"error": "<message>"}`.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use pp_core::AppError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    /// `public` is what the client sees; `detail` is only logged.
    #[error("{public}")]
    Internal { public: &'static str, detail: String },
}

impl ApiError {
    pub fn internal(public: &'static str, detail: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            public,
            detail: detail.to_string(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::ValidationError(msg) => ApiError::BadRequest(msg),
            AppError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            AppError::Forbidden(msg) => ApiError::Forbidden(msg),
            AppError::Internal(detail) => ApiError::internal("Internal server error", detail),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::BadRequest(msg) | ApiError::Unauthorized(msg) | ApiError::Forbidden(msg) => {
                msg.as_str()
            }
            ApiError::Internal { public, detail } => {
                log::error!("{public}: {detail}");
                *public
            }
        };
        HttpResponse::build(self.status_code()).json(ErrorBody { error: message })
    }
}
