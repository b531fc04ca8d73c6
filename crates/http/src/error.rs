//! Error handling for the HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hadith_db::StoreError;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub const NOT_FOUND_DETAILS: &str = "The requested URL was not found on the server. \
    If you entered the URL manually please check your spelling and try again.";

pub const UNAUTHORIZED_DETAILS: &str = "The server could not verify that you are authorized \
    to access the URL requested. You either supplied the wrong credentials (e.g. a bad password), \
    or your browser doesn't understand how to supply the credentials required.";

pub const METHOD_NOT_ALLOWED_DETAILS: &str = "The method is not allowed for the requested URL.";

pub const TIMEOUT_DETAILS: &str = "The server closed the network connection because the browser \
    didn't finish the request within the specified time.";

pub const INTERNAL_DETAILS: &str = "The server encountered an internal error and was unable \
    to complete your request. Either the server is overloaded or there is an error in the \
    application.";

/// Body of every error response: `{"error": {"details": ..., "code": ...}}`
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub details: String,
    pub code: u16,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("request timed out")]
    Timeout,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a not found error with the standard description
    pub fn not_found() -> Self {
        Self::NotFound {
            message: NOT_FOUND_DETAILS.to_string(),
        }
    }

    /// Create an unauthorized error with the standard description
    pub fn unauthorized() -> Self {
        Self::Unauthorized {
            message: UNAUTHORIZED_DETAILS.to_string(),
        }
    }

    pub fn method_not_allowed() -> Self {
        Self::MethodNotAllowed
    }

    pub fn timeout() -> Self {
        Self::Timeout
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_id = Uuid::new_v4();

        let details = match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Unauthorized { message } => {
                tracing::debug!(
                    error_id = %error_id,
                    status_code = %status.as_u16(),
                    details = %message,
                    "request rejected"
                );
                message
            }
            AppError::MethodNotAllowed => METHOD_NOT_ALLOWED_DETAILS.to_string(),
            AppError::Timeout => {
                tracing::warn!(
                    error_id = %error_id,
                    status_code = %status.as_u16(),
                    "request timed out"
                );
                TIMEOUT_DETAILS.to_string()
            }
            AppError::Internal(e) => {
                // Store failures stay in the logs; clients get an opaque body.
                tracing::error!(
                    error_id = %error_id,
                    status_code = %status.as_u16(),
                    error = ?e,
                    "request failed"
                );
                INTERNAL_DETAILS.to_string()
            }
        };

        let body = ErrorEnvelope {
            error: ErrorBody {
                details,
                code: status.as_u16(),
            },
        };

        (status, Json(body)).into_response()
    }
}
