//! API error handling.
//!
//! Every failure of the filter flow reaches the client as an [`ErrorResponse`]:
//! a stage-level message plus the cause broken down by scope.
//!
//! ```json
//! {"message": "failed parsing filters", "errors": {"Bitrate": ["invalid range for provided values", "( 10000, 10 )"]}}
//! ```

use std::collections::HashMap;
use std::error::Error as StdError;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use manifest_filters::{Scoped, split_scope};
use serde::Serialize;

type Cause = Box<dyn StdError + Send + Sync>;

/// Structured error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable summary of the failed stage
    pub message: String,
    /// Details of the cause keyed by its scope
    pub errors: HashMap<String, Vec<String>>,
    #[serde(skip)]
    cause: Cause,
}

impl ErrorResponse {
    /// Build from any error by splitting its message on the scope separator.
    pub fn new(message: impl Into<String>, cause: impl Into<Cause>) -> Self {
        let cause = cause.into();
        let (scope, details) = split_scope(&cause.to_string());
        Self {
            message: message.into(),
            errors: HashMap::from([(scope, details)]),
            cause,
        }
    }

    /// Build from an error that reports its own scope.
    pub fn scoped<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: Scoped + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            errors: HashMap::from([(cause.scope(), cause.details())]),
            cause: Box::new(cause),
        }
    }

    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.cause.as_ref()
    }

    /// Flattened `"<message>: <cause>\n"` form.
    pub fn plain_text(&self) -> String {
        format!("{}: {}\n", self.message, self.cause)
    }

    /// Render as JSON with `status`, or as plain text if encoding fails.
    pub fn render(&self, status: StatusCode) -> Response {
        match serde_json::to_vec(self) {
            Ok(body) => (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "failed to encode error response");
                (
                    status,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    self.plain_text(),
                )
                    .into_response()
            }
        }
    }
}

/// API error type that can be converted to HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, response: ErrorResponse) -> Self {
        Self { status, response }
    }

    /// Create a 400 Bad Request error.
    pub fn bad_request<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: Scoped + Send + Sync + 'static,
    {
        Self::new(StatusCode::BAD_REQUEST, ErrorResponse::scoped(message, cause))
    }

    /// Create a 500 Internal Server Error.
    pub fn internal<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: Scoped + Send + Sync + 'static,
    {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::scoped(message, cause),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = &self.response.message;
        let cause = self.response.cause();
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, %message, %cause, "request failed");
        } else {
            tracing::info!(status = %self.status, %message, %cause, "request rejected");
        }
        self.response.render(self.status)
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
