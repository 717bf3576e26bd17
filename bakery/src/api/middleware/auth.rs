//! Origin token authentication.
//!
//! Manifest requests must carry one of the configured tokens in
//! [`ORIGIN_TOKEN_HEADER`]. Rejections are plain text, outside the JSON
//! error envelope.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Header carrying the origin token.
pub const ORIGIN_TOKEN_HEADER: &str = "x-bakery-origin-token";

const REJECTION: &str = "you must pass a valid api token as \"x-bakery-origin-token\"\n";

/// Accepted origin tokens.
#[derive(Debug, Clone, Default)]
pub struct OriginTokenAuth {
    tokens: Arc<Vec<String>>,
}

impl OriginTokenAuth {
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens: Arc::new(tokens),
        }
    }

    /// No tokens configured; every request passes.
    pub fn is_disabled(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_valid(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }
}

/// Middleware function for origin token authentication.
pub async fn origin_token_auth(
    State(auth): State<OriginTokenAuth>,
    request: Request,
    next: Next,
) -> Response {
    if auth.is_disabled() {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(ORIGIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    match token {
        Some(token) if auth.is_valid(token) => next.run(request).await,
        Some(_) => {
            tracing::warn!(path = %request.uri().path(), "invalid origin token");
            reject()
        }
        None => {
            tracing::warn!(path = %request.uri().path(), "missing origin token");
            reject()
        }
    }
}

fn reject() -> Response {
    (
        StatusCode::FORBIDDEN,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        REJECTION,
    )
        .into_response()
}
