//! API route modules.

pub mod health;
pub mod manifest;

use axum::{Router, middleware};

use crate::api::middleware::origin_token_auth;
use crate::api::server::{AppState, trace_layer};

/// Create the router: the unauthenticated health check plus the token-guarded,
/// traced manifest catch-all.
pub fn create_router(state: AppState) -> Router {
    let manifests = manifest::router()
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            origin_token_auth,
        ))
        .route_layer(trace_layer());

    Router::new()
        .merge(health::router())
        .merge(manifests)
        .with_state(state)
}
