//! Manifest filtering route.
//!
//! `GET /<filters>/<manifest path>` fetches the manifest from the origin,
//! filters it and returns it in its own format.

use axum::{
    Router,
    extract::State,
    http::{Uri, header},
    response::IntoResponse,
    routing::get,
};
use manifest_filters::{ParsedPath, new_filter, parse_path};
use tracing::{debug, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::server::AppState;
use crate::origin::Origin;

/// Create the manifest router.
pub fn router() -> Router<AppState> {
    Router::new().route("/{*path}", get(filter_manifest))
}

async fn filter_manifest(State(state): State<AppState>, uri: Uri) -> ApiResult<impl IntoResponse> {
    let ParsedPath {
        filters,
        mut manifest_path,
    } = parse_path(uri.path()).map_err(|e| ApiError::bad_request("failed parsing filters", e))?;

    if let Some(query) = uri.query() {
        manifest_path.push('?');
        manifest_path.push_str(query);
    }

    let origin = Origin::configure(state.config.origin_host.as_deref(), &manifest_path)
        .map_err(|e| ApiError::internal("failed configuring origin", e))?;

    let manifest = origin
        .fetch_manifest(&state.http_client)
        .await
        .map_err(|e| ApiError::internal("manifest origin error", e))?;

    // the path extension decides; the origin's content type is a fallback
    let served = manifest.protocol();
    if let (Some(requested), Some(served)) = (filters.protocol(), served)
        && requested != served
    {
        warn!(url = %origin.url(), %requested, %served, "origin content type disagrees with manifest extension");
    }
    let protocol = filters.protocol().or(served);

    let filter = new_filter(protocol, origin.url().as_str(), manifest.content)
        .map_err(|e| ApiError::bad_request("failed to filter manifest", e))?;
    let filtered = filter
        .filter_manifest(&filters)
        .map_err(|e| ApiError::bad_request("failed to filter manifest", e))?;

    debug!(url = %origin.url(), bytes = filtered.len(), "served filtered manifest");

    let content_type = protocol.map_or("text/plain", |protocol| protocol.content_type());

    Ok(([(header::CONTENT_TYPE, content_type)], filtered))
}
