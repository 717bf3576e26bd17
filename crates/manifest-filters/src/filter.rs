use tracing::debug;

use crate::dash::DashFilter;
use crate::error::FilterError;
use crate::hls::HlsFilter;
use crate::media_filters::{MediaFilters, Protocol};

/// Filtering capability of one manifest format.
///
/// Implementations own the raw manifest text. `filter_manifest` parses it,
/// applies every axis set in `filters` and writes the result back in the same
/// format. Parse failures are reported before any axis is applied.
pub trait ManifestFilter: Send + Sync {
    fn filter_manifest(&self, filters: &MediaFilters) -> Result<String, FilterError>;
}

/// Selects the filter for `protocol`.
pub fn new_filter(
    protocol: Option<Protocol>,
    manifest_url: impl Into<String>,
    manifest_content: impl Into<String>,
) -> Result<Box<dyn ManifestFilter>, FilterError> {
    let manifest_url = manifest_url.into();
    debug!(?protocol, %manifest_url, "selecting manifest filter");

    match protocol {
        Some(Protocol::Dash) => Ok(Box::new(DashFilter::new(manifest_url, manifest_content))),
        Some(Protocol::Hls) => Ok(Box::new(HlsFilter::new(manifest_url, manifest_content))),
        None => Err(FilterError::UnsupportedProtocol),
    }
}
