//! Manifest filtering for adaptive streaming.
//!
//! Given a manifest (HLS or DASH) and the client's [`MediaFilters`], a
//! [`ManifestFilter`] produces the same manifest reduced to the tracks that
//! satisfy every requested axis. Only membership changes; URLs, bitrates and
//! timing are left as they were.

pub mod dash;
pub mod error;
pub mod filter;
pub mod hls;
pub mod media_filters;
pub mod parser;

pub use dash::DashFilter;
pub use error::{
    FilterError, FilterInputError, SCOPE_SEPARATOR, Scoped, detail_segments, split_scope,
};
pub use filter::{ManifestFilter, new_filter};
pub use hls::HlsFilter;
pub use media_filters::{BitrateRange, CaptionType, MediaFilters, Protocol};
pub use parser::{ParsedPath, parse_path};
