//! Filter error types.
//!
//! Every message follows the same shape: the originating scope first, then
//! the details, separated by `": "`. Callers that only see the rendered
//! message can recover the scope by splitting on the separator; callers that
//! hold the typed error use [`Scoped`] instead.

use mpd::MpdError;

/// Separator between the scope and the details of an error message.
pub const SCOPE_SEPARATOR: &str = ": ";

/// An error that knows which stage it came from.
pub trait Scoped: std::error::Error {
    /// Originating scope, e.g. `Bitrate` or `fetching manifest`.
    fn scope(&self) -> String;

    /// Ordered detail messages under the scope. May be empty.
    fn details(&self) -> Vec<String>;
}

/// Splits a rendered error message into its scope and details.
///
/// `"Bitrate: invalid range: ( 1, 0 )"` gives `("Bitrate", ["invalid range",
/// "( 1, 0 )"])`; a message without separator is all scope.
pub fn split_scope(message: &str) -> (String, Vec<String>) {
    let mut parts = message.split(SCOPE_SEPARATOR).map(str::to_owned);
    let scope = parts.next().unwrap_or_default();
    (scope, parts.collect())
}

/// Detail list for messages that embed foreign text (parser errors, request
/// values). Each part is split on [`SCOPE_SEPARATOR`] so the typed details
/// agree with [`split_scope`] of the rendered message.
pub fn detail_segments<S: AsRef<str>>(parts: impl IntoIterator<Item = S>) -> Vec<String> {
    parts
        .into_iter()
        .flat_map(|part| {
            part.as_ref()
                .split(SCOPE_SEPARATOR)
                .map(str::to_owned)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Invalid filter criteria in the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterInputError {
    #[error("Bitrate: invalid range for provided values: ( {min}, {max} )")]
    InvalidBitrateRange { min: u64, max: u64 },

    #[error("Bitrate: invalid value: {value}")]
    InvalidBitrateValue { value: String },

    #[error("Bitrate: invalid number of values: {count}")]
    InvalidBitrateArity { count: usize },

    #[error("Protocol: unsupported protocol")]
    UnsupportedProtocol,

    #[error("Filter: unsupported filter: {name}")]
    UnsupportedFilter { name: String },
}

impl Scoped for FilterInputError {
    fn scope(&self) -> String {
        match self {
            Self::InvalidBitrateRange { .. }
            | Self::InvalidBitrateValue { .. }
            | Self::InvalidBitrateArity { .. } => "Bitrate",
            Self::UnsupportedProtocol => "Protocol",
            Self::UnsupportedFilter { .. } => "Filter",
        }
        .to_string()
    }

    fn details(&self) -> Vec<String> {
        match self {
            Self::InvalidBitrateRange { min, max } => vec![
                "invalid range for provided values".to_string(),
                format!("( {min}, {max} )"),
            ],
            Self::InvalidBitrateValue { value } => {
                detail_segments(["invalid value", value.as_str()])
            }
            Self::InvalidBitrateArity { count } => {
                vec!["invalid number of values".to_string(), count.to_string()]
            }
            Self::UnsupportedProtocol => vec!["unsupported protocol".to_string()],
            Self::UnsupportedFilter { name } => {
                detail_segments(["unsupported filter", name.as_str()])
            }
        }
    }
}

/// Failure to read, filter or write a manifest.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error(transparent)]
    Dash(#[from] MpdError),

    #[error("#EXTM3U absent")]
    HlsHeaderAbsent,

    #[error("HLS: failed to parse playlist")]
    HlsParse,

    #[error("HLS: failed to write playlist: {reason}")]
    HlsWrite { reason: String },

    #[error("Protocol: unsupported protocol")]
    UnsupportedProtocol,
}

impl Scoped for FilterError {
    fn scope(&self) -> String {
        match self {
            Self::Dash(err) => err.scope(),
            Self::HlsHeaderAbsent => "#EXTM3U absent".to_string(),
            Self::HlsParse | Self::HlsWrite { .. } => "HLS".to_string(),
            Self::UnsupportedProtocol => "Protocol".to_string(),
        }
    }

    fn details(&self) -> Vec<String> {
        match self {
            Self::Dash(err) => err.details(),
            Self::HlsHeaderAbsent => Vec::new(),
            Self::HlsParse => vec!["failed to parse playlist".to_string()],
            Self::HlsWrite { reason } => {
                detail_segments(["failed to write playlist", reason.as_str()])
            }
            Self::UnsupportedProtocol => vec!["unsupported protocol".to_string()],
        }
    }
}

impl Scoped for MpdError {
    fn scope(&self) -> String {
        match self {
            Self::UnexpectedEof => "EOF".to_string(),
            _ => "DASH".to_string(),
        }
    }

    fn details(&self) -> Vec<String> {
        match self {
            Self::UnexpectedEof => Vec::new(),
            Self::Xml(err) => {
                detail_segments(["malformed document".to_string(), err.to_string()])
            }
            Self::UnexpectedEnd { name } => {
                detail_segments(["unexpected closing tag", name.as_str()])
            }
            Self::MultipleRoots => vec!["multiple root elements".to_string()],
            Self::UnexpectedRoot { name } => {
                detail_segments(["unexpected root element", name.as_str()])
            }
            Self::Write { reason } => {
                detail_segments(["failed to write document", reason.as_str()])
            }
        }
    }
}
