//! Client-declared filter criteria.

use std::fmt;

use strum::{Display, EnumString};

use crate::error::FilterInputError;

/// Identifier of a caption or subtitle codec, e.g. `stpp` or `wvtt`.
/// Compared by exact string match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaptionType(String);

impl CaptionType {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CaptionType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for CaptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inclusive bitrate bounds in bits per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitrateRange {
    min: u64,
    max: u64,
}

impl BitrateRange {
    /// Fails when `min > max`.
    pub fn new(min: u64, max: u64) -> Result<Self, FilterInputError> {
        if min > max {
            return Err(FilterInputError::InvalidBitrateRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, bitrate: u64) -> bool {
        (self.min..=self.max).contains(&bitrate)
    }
}

/// Streaming protocol of a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Protocol {
    Hls,
    Dash,
}

impl Protocol {
    /// Content type to serve the filtered manifest with.
    pub fn content_type(self) -> &'static str {
        match self {
            Protocol::Hls => "application/x-mpegURL",
            Protocol::Dash => "application/dash+xml",
        }
    }

    /// File extension the protocol is detected from, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Protocol::Hls => "m3u8",
            Protocol::Dash => "mpd",
        }
    }

    /// Detects the protocol from the extension of the last path segment.
    /// Query string and fragment are ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let file_name = path.rsplit('/').next().unwrap_or_default();
        let (_, extension) = file_name.rsplit_once('.')?;

        [Protocol::Hls, Protocol::Dash]
            .into_iter()
            .find(|protocol| protocol.extension().eq_ignore_ascii_case(extension))
    }

    /// Detects the protocol from a `Content-Type` header value.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "application/dash+xml" => Some(Protocol::Dash),
            "application/x-mpegurl" | "application/vnd.apple.mpegurl" | "audio/mpegurl"
            | "audio/x-mpegurl" => Some(Protocol::Hls),
            _ => None,
        }
    }
}

/// Filter criteria for one request. An absent axis imposes no constraint;
/// present axes are applied together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaFilters {
    caption_types: Option<Vec<CaptionType>>,
    bitrate: Option<BitrateRange>,
    protocol: Option<Protocol>,
}

impl MediaFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_caption_types<I, T>(mut self, caption_types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CaptionType>,
    {
        self.caption_types = Some(caption_types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_bitrate(mut self, bitrate: BitrateRange) -> Self {
        self.bitrate = Some(bitrate);
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Allowed caption types, `None` when captions are not filtered.
    pub fn caption_types(&self) -> Option<&[CaptionType]> {
        self.caption_types.as_deref()
    }

    pub fn bitrate(&self) -> Option<BitrateRange> {
        self.bitrate
    }

    pub fn protocol(&self) -> Option<Protocol> {
        self.protocol
    }
}
