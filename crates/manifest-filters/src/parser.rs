//! Request path parsing.
//!
//! A request path is a run of filter segments followed by the manifest path:
//!
//! ```text
//! /c(stpp,wvtt)/b(100000,4000000)/path/to/master.m3u8
//! ```
//!
//! Filter segments look like `name(values)`. The first segment that does not
//! starts the manifest path, whose extension decides the protocol.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::error::FilterInputError;
use crate::media_filters::{BitrateRange, CaptionType, MediaFilters, Protocol};

static FILTER_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]+)\((.*)\)$").unwrap());

/// Result of parsing a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    pub filters: MediaFilters,
    /// Manifest path with a leading `/`, filters removed.
    pub manifest_path: String,
}

/// Splits a request path into filters and the manifest path.
pub fn parse_path(path: &str) -> Result<ParsedPath, FilterInputError> {
    let mut filters = MediaFilters::new();
    let mut segments = path.trim_start_matches('/').split('/').peekable();

    while let Some(&segment) = segments.peek() {
        let Some(captures) = FILTER_SEGMENT.captures(segment) else {
            break;
        };
        let (name, values) = (&captures[1], &captures[2]);
        trace!(name, values, "parsed filter segment");

        filters = match name {
            "c" => filters.with_caption_types(parse_caption_types(values)),
            "b" => filters.with_bitrate(parse_bitrate(values)?),
            _ => {
                return Err(FilterInputError::UnsupportedFilter {
                    name: name.to_string(),
                });
            }
        };
        segments.next();
    }

    let manifest_path = format!("/{}", segments.collect::<Vec<_>>().join("/"));
    let protocol =
        Protocol::from_path(&manifest_path).ok_or(FilterInputError::UnsupportedProtocol)?;

    Ok(ParsedPath {
        filters: filters.with_protocol(protocol),
        manifest_path,
    })
}

fn parse_caption_types(values: &str) -> Vec<CaptionType> {
    values
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(CaptionType::from)
        .collect()
}

fn parse_bitrate(values: &str) -> Result<BitrateRange, FilterInputError> {
    let bounds: Vec<&str> = values.split(',').map(str::trim).collect();
    let [min, max] = bounds[..] else {
        return Err(FilterInputError::InvalidBitrateArity {
            count: bounds.len(),
        });
    };

    let min = parse_bound(min, 0)?;
    let max = parse_bound(max, u64::MAX)?;
    BitrateRange::new(min, max)
}

fn parse_bound(value: &str, unbounded: u64) -> Result<u64, FilterInputError> {
    if value.is_empty() {
        return Ok(unbounded);
    }
    value
        .parse()
        .map_err(|_| FilterInputError::InvalidBitrateValue {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_without_filters() {
        let parsed = parse_path("/origin/some/path/to/master.m3u8").unwrap();
        assert_eq!(parsed.manifest_path, "/origin/some/path/to/master.m3u8");
        assert_eq!(parsed.filters, MediaFilters::new().with_protocol(Protocol::Hls));
    }

    #[test]
    fn test_caption_and_bitrate_filters() {
        let parsed = parse_path("/c(stpp, wvtt)/b(100,4000)/path/to/manifest.mpd").unwrap();
        assert_eq!(parsed.manifest_path, "/path/to/manifest.mpd");
        assert_eq!(
            parsed.filters,
            MediaFilters::new()
                .with_caption_types(["stpp", "wvtt"])
                .with_bitrate(BitrateRange::new(100, 4000).unwrap())
                .with_protocol(Protocol::Dash)
        );
    }

    #[test]
    fn test_empty_caption_list_is_a_constraint() {
        let parsed = parse_path("/c()/manifest.mpd").unwrap();
        assert_eq!(parsed.filters.caption_types(), Some(&[][..]));
    }

    #[test]
    fn test_open_bitrate_bounds() {
        let parsed = parse_path("/b(,5000)/master.m3u8").unwrap();
        assert_eq!(parsed.filters.bitrate(), Some(BitrateRange::new(0, 5000).unwrap()));

        let parsed = parse_path("/b(5000,)/master.m3u8").unwrap();
        assert_eq!(
            parsed.filters.bitrate(),
            Some(BitrateRange::new(5000, u64::MAX).unwrap())
        );
    }

    #[test]
    fn test_inverted_bitrate_range() {
        let err = parse_path("/b(10000,10)/origin/some/path/to/master.mpd").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Bitrate: invalid range for provided values: ( 10000, 10 )"
        );
    }

    #[test]
    fn test_bad_bitrate_values() {
        assert_eq!(
            parse_path("/b(abc,10)/master.mpd").unwrap_err(),
            FilterInputError::InvalidBitrateValue {
                value: "abc".to_string()
            }
        );
        assert_eq!(
            parse_path("/b(1,2,3)/master.mpd").unwrap_err(),
            FilterInputError::InvalidBitrateArity { count: 3 }
        );
    }

    #[test]
    fn test_unsupported_protocol() {
        assert_eq!(
            parse_path("/some/random/request").unwrap_err(),
            FilterInputError::UnsupportedProtocol
        );
        assert_eq!(
            parse_path("/c(stpp)").unwrap_err(),
            FilterInputError::UnsupportedProtocol
        );
    }

    #[test]
    fn test_unknown_filter() {
        assert_eq!(
            parse_path("/z(1)/master.m3u8").unwrap_err(),
            FilterInputError::UnsupportedFilter {
                name: "z".to_string()
            }
        );
    }

    #[test]
    fn test_filters_only_at_the_front() {
        let parsed = parse_path("/c(stpp)/path/b(1,2)/master.m3u8").unwrap();
        assert_eq!(parsed.manifest_path, "/path/b(1,2)/master.m3u8");
        assert!(parsed.filters.bitrate().is_none());
    }

    #[test]
    fn test_last_repeated_filter_wins() {
        let parsed = parse_path("/c(stpp)/c(wvtt)/master.m3u8").unwrap();
        assert_eq!(parsed.filters.caption_types(), Some(&[CaptionType::from("wvtt")][..]));
    }
}
