//! HLS manifest filter.
//!
//! Filtering applies to the variant streams of a master playlist. Media
//! playlists carry no variants and are written back unchanged in membership.

use std::collections::HashSet;

use m3u8_rs::{MasterPlaylist, Playlist, VariantStream};
use tracing::debug;

use crate::error::FilterError;
use crate::filter::ManifestFilter;
use crate::media_filters::{BitrateRange, CaptionType, MediaFilters};

const PLAYLIST_HEADER: &str = "#EXTM3U";

/// Codec families that identify caption tracks inside a variant's `CODECS`.
const CAPTION_CODEC_FAMILIES: &[&str] = &["stpp", "wvtt"];

/// [`ManifestFilter`] for HLS playlists.
#[derive(Debug, Clone)]
pub struct HlsFilter {
    manifest_url: String,
    manifest_content: String,
}

impl HlsFilter {
    pub fn new(manifest_url: impl Into<String>, manifest_content: impl Into<String>) -> Self {
        Self {
            manifest_url: manifest_url.into(),
            manifest_content: manifest_content.into(),
        }
    }
}

impl ManifestFilter for HlsFilter {
    fn filter_manifest(&self, filters: &MediaFilters) -> Result<String, FilterError> {
        let content = self.manifest_content.trim_start();
        if !content.starts_with(PLAYLIST_HEADER) {
            return Err(FilterError::HlsHeaderAbsent);
        }

        let playlist =
            m3u8_rs::parse_playlist_res(content.as_bytes()).map_err(|_| FilterError::HlsParse)?;

        let mut output = Vec::new();
        let written = match playlist {
            Playlist::MasterPlaylist(mut master) => {
                if let Some(caption_types) = filters.caption_types() {
                    let removed = filter_caption_types(caption_types, &mut master);
                    debug!(manifest_url = %self.manifest_url, removed, "filtered caption variants");
                }
                if let Some(bitrate) = filters.bitrate() {
                    let removed = filter_bitrate(bitrate, &mut master);
                    debug!(manifest_url = %self.manifest_url, removed, "filtered variants by bitrate");
                }
                master.write_to(&mut output)
            }
            Playlist::MediaPlaylist(media) => media.write_to(&mut output),
        };
        written.map_err(|e| FilterError::HlsWrite {
            reason: e.to_string(),
        })?;

        String::from_utf8(output).map_err(|e| FilterError::HlsWrite {
            reason: e.to_string(),
        })
    }
}

/// Drops variants that declare a caption codec outside `caption_types`.
/// Variants without `CODECS` are kept.
fn filter_caption_types(caption_types: &[CaptionType], playlist: &mut MasterPlaylist) -> usize {
    let supported: HashSet<&str> = caption_types.iter().map(CaptionType::as_str).collect();
    retain_variants(playlist, |variant| {
        variant
            .codecs
            .as_deref()
            .is_none_or(|codecs| captions_supported(codecs, &supported))
    })
}

fn filter_bitrate(bitrate: BitrateRange, playlist: &mut MasterPlaylist) -> usize {
    retain_variants(playlist, |variant| bitrate.contains(variant.bandwidth))
}

fn retain_variants(
    playlist: &mut MasterPlaylist,
    keep: impl FnMut(&VariantStream) -> bool,
) -> usize {
    let before = playlist.variants.len();
    playlist.variants.retain(keep);
    before - playlist.variants.len()
}

/// Whether every caption codec in a `CODECS` list is allowed. An entry such
/// as `stpp.ttml.im1t` matches an allowed value of either the full entry or
/// its family (`stpp`).
fn captions_supported(codecs: &str, supported: &HashSet<&str>) -> bool {
    codecs
        .split(',')
        .map(str::trim)
        .filter(|codec| !codec.is_empty())
        .all(|codec| {
            let family = codec.split('.').next().unwrap_or(codec);
            supported.contains(codec)
                || supported.contains(family)
                || !CAPTION_CODEC_FAMILIES.contains(&family)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = r#"#EXTM3U
#EXT-X-VERSION:6
#EXT-X-INDEPENDENT-SEGMENTS
#EXT-X-STREAM-INF:BANDWIDTH=800000,CODECS="avc1.4d401f,mp4a.40.2",RESOLUTION=640x360
low.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=2500000,CODECS="avc1.4d401f,mp4a.40.2,stpp.ttml.im1t",RESOLUTION=1280x720
mid-stpp.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=2600000,CODECS="avc1.4d401f,mp4a.40.2,wvtt",RESOLUTION=1280x720
mid-wvtt.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=6000000,RESOLUTION=1920x1080
high.m3u8
"#;

    const MEDIA: &str = r#"#EXTM3U
#EXT-X-VERSION:3
#EXT-X-TARGETDURATION:6
#EXT-X-MEDIA-SEQUENCE:0
#EXTINF:6.0,
segment0.ts
#EXTINF:6.0,
segment1.ts
#EXT-X-ENDLIST
"#;

    fn variant_uris(filters: &MediaFilters) -> Vec<String> {
        let output = HlsFilter::new("http://origin/master.m3u8", MASTER)
            .filter_manifest(filters)
            .unwrap();
        match m3u8_rs::parse_playlist_res(output.as_bytes()).unwrap() {
            Playlist::MasterPlaylist(master) => {
                master.variants.into_iter().map(|v| v.uri).collect()
            }
            Playlist::MediaPlaylist(_) => panic!("expected master playlist"),
        }
    }

    #[test]
    fn test_no_filters_keeps_every_variant() {
        assert_eq!(
            variant_uris(&MediaFilters::new()),
            vec!["low.m3u8", "mid-stpp.m3u8", "mid-wvtt.m3u8", "high.m3u8"]
        );
    }

    #[test]
    fn test_caption_family_matches_full_codec() {
        assert_eq!(
            variant_uris(&MediaFilters::new().with_caption_types(["stpp"])),
            vec!["low.m3u8", "mid-stpp.m3u8", "high.m3u8"]
        );
        assert_eq!(
            variant_uris(&MediaFilters::new().with_caption_types(["wvtt"])),
            vec!["low.m3u8", "mid-wvtt.m3u8", "high.m3u8"]
        );
    }

    #[test]
    fn test_empty_caption_list_drops_captioned_variants() {
        assert_eq!(
            variant_uris(&MediaFilters::new().with_caption_types(Vec::<&str>::new())),
            vec!["low.m3u8", "high.m3u8"]
        );
    }

    #[test]
    fn test_bitrate_range() {
        let range = BitrateRange::new(1_000_000, 3_000_000).unwrap();
        assert_eq!(
            variant_uris(&MediaFilters::new().with_bitrate(range)),
            vec!["mid-stpp.m3u8", "mid-wvtt.m3u8"]
        );
    }

    #[test]
    fn test_axes_combine() {
        let filters = MediaFilters::new()
            .with_caption_types(["wvtt"])
            .with_bitrate(BitrateRange::new(0, 3_000_000).unwrap());
        assert_eq!(variant_uris(&filters), vec!["low.m3u8", "mid-wvtt.m3u8"]);
    }

    #[test]
    fn test_media_playlist_passes_through() {
        let output = HlsFilter::new("u", MEDIA)
            .filter_manifest(&MediaFilters::new().with_caption_types(["stpp"]))
            .unwrap();
        match m3u8_rs::parse_playlist_res(output.as_bytes()).unwrap() {
            Playlist::MediaPlaylist(media) => assert_eq!(media.segments.len(), 2),
            Playlist::MasterPlaylist(_) => panic!("expected media playlist"),
        }
    }

    #[test]
    fn test_missing_header() {
        let err = HlsFilter::new("u", "OK")
            .filter_manifest(&MediaFilters::new())
            .unwrap_err();
        assert!(matches!(err, FilterError::HlsHeaderAbsent));
        assert_eq!(err.to_string(), "#EXTM3U absent");
    }

    #[test]
    fn test_captions_supported() {
        let supported: HashSet<&str> = ["stpp"].into_iter().collect();
        assert!(captions_supported("avc1.64001f,mp4a.40.2", &supported));
        assert!(captions_supported("avc1.64001f, stpp.ttml.im1t", &supported));
        assert!(!captions_supported("avc1.64001f,wvtt", &supported));

        let exact: HashSet<&str> = ["stpp.ttml.im1t"].into_iter().collect();
        assert!(captions_supported("stpp.ttml.im1t", &exact));
        assert!(!captions_supported("stpp.ttml.im2t", &exact));
    }
}
