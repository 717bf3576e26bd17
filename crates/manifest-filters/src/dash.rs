//! DASH manifest filter.

use std::collections::HashSet;

use mpd::Mpd;
use tracing::debug;

use crate::error::FilterError;
use crate::filter::ManifestFilter;
use crate::media_filters::{BitrateRange, CaptionType, MediaFilters};

const TEXT_CONTENT_TYPE: &str = "text";

/// [`ManifestFilter`] for DASH MPDs.
#[derive(Debug, Clone)]
pub struct DashFilter {
    manifest_url: String,
    manifest_content: String,
}

impl DashFilter {
    pub fn new(manifest_url: impl Into<String>, manifest_content: impl Into<String>) -> Self {
        Self {
            manifest_url: manifest_url.into(),
            manifest_content: manifest_content.into(),
        }
    }
}

impl ManifestFilter for DashFilter {
    fn filter_manifest(&self, filters: &MediaFilters) -> Result<String, FilterError> {
        let mut manifest = Mpd::parse(&self.manifest_content)?;

        if let Some(caption_types) = filters.caption_types() {
            let removed = filter_caption_types(caption_types, &mut manifest);
            debug!(manifest_url = %self.manifest_url, removed, "filtered caption representations");
        }

        if let Some(bitrate) = filters.bitrate() {
            let removed = filter_bitrate(bitrate, &mut manifest);
            debug!(manifest_url = %self.manifest_url, removed, "filtered representations by bitrate");
        }

        Ok(manifest.to_xml_string()?)
    }
}

/// Drops text representations whose codecs are not in `caption_types`.
///
/// Only adaptation sets with `contentType="text"` are touched. Representations
/// without `codecs` are kept. A set left without representations stays in its
/// period.
fn filter_caption_types(caption_types: &[CaptionType], manifest: &mut Mpd) -> usize {
    let supported: HashSet<&str> = caption_types.iter().map(CaptionType::as_str).collect();
    let mut removed = 0;

    for mut period in manifest.periods_mut() {
        for mut adaptation_set in period.adaptation_sets_mut() {
            let Some(content_type) = adaptation_set.view().content_type() else {
                continue;
            };
            if content_type != TEXT_CONTENT_TYPE {
                continue;
            }

            removed += adaptation_set.retain_representations(|representation| {
                representation
                    .codecs()
                    .is_none_or(|codecs| supported.contains(codecs.as_str()))
            });
        }
    }

    removed
}

/// Drops representations whose bandwidth falls outside `bitrate`, in every
/// adaptation set. Representations without a bandwidth are kept.
fn filter_bitrate(bitrate: BitrateRange, manifest: &mut Mpd) -> usize {
    let mut removed = 0;

    for mut period in manifest.periods_mut() {
        for mut adaptation_set in period.adaptation_sets_mut() {
            removed += adaptation_set.retain_representations(|representation| {
                representation
                    .bandwidth()
                    .is_none_or(|bandwidth| bitrate.contains(bandwidth))
            });
        }
    }

    removed
}
