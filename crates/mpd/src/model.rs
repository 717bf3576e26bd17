//! Typed views over the MPD hierarchy: `MPD → Period → AdaptationSet →
//! Representation`.

use crate::document::{Document, Element};
use crate::error::MpdError;

const MPD: &str = "MPD";
const PERIOD: &str = "Period";
const ADAPTATION_SET: &str = "AdaptationSet";
const REPRESENTATION: &str = "Representation";

/// A DASH Media Presentation Description.
#[derive(Debug, Clone)]
pub struct Mpd {
    document: Document,
}

impl Mpd {
    /// Parses an MPD. The root element must be `MPD`.
    pub fn parse(xml: &str) -> Result<Self, MpdError> {
        let document = Document::parse(xml)?;
        if !document.root().is(MPD) {
            return Err(MpdError::UnexpectedRoot {
                name: String::from_utf8_lossy(document.root().name()).into_owned(),
            });
        }
        Ok(Self { document })
    }

    pub fn periods(&self) -> impl Iterator<Item = Period<'_>> {
        self.document.root().children_named(PERIOD).map(Period)
    }

    pub fn periods_mut(&mut self) -> impl Iterator<Item = PeriodMut<'_>> {
        self.document
            .root_mut()
            .children_named_mut(PERIOD)
            .map(PeriodMut)
    }

    pub fn to_xml_string(&self) -> Result<String, MpdError> {
        self.document.to_xml_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Period<'a>(&'a Element);

impl<'a> Period<'a> {
    pub fn id(&self) -> Option<String> {
        self.0.attribute("id")
    }

    pub fn adaptation_sets(&self) -> impl Iterator<Item = AdaptationSet<'a>> + use<'a> {
        self.0.children_named(ADAPTATION_SET).map(AdaptationSet)
    }
}

#[derive(Debug)]
pub struct PeriodMut<'a>(&'a mut Element);

impl PeriodMut<'_> {
    pub fn adaptation_sets_mut(&mut self) -> impl Iterator<Item = AdaptationSetMut<'_>> {
        self.0
            .children_named_mut(ADAPTATION_SET)
            .map(AdaptationSetMut)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AdaptationSet<'a>(&'a Element);

impl<'a> AdaptationSet<'a> {
    pub fn id(&self) -> Option<String> {
        self.0.attribute("id")
    }

    /// The `contentType` attribute, e.g. `text`, `video` or `audio`.
    pub fn content_type(&self) -> Option<String> {
        self.0.attribute("contentType")
    }

    pub fn representations(&self) -> impl Iterator<Item = Representation<'a>> + use<'a> {
        self.0.children_named(REPRESENTATION).map(Representation)
    }
}

#[derive(Debug)]
pub struct AdaptationSetMut<'a>(&'a mut Element);

impl AdaptationSetMut<'_> {
    pub fn view(&self) -> AdaptationSet<'_> {
        AdaptationSet(&*self.0)
    }

    /// Keeps the representations for which `keep` returns true, in their
    /// original order. Returns how many were dropped.
    pub fn retain_representations(
        &mut self,
        mut keep: impl FnMut(&Representation<'_>) -> bool,
    ) -> usize {
        self.0.retain_children(|element| {
            !element.is(REPRESENTATION) || keep(&Representation(element))
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Representation<'a>(&'a Element);

impl Representation<'_> {
    pub fn id(&self) -> Option<String> {
        self.0.attribute("id")
    }

    pub fn codecs(&self) -> Option<String> {
        self.0.attribute("codecs")
    }

    /// Declared bandwidth in bits per second. Unparsable values read as absent.
    pub fn bandwidth(&self) -> Option<u64> {
        self.0
            .attribute("bandwidth")
            .and_then(|value| value.trim().parse().ok())
    }
}
