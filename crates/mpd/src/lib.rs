//! DASH Media Presentation Description (MPD) handling.
//!
//! The document is held as a lossless XML tree so that anything not modelled
//! here (segment templates, content protection, vendor extensions) is written
//! back exactly as it was read. The typed views in [`model`] expose the parts
//! of the hierarchy that filtering needs.

pub mod document;
pub mod error;
pub mod model;

pub use document::{Document, Element, Node};
pub use error::MpdError;
pub use model::{AdaptationSet, AdaptationSetMut, Mpd, Period, PeriodMut, Representation};
