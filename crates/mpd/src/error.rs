/// Errors raised while reading or writing an MPD document.
///
/// Messages carry their scope as the first `": "` separated segment so they
/// can be keyed by callers that split on it.
#[derive(Debug, thiserror::Error)]
pub enum MpdError {
    /// The input ended before a complete root element was read. This is also
    /// what an empty or non-XML body produces.
    #[error("EOF")]
    UnexpectedEof,

    #[error("DASH: malformed document: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("DASH: unexpected closing tag: {name}")]
    UnexpectedEnd { name: String },

    #[error("DASH: multiple root elements")]
    MultipleRoots,

    #[error("DASH: unexpected root element: {name}")]
    UnexpectedRoot { name: String },

    #[error("DASH: failed to write document: {reason}")]
    Write { reason: String },
}

impl MpdError {
    pub(crate) fn write(err: impl std::fmt::Display) -> Self {
        Self::Write {
            reason: err.to_string(),
        }
    }
}
