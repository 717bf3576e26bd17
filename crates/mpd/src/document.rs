//! Lossless XML element tree.
//!
//! Elements keep their start tag exactly as read (name, attribute order,
//! quoting, namespace declarations). Text, comments, CDATA and processing
//! instructions are kept as raw events, so writing an unmodified document
//! reproduces the input modulo self-closing normalisation of end tags.

use std::io::Write;

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::MpdError;

/// A child of an [`Element`].
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    /// Anything that is not an element, stored as read.
    Other(Event<'static>),
}

impl Node {
    fn is_whitespace(&self) -> bool {
        match self {
            Node::Other(Event::Text(text)) => text.iter().all(u8::is_ascii_whitespace),
            _ => false,
        }
    }

    fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), MpdError> {
        match self {
            Node::Element(element) => element.write(writer),
            Node::Other(event) => writer.write_event(event.clone()).map_err(MpdError::write),
        }
    }
}

/// An XML element and its children.
#[derive(Debug, Clone)]
pub struct Element {
    start: BytesStart<'static>,
    children: Vec<Node>,
    self_closing: bool,
}

impl Element {
    fn new(start: BytesStart<'static>, self_closing: bool) -> Self {
        Self {
            start,
            children: Vec::new(),
            self_closing,
        }
    }

    /// Qualified name as written, e.g. `AdaptationSet` or `cenc:pssh`.
    pub fn name(&self) -> &[u8] {
        self.start.name().0
    }

    /// Name without namespace prefix.
    pub fn local_name(&self) -> &[u8] {
        let name = self.name();
        match name.iter().rposition(|b| *b == b':') {
            Some(index) => &name[index + 1..],
            None => name,
        }
    }

    /// Whether the element's local name equals `local_name`.
    pub fn is(&self, local_name: &str) -> bool {
        self.local_name() == local_name.as_bytes()
    }

    /// Unescaped attribute value. Malformed attributes read as absent.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.start
            .try_get_attribute(name)
            .ok()
            .flatten()
            .and_then(|attr| attr.unescape_value().ok().map(|value| value.into_owned()))
    }

    /// Child elements in document order.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Other(_) => None,
        })
    }

    /// Child elements with the given local name.
    pub fn children_named<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children().filter(move |element| element.is(local_name))
    }

    /// Mutable child elements with the given local name.
    pub fn children_named_mut<'a>(
        &'a mut self,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a mut Element> {
        self.children.iter_mut().filter_map(move |node| match node {
            Node::Element(element) if element.is(local_name) => Some(element),
            _ => None,
        })
    }

    /// Keeps the child elements for which `keep` returns true, preserving
    /// order. Non-element children are untouched except for the whitespace
    /// run directly preceding a removed element. Returns how many elements
    /// were removed.
    pub fn retain_children(&mut self, mut keep: impl FnMut(&Element) -> bool) -> usize {
        let mut removed = 0;
        let mut kept: Vec<Node> = Vec::with_capacity(self.children.len());

        for node in std::mem::take(&mut self.children) {
            match node {
                Node::Element(element) if !keep(&element) => {
                    removed += 1;
                    if kept.last().is_some_and(Node::is_whitespace) {
                        kept.pop();
                    }
                }
                node => kept.push(node),
            }
        }

        self.children = kept;
        removed
    }

    fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), MpdError> {
        if self.self_closing && self.children.is_empty() {
            return writer
                .write_event(Event::Empty(self.start.clone()))
                .map_err(MpdError::write);
        }

        writer
            .write_event(Event::Start(self.start.clone()))
            .map_err(MpdError::write)?;
        for child in &self.children {
            child.write(writer)?;
        }
        writer
            .write_event(Event::End(self.start.to_end()))
            .map_err(MpdError::write)
    }
}

/// A parsed XML document: the root element plus whatever surrounds it
/// (declaration, comments, trailing whitespace).
#[derive(Debug, Clone)]
pub struct Document {
    prolog: Vec<Event<'static>>,
    root: Element,
    epilog: Vec<Event<'static>>,
}

impl Document {
    pub fn parse(xml: &str) -> Result<Self, MpdError> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Element::new(start.into_owned(), false)),
                Event::Empty(start) => {
                    let element = Element::new(start.into_owned(), true);
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(end) => {
                    let element = stack.pop().ok_or_else(|| MpdError::UnexpectedEnd {
                        name: String::from_utf8_lossy(end.name().0).into_owned(),
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Eof => break,
                other => {
                    let other = other.into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Other(other)),
                        None if root.is_none() => prolog.push(other),
                        None => epilog.push(other),
                    }
                }
            }
        }

        if !stack.is_empty() {
            return Err(MpdError::UnexpectedEof);
        }
        let root = root.ok_or(MpdError::UnexpectedEof)?;

        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn to_xml_string(&self) -> Result<String, MpdError> {
        let mut writer = Writer::new(Vec::new());
        for event in &self.prolog {
            writer
                .write_event(event.clone())
                .map_err(MpdError::write)?;
        }
        self.root.write(&mut writer)?;
        for event in &self.epilog {
            writer
                .write_event(event.clone())
                .map_err(MpdError::write)?;
        }
        String::from_utf8(writer.into_inner()).map_err(MpdError::write)
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), MpdError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err(MpdError::MultipleRoots),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- generated -->
<root xmlns:x="urn:x" a="1">
  <child id="one"/>
  <x:child id="two">text &amp; more</x:child>
  <other><![CDATA[raw]]></other>
</root>
"#;

    #[test]
    fn test_unmodified_document_writes_back_identically() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(doc.to_xml_string().unwrap(), SAMPLE);
    }

    #[test]
    fn test_names_and_attributes() {
        let doc = Document::parse(SAMPLE).unwrap();
        let root = doc.root();
        assert!(root.is("root"));
        assert_eq!(root.attribute("a").as_deref(), Some("1"));
        assert_eq!(root.attribute("missing"), None);

        let ids: Vec<_> = root
            .children_named("child")
            .filter_map(|c| c.attribute("id"))
            .collect();
        assert_eq!(ids, vec!["one", "two"]);

        let prefixed = root.children().nth(1).unwrap();
        assert_eq!(prefixed.name(), b"x:child");
        assert_eq!(prefixed.local_name(), b"child");
    }

    #[test]
    fn test_retain_children_drops_indentation_of_removed_nodes() {
        let mut doc = Document::parse("<r>\n  <a/>\n  <b/>\n  <a/>\n</r>").unwrap();
        let removed = doc.root_mut().retain_children(|c| !c.is("b"));
        assert_eq!(removed, 1);
        assert_eq!(doc.to_xml_string().unwrap(), "<r>\n  <a/>\n  <a/>\n</r>");
    }

    #[test]
    fn test_retain_children_keeps_order() {
        let mut doc = Document::parse(r#"<r><a n="1"/><b/><a n="2"/><a n="3"/></r>"#).unwrap();
        doc.root_mut().retain_children(|c| c.attribute("n").as_deref() != Some("2"));
        let order: Vec<_> = doc
            .root()
            .children()
            .map(|c| c.attribute("n").unwrap_or_default())
            .collect();
        assert_eq!(order, vec!["1", "", "3"]);
    }

    #[test]
    fn test_empty_input_is_eof() {
        assert!(matches!(Document::parse(""), Err(MpdError::UnexpectedEof)));
        assert!(matches!(Document::parse("OK"), Err(MpdError::UnexpectedEof)));
        assert_eq!(Document::parse("").unwrap_err().to_string(), "EOF");
    }

    #[test]
    fn test_unclosed_root_is_an_error() {
        assert!(Document::parse("<r><a>").is_err());
    }

    #[test]
    fn test_multiple_roots_rejected() {
        assert!(matches!(
            Document::parse("<a/><b/>"),
            Err(MpdError::MultipleRoots)
        ));
    }
}
