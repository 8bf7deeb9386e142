//! XML dialects.
//!
//! [`walk`] turns a quick-xml event stream into `start` / `end` callbacks on an
//! [`XmlHandler`]. Each block element owns the text collected between its start
//! and end tags; inline elements are resolved by the handler through
//! [`Inline`].

pub mod openlyrics;
pub mod parts;
pub mod songs;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::formats::{text, Warning};

pub use openlyrics::OpenLyricsReader;
pub use parts::PartsXmlReader;
pub use songs::SongListXmlReader;

/// How an element takes part in text collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inline {
    /// Collects its own text and is reported through [`XmlHandler::end`].
    Block,
    /// Its text flows into the enclosing block.
    Transparent,
    /// Adds a newline to the enclosing block.
    LineBreak,
    /// Its text is dropped.
    Skip,
}

/// An opened element: local name and attributes with namespace declarations
/// removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Local name, without prefix.
    pub name: String,
    /// `(local name, unescaped value)` pairs in document order.
    pub attributes: Vec<(String, String)>,
}

impl StartTag {
    /// Value of the attribute with local name `key`.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Trimmed, non-empty attribute value.
    pub fn attr_text(&self, key: &str) -> Option<&str> {
        self.attr(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Whether the element is named `name`, ignoring case.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Dialect callbacks driven by [`walk`].
pub trait XmlHandler {
    /// Role of element `name` opened inside `ancestors` (outermost first).
    fn inline(&self, name: &str, ancestors: &[StartTag]) -> Inline;

    /// A block element opened.
    fn start(&mut self, tag: &StartTag);

    /// A block element closed; `text` is everything collected inside it.
    fn end(&mut self, tag: &StartTag, text: String);
}

/// Root element of a document, as seen by the sniffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootElement {
    /// Local name.
    pub local_name: String,
    /// Namespace bound to the element's prefix, or the default namespace.
    pub namespace: Option<String>,
}

struct Frame {
    kind: Inline,
    text: String,
}

/// Drive `handler` over the document in `input`.
///
/// Malformed XML, mismatched tags and unterminated documents are fatal.
/// Undecodable entities become warnings and keep their raw text.
pub fn walk(input: &[u8], handler: &mut impl XmlHandler, warnings: &mut Vec<Warning>) -> Result<()> {
    let decoded = text::decode(input);
    let mut reader = Reader::from_str(&decoded);
    reader.expand_empty_elements(true);

    let mut tags: Vec<StartTag> = Vec::new();
    let mut frames: Vec<Frame> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::xml(format!("XML parse error at position {}: {e}", reader.buffer_position()))
        })?;
        match event {
            Event::Start(ref e) => {
                let tag = start_tag(e, warnings)?;
                let kind = handler.inline(&tag.name, &tags);
                match kind {
                    Inline::Block => handler.start(&tag),
                    Inline::LineBreak => push_text(&mut frames, "\n"),
                    Inline::Transparent | Inline::Skip => {}
                }
                tags.push(tag);
                frames.push(Frame { kind, text: String::new() });
            }
            Event::End(_) => {
                let (Some(tag), Some(frame)) = (tags.pop(), frames.pop()) else {
                    return Err(Error::xml(format!(
                        "unbalanced end tag at position {}",
                        reader.buffer_position()
                    )));
                };
                if frame.kind == Inline::Block {
                    handler.end(&tag, frame.text);
                }
            }
            Event::Text(ref t) => {
                let content = t.unescape().map_or_else(
                    |e| {
                        let position = reader.buffer_position();
                        tracing::warn!("undecodable text at position {position}: {e}");
                        warnings.push(Warning::new(format!("undecodable text at position {position}: {e}")));
                        String::from_utf8_lossy(t).into_owned()
                    },
                    |s| s.into_owned(),
                );
                push_text(&mut frames, &content);
            }
            Event::CData(ref c) => push_text(&mut frames, &String::from_utf8_lossy(c)),
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = tags.last() {
        return Err(Error::xml(format!("unexpected end of document inside <{}>", open.name)));
    }
    Ok(())
}

/// Append to the nearest block, unless a skipped element is in the way.
fn push_text(frames: &mut [Frame], content: &str) {
    for frame in frames.iter_mut().rev() {
        match frame.kind {
            Inline::Skip => return,
            Inline::Block => {
                frame.text.push_str(content);
                return;
            }
            Inline::Transparent | Inline::LineBreak => {}
        }
    }
}

fn start_tag(e: &BytesStart<'_>, warnings: &mut Vec<Warning>) -> Result<StartTag> {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::xml(format!("bad attribute on <{name}>: {err}")))?;
        let qualified = attr.key.as_ref();
        if qualified == b"xmlns" || qualified.starts_with(b"xmlns:") {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = match attr.unescape_value() {
            Ok(v) => v.into_owned(),
            Err(err) => {
                tracing::warn!("undecodable attribute {key} on <{name}>: {err}");
                warnings.push(Warning::new(format!("undecodable attribute {key} on <{name}>: {err}")));
                String::from_utf8_lossy(&attr.value).into_owned()
            }
        };
        attributes.push((key, value));
    }
    Ok(StartTag { name, attributes })
}

/// First element of a (possibly truncated) document, or `None` if the prefix
/// doesn't reach one.
pub fn probe_root(prefix: &[u8]) -> Option<RootElement> {
    let decoded = text::decode(prefix);
    let mut reader = Reader::from_str(&decoded);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) => return Some(root_element(&e)),
            Ok(Event::Eof) => return None,
            Ok(_) => {}
            Err(e) => {
                tracing::trace!("XML probe failed at position {}: {e}", reader.buffer_position());
                return None;
            }
        }
    }
}

fn root_element(e: &BytesStart<'_>) -> RootElement {
    let qualified = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let (prefix, local_name) = match qualified.split_once(':') {
        Some((prefix, local)) => (Some(prefix.to_string()), local.to_string()),
        None => (None, qualified.clone()),
    };
    let binding = prefix.map_or_else(|| "xmlns".to_string(), |p| format!("xmlns:{p}"));
    let namespace = e
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == binding.as_bytes())
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.trim().to_string()));
    RootElement { local_name, namespace }
}
