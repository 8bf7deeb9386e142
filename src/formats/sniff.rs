//! Format sniffing.
//!
//! Decides which readers are worth trying for a resource, most specific first,
//! from its name, declared MIME type and a peek at the first bytes. Sniffing
//! never fails: a probe that can't decide drops its candidate.

use std::path::Path;

use super::text::significant_prefix;
use super::{extension_of, Format};
use crate::constants::sniff::{
    CHORDPRO_EXTENSIONS, JSON_EXTENSIONS, TEXT_EXTENSIONS, USR_EXTENSIONS, XML_EXTENSIONS,
};
use crate::xml::{self, RootElement};

/// XML dialects in probe order; the song-list dialect is the last resort.
const XML_DIALECTS: &[Format] = &[Format::OpenLyrics, Format::PartsXml, Format::SongListXml];

/// What is known about a resource before reading it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SniffInput<'a> {
    /// File name or path.
    pub path: Option<&'a Path>,
    /// Declared MIME type.
    pub mime: Option<&'a str>,
    /// Leading bytes of the stream.
    pub prefix: Option<&'a [u8]>,
}

impl<'a> SniffInput<'a> {
    /// Sniff input for a named stream with a peeked prefix.
    pub fn named(name: &'a str, prefix: &'a [u8]) -> Self {
        Self { path: Some(Path::new(name)), mime: None, prefix: Some(prefix) }
    }
}

/// Ordered, de-duplicated list of formats to try.
pub fn candidates(input: &SniffInput<'_>) -> Vec<Format> {
    let mut found: Vec<Format> = Vec::new();
    let mut push = |format: Format| {
        if !found.contains(&format) {
            found.push(format);
        }
    };

    let mut xml_probed = false;
    if let Some(prefix) = input.prefix {
        let head = significant_prefix(prefix);
        if looks_like_json(head) {
            tracing::debug!("JSON-shaped stream, using the canonical reader");
            return vec![Format::Canonical];
        }
        if head.starts_with(b"<") {
            xml_probed = true;
            match xml::probe_root(prefix) {
                Some(root) => {
                    for &format in XML_DIALECTS {
                        if dialect_accepts(format, &root) {
                            push(format);
                        } else {
                            tracing::trace!("{format} probe rejected root <{}>", root.local_name);
                        }
                    }
                }
                None => tracing::trace!("no readable XML root element in prefix"),
            }
        }
    }

    let ext = input
        .path
        .and_then(|p| p.to_str())
        .and_then(extension_of);
    if let Some(ext) = ext.as_deref() {
        if CHORDPRO_EXTENSIONS.contains(&ext) {
            push(Format::ChordPro);
        } else if USR_EXTENSIONS.contains(&ext) {
            push(Format::SongSelect);
        } else if TEXT_EXTENSIONS.contains(&ext) {
            push(Format::ChordPro);
            push(Format::SongSelect);
        } else if JSON_EXTENSIONS.contains(&ext) {
            push(Format::Canonical);
        } else if XML_EXTENSIONS.contains(&ext) && !xml_probed {
            XML_DIALECTS.iter().copied().for_each(&mut push);
        }
    }

    if let Some(mime) = input.mime {
        match normalize_mime(mime).as_str() {
            "text/plain" => {
                push(Format::ChordPro);
                push(Format::SongSelect);
            }
            "application/json" => push(Format::Canonical),
            "text/xml" | "application/xml" if !xml_probed => {
                XML_DIALECTS.iter().copied().for_each(&mut push);
            }
            other => tracing::trace!("MIME type {other} matches no reader"),
        }
    }

    found
}

/// Whether any reader accepts files with this name.
pub fn is_supported_path(path: &Path) -> bool {
    !candidates(&SniffInput { path: Some(path), ..SniffInput::default() }).is_empty()
}

/// Whether any reader accepts this MIME type.
pub fn is_supported_mime(mime: &str) -> bool {
    !candidates(&SniffInput { mime: Some(mime), ..SniffInput::default() }).is_empty()
}

/// Whether any reader accepts a stream with this name and prefix.
pub fn is_supported_stream(name: &str, prefix: &[u8]) -> bool {
    !candidates(&SniffInput::named(name, prefix)).is_empty()
}

fn dialect_accepts(format: Format, root: &RootElement) -> bool {
    match format {
        Format::OpenLyrics => xml::openlyrics::probe(root),
        Format::PartsXml => xml::parts::probe(root),
        Format::SongListXml => xml::songs::probe(root),
        Format::Canonical | Format::ChordPro | Format::SongSelect => false,
    }
}

/// `{` followed by a key or `}`, or `[` followed by an object or `]`.
///
/// A ChordPro `{title: ...}` line does not qualify.
fn looks_like_json(head: &[u8]) -> bool {
    let Some((&first, rest)) = head.split_first() else {
        return false;
    };
    let next = rest.iter().find(|b| !b.is_ascii_whitespace()).copied();
    match first {
        b'{' => matches!(next, Some(b'"' | b'}')),
        b'[' => matches!(next, Some(b'{' | b']')),
        _ => false,
    }
}

fn normalize_mime(mime: &str) -> String {
    mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}
