//! Supported formats and the reader contract.
//!
//! Every format implements [`SongReader`]: bytes plus a name hint in, zero or
//! more songs plus warnings out. Zero songs means "not this format" and lets the
//! import chain fall through to the next candidate.

pub mod json;
pub mod sniff;
pub mod text;

use std::fmt;

use serde::Serialize;

use crate::chordpro::ChordProReader;
use crate::error::Result;
use crate::model::Song;
use crate::songselect::SongSelectReader;
use crate::xml::{OpenLyricsReader, PartsXmlReader, SongListXmlReader};

pub use json::CanonicalReader;
pub use sniff::{candidates, is_supported_mime, is_supported_path, is_supported_stream, SniffInput};

/// A file format this crate can read, and for ChordPro, write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Format {
    /// The canonical model serialized as JSON.
    Canonical,
    /// Line-oriented ChordPro directives.
    ChordPro,
    /// XML whose root ends in `Song` with numbered part elements.
    PartsXml,
    /// Namespaced `OpenLyrics` XML.
    OpenLyrics,
    /// XML `<songs>` list, one `<song>` per entry.
    SongListXml,
    /// `SongSelect` `.usr` or plain-text export.
    SongSelect,
}

impl Format {
    /// Returns all formats in sniffing priority order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Canonical,
            Self::OpenLyrics,
            Self::PartsXml,
            Self::SongListXml,
            Self::ChordPro,
            Self::SongSelect,
        ]
    }

    /// Returns the human-readable name of this format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Canonical => "Canonical JSON",
            Self::ChordPro => "ChordPro",
            Self::PartsXml => "Parts XML",
            Self::OpenLyrics => "OpenLyrics",
            Self::SongListXml => "Song list XML",
            Self::SongSelect => "SongSelect",
        }
    }

    /// Whether this format is one of the XML dialects.
    #[must_use]
    pub const fn is_xml(self) -> bool {
        matches!(self, Self::PartsXml | Self::OpenLyrics | Self::SongListXml)
    }

    /// What this crate can do with the format.
    #[must_use]
    pub const fn capabilities(self) -> FormatCapability {
        match self {
            Self::ChordPro => FormatCapability::FULL,
            _ => FormatCapability::READ_ONLY,
        }
    }

    /// The reader for this format.
    #[must_use]
    pub fn reader(self) -> &'static dyn SongReader {
        match self {
            Self::Canonical => &CanonicalReader,
            Self::ChordPro => &ChordProReader,
            Self::PartsXml => &PartsXmlReader,
            Self::OpenLyrics => &OpenLyricsReader,
            Self::SongListXml => &SongListXmlReader,
            Self::SongSelect => &SongSelectReader,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capabilities supported by a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatCapability {
    /// Can import songs.
    pub read: bool,
    /// Can export songs.
    pub write: bool,
}

impl FormatCapability {
    /// Read and write.
    pub const FULL: Self = Self { read: true, write: true };

    /// Read only.
    pub const READ_ONLY: Self = Self { read: true, write: false };
}

/// A recoverable problem found while reading; parsing carried on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// 1-based line number, when the format is line-oriented.
    pub line: Option<usize>,
    /// What was skipped and why.
    pub message: String,
}

impl Warning {
    /// Warning tied to a line.
    pub fn at_line(line: usize, message: impl Into<String>) -> Self {
        Self { line: Some(line), message: message.into() }
    }

    /// Warning without a position.
    pub fn new(message: impl Into<String>) -> Self {
        Self { line: None, message: message.into() }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Result of one reader over one stream.
#[derive(Debug, Clone, Default)]
pub struct ReadOutcome {
    /// Songs found; empty means the stream is not in this format.
    pub songs: Vec<Song>,
    /// Recoverable problems.
    pub warnings: Vec<Warning>,
}

impl ReadOutcome {
    /// Outcome with no songs and no warnings.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Reader contract shared by every format.
///
/// Implementations hold no state: each call builds its own parser state, so one
/// reader may serve concurrent imports of different files.
pub trait SongReader: Send + Sync {
    /// The format this reader handles.
    fn format(&self) -> Format;

    /// Read all songs from `input`.
    ///
    /// `name_hint` is a file name or path used for extension checks; it may be
    /// empty.
    fn read(&self, input: &[u8], name_hint: &str) -> Result<ReadOutcome>;
}

/// Lowercased extension of a name hint, if any.
pub(crate) fn extension_of(name_hint: &str) -> Option<String> {
    std::path::Path::new(name_hint)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}
