//! `SongSelect` exports.
//!
//! Two sub-formats share one reader: the `.usr` key=value file and the plain
//! text export. Which one applies is decided once per file from the extension
//! and the first lines.

pub mod text;
pub mod usr;

use crate::constants::sniff::{TEXT_EXTENSIONS, USR_EXTENSIONS};
use crate::constants::songselect::USR_HEADER;
use crate::error::Result;
use crate::formats::{self, extension_of, Format, ReadOutcome, SongReader};

/// The two `SongSelect` layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// `[File]` header followed by `Key=Value` lines.
    Usr,
    /// Title, blank-line separated sections, license footer.
    Text,
}

/// Pick the layout for a file, or `None` if neither fits.
pub fn detect(text: &str, name_hint: &str) -> Option<Variant> {
    let ext = extension_of(name_hint);
    let first_significant = text.lines().map(str::trim).find(|l| !l.is_empty());

    if ext.as_deref().is_some_and(|e| USR_EXTENSIONS.contains(&e)) || first_significant == Some(USR_HEADER) {
        return Some(Variant::Usr);
    }
    let text_like = ext.as_deref().map_or(true, |e| TEXT_EXTENSIONS.contains(&e));
    let titled = text.lines().next().is_some_and(|l| !l.trim().is_empty());
    (text_like && titled).then_some(Variant::Text)
}

/// Reader for `SongSelect` exports.
#[derive(Debug, Clone, Copy, Default)]
pub struct SongSelectReader;

impl SongReader for SongSelectReader {
    fn format(&self) -> Format {
        Format::SongSelect
    }

    fn read(&self, input: &[u8], name_hint: &str) -> Result<ReadOutcome> {
        let decoded = formats::text::decode(input);
        let outcome = match detect(&decoded, name_hint) {
            Some(Variant::Usr) => usr::parse(&decoded),
            Some(Variant::Text) => text::parse(&decoded),
            None => {
                tracing::debug!("{name_hint}: not a SongSelect export");
                ReadOutcome::empty()
            }
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usr_by_extension_or_header() {
        assert_eq!(detect("Title=A", "a.usr"), Some(Variant::Usr));
        assert_eq!(detect("\n[File]\nTitle=A", "export"), Some(Variant::Usr));
    }

    #[test]
    fn text_needs_title_line() {
        assert_eq!(detect("Amazing Grace\n\n\nVerse 1", "a.txt"), Some(Variant::Text));
        assert_eq!(detect("Amazing Grace", ""), Some(Variant::Text));
        assert_eq!(detect("\nAmazing Grace", "a.txt"), None);
        assert_eq!(detect("Amazing Grace", "a.cho"), None);
    }
}
