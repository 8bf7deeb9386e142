//! ChordPro import and export.
//!
//! [`classify`] turns each line into a [`classify::Line`], [`builder`] folds
//! those into songs, and [`writer`] emits songs back as ChordPro.

pub mod builder;
pub mod classify;
pub mod directives;
pub mod writer;

use crate::error::Result;
use crate::formats::{text, Format, ReadOutcome, SongReader};

pub use builder::{build, SongBuilder};
pub use writer::{to_string, write_song};

/// Reader for ChordPro files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChordProReader;

impl SongReader for ChordProReader {
    fn format(&self) -> Format {
        Format::ChordPro
    }

    fn read(&self, input: &[u8], name_hint: &str) -> Result<ReadOutcome> {
        let outcome = parse(&text::decode(input));
        tracing::debug!(
            "{name_hint}: {} ChordPro songs, {} warnings",
            outcome.songs.len(),
            outcome.warnings.len()
        );
        Ok(outcome)
    }
}

/// Parse ChordPro text. Never fails; see [`build`].
pub fn parse(text: &str) -> ReadOutcome {
    build(text)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn reader_decodes_bytes() {
        let input = b"\xef\xbb\xbf{title: Be Still}\r\nBe still my soul\r\n";
        let outcome = ChordProReader.read(input, "be-still.cho").unwrap();
        assert_eq!(outcome.songs[0].title, "Be Still");
        assert_eq!(outcome.songs[0].lyrics[0].sections[0].text, "Be still my soul");
    }

    #[test]
    fn plain_text_is_not_chordpro() {
        let outcome = ChordProReader.read(b"Amazing Grace\n\nverse", "a.txt").unwrap();
        assert!(outcome.songs.is_empty());
    }
}
