//! Plain-text `SongSelect` exports.
//!
//! ```text
//! Amazing Grace
//!
//!
//! Verse 1
//! Amazing grace how sweet the sound
//!
//!
//! Chorus
//! (Repeat)
//! My chains are gone
//!
//!
//! CCLI Song # 22025
//! John Newton / Edwin Excell
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::songselect::{LICENSE_MARKER, SECTION_BREAK_BLANKS};
use crate::formats::ReadOutcome;
use crate::model::{Author, Section, Song};

#[allow(clippy::expect_used)]
static RE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex: RE_NUMBER"));

/// Parse a text export. Yields no song unless at least one section has text.
pub fn parse(text: &str) -> ReadOutcome {
    let mut lines = text.lines().map(str::trim);
    let Some(title) = lines.next().filter(|t| !t.is_empty()) else {
        return ReadOutcome::empty();
    };

    let mut song = Song::new();
    song.title = title.to_string();

    let mut sections: Vec<Section> = Vec::new();
    let mut pending_name = true;
    let mut blanks = 0;

    while let Some(line) = lines.next() {
        if line.is_empty() {
            blanks += 1;
            continue;
        }
        if blanks >= SECTION_BREAK_BLANKS {
            pending_name = true;
        }
        blanks = 0;

        if line.starts_with(LICENSE_MARKER) {
            if let Some(number) = RE_NUMBER.find(line) {
                song.ccli = number.as_str().to_string();
            }
            if let Some(credits) = lines.next() {
                song.lyrics[0].authors.extend(
                    credits
                        .split('/')
                        .map(str::trim)
                        .filter(|a| !a.is_empty())
                        .map(|a| Author::new(a, None)),
                );
            }
            break;
        }

        if pending_name {
            sections.push(Section::new(line, String::new()));
            pending_name = false;
            continue;
        }
        let Some(section) = sections.last_mut() else {
            continue;
        };
        if line.starts_with('(') {
            section.name.push(' ');
            section.name.push_str(line);
        } else {
            section.push_line(line);
        }
    }

    sections.retain(|s| !s.is_blank());
    if sections.is_empty() {
        tracing::debug!("text export '{title}' has no sections");
        return ReadOutcome::empty();
    }
    song.lyrics[0].sections = sections;
    ReadOutcome { songs: vec![song], warnings: Vec::new() }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    const EXPORT: &str = "Amazing Grace\n\n\nVerse 1\nAmazing grace how sweet the sound\n\nThat saved a wretch like me\n\n\nChorus\n(Repeat)\nMy chains are gone\n\n\nCCLI Song # 22025\nJohn Newton / Edwin Excell\nFor use solely with the SongSelect Terms of Use\n";

    #[test]
    fn parses_sections_and_footer() {
        let outcome = parse(EXPORT);
        let song = &outcome.songs[0];
        assert_eq!(song.title, "Amazing Grace");
        assert_eq!(song.ccli, "22025");
        let lyrics = &song.lyrics[0];
        let authors: Vec<&str> = lyrics.authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(authors, vec!["John Newton", "Edwin Excell"]);
        assert_eq!(
            lyrics.sections,
            vec![
                Section::new("Verse 1", "Amazing grace how sweet the sound\nThat saved a wretch like me"),
                Section::new("Chorus (Repeat)", "My chains are gone"),
            ]
        );
    }

    #[test]
    fn single_blank_line_does_not_split() {
        let outcome = parse("Title\n\n\nVerse 1\nline one\n\nline two\n");
        assert_eq!(outcome.songs[0].lyrics[0].sections.len(), 1);
    }

    #[test]
    fn parenthesised_line_mid_section_refines_name() {
        let outcome = parse("Title\n\n\nVerse 1\nline one\n(x2)\nline two\n");
        assert_eq!(
            outcome.songs[0].lyrics[0].sections,
            vec![Section::new("Verse 1 (x2)", "line one\nline two")]
        );
    }

    #[test]
    fn title_only_is_not_a_song() {
        assert!(parse("Just a title\n").songs.is_empty());
        assert!(parse("").songs.is_empty());
    }
}
