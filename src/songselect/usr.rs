//! `.usr` key=value exports.
//!
//! `Fields=` and `Words=` are parallel `/t`-separated lists: the n-th field
//! names the n-th block of words. Either list may be longer than the other.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::songselect::{FIELD_SEPARATOR, LINE_SEPARATOR};
use crate::formats::{ReadOutcome, Warning};
use crate::model::{Author, Section, SectionNamer, Song};

/// `[S A12345]` song header carrying the CCLI number.
#[allow(clippy::expect_used)]
static RE_SONG_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[S\s*A?(\d+)\]").expect("valid regex: RE_SONG_HEADER")
});

#[derive(Debug, Default)]
struct Slot {
    name: Option<String>,
    suffix: Option<String>,
    lines: Vec<String>,
}

fn slot(slots: &mut Vec<Slot>, idx: usize) -> &mut Slot {
    if slots.len() <= idx {
        slots.resize_with(idx + 1, Slot::default);
    }
    &mut slots[idx]
}

/// Parse a `.usr` file into at most one song.
pub fn parse(text: &str) -> ReadOutcome {
    let mut outcome = ReadOutcome::empty();
    let mut song = Song::new();
    let mut slots: Vec<Slot> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if let Some(caps) = RE_SONG_HEADER.captures(line) {
            if let Some(number) = caps.get(1) {
                song.ccli = number.as_str().to_string();
            }
            continue;
        }
        if line.is_empty() || line.starts_with('[') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            tracing::warn!("line {}: not a key=value pair", idx + 1);
            outcome.warnings.push(Warning::at_line(idx + 1, "expected key=value"));
            continue;
        };
        let value = value.trim();

        match key.trim().to_ascii_lowercase().as_str() {
            "title" => song.title = value.to_string(),
            "author" => {
                let authors = &mut song.lyrics[0].authors;
                authors.extend(
                    value
                        .split('|')
                        .map(str::trim)
                        .filter(|a| !a.is_empty())
                        .map(|a| Author::new(a, None)),
                );
            }
            "copyright" => song.copyright = value.to_string(),
            "themes" => value.split(FIELD_SEPARATOR).for_each(|theme| song.add_tag(theme)),
            "keys" => {
                if let Some(key) = value.split(FIELD_SEPARATOR).map(str::trim).find(|k| !k.is_empty()) {
                    song.key = key.to_string();
                }
            }
            "fields" => {
                for (n, name) in value.split(FIELD_SEPARATOR).enumerate() {
                    let name = name.trim();
                    if !name.is_empty() {
                        slot(&mut slots, n).name = Some(name.to_string());
                    }
                }
            }
            "words" => {
                for (n, words) in value.split(FIELD_SEPARATOR).enumerate() {
                    let target = slot(&mut slots, n);
                    let mut word_lines = words.split(LINE_SEPARATOR).map(str::trim).filter(|l| !l.is_empty());
                    if let Some(first) = word_lines.next() {
                        if first.starts_with('(') {
                            target.suffix = Some(first.to_string());
                        } else {
                            target.lines.push(first.to_string());
                        }
                    }
                    target.lines.extend(word_lines.map(String::from));
                }
            }
            "type" => tracing::debug!("SongSelect file type {value}"),
            other => tracing::trace!("ignoring usr key {other}"),
        }
    }

    let mut namer = SectionNamer::new();
    for slot in slots {
        if slot.lines.is_empty() {
            continue;
        }
        let base = slot.name.unwrap_or_else(|| namer.next("verse"));
        let name = match slot.suffix {
            Some(suffix) => format!("{base} {suffix}"),
            None => base,
        };
        song.lyrics[0].sections.push(Section::new(name, slot.lines.join("\n")));
    }

    if song.is_blank() {
        tracing::debug!("usr file held no song data");
    } else {
        outcome.songs.push(song);
    }
    outcome
}
