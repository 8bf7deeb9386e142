//! Numbered-parts XML reader.
//!
//! Documents whose root element ends in `Song` (`<WorshipSong>`, `<PraiseSong>`)
//! hold metadata elements plus one element per part: `<Verse1>`, `<Chorus>`,
//! `<PreChorus2>`. Element names are matched without regard to case.

use std::sync::LazyLock;

use regex::Regex;

use super::{walk, Inline, RootElement, StartTag, XmlHandler};
use crate::constants::xml::PARTS_ROOT_SUFFIX;
use crate::error::Result;
use crate::formats::{Format, ReadOutcome, SongReader};
use crate::model::{capitalize, Author, AuthorType, Section, Song};

/// Part element: a type followed by an optional number.
#[allow(clippy::expect_used)]
static RE_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(verse|chorus|prechorus|pre-chorus|bridge|tag|ending|intro|outro|interlude)(\d*)$")
        .expect("valid regex: RE_PART")
});

/// Whether a root element belongs to the numbered-parts dialect.
pub fn probe(root: &RootElement) -> bool {
    root.local_name.len() > PARTS_ROOT_SUFFIX.len() && root.local_name.ends_with(PARTS_ROOT_SUFFIX)
}

/// Reader for numbered-parts XML.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartsXmlReader;

impl SongReader for PartsXmlReader {
    fn format(&self) -> Format {
        Format::PartsXml
    }

    fn read(&self, input: &[u8], _name_hint: &str) -> Result<ReadOutcome> {
        match super::probe_root(input) {
            Some(root) if probe(&root) => {}
            _ => return Ok(ReadOutcome::empty()),
        }
        let mut handler = Handler::default();
        let mut outcome = ReadOutcome::empty();
        walk(input, &mut handler, &mut outcome.warnings)?;
        outcome.songs.extend(handler.song.filter(|song| !song.is_blank()));
        Ok(outcome)
    }
}

/// Section name for a part element, or `None` if `name` isn't a part.
fn part_name(name: &str) -> Option<String> {
    let caps = RE_PART.captures(name)?;
    let kind = capitalize(&caps.get(1)?.as_str().to_lowercase());
    match caps.get(2).map(|m| m.as_str()).filter(|n| !n.is_empty()) {
        Some(number) => Some(format!("{kind} {number}")),
        None => Some(kind),
    }
}

#[derive(Default)]
struct Handler {
    song: Option<Song>,
    depth: usize,
}

impl XmlHandler for Handler {
    fn inline(&self, name: &str, _ancestors: &[StartTag]) -> Inline {
        if name.eq_ignore_ascii_case("br") {
            Inline::LineBreak
        } else {
            Inline::Block
        }
    }

    fn start(&mut self, _tag: &StartTag) {
        if self.depth == 0 {
            self.song = Some(Song::new());
        }
        self.depth += 1;
    }

    fn end(&mut self, tag: &StartTag, text: String) {
        self.depth = self.depth.saturating_sub(1);
        let Some(song) = self.song.as_mut() else {
            return;
        };
        if self.depth == 0 {
            return;
        }
        let value = text.trim();

        if let Some(name) = part_name(&tag.name) {
            let body: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
            if body.is_empty() {
                tracing::debug!("dropping empty part <{}>", tag.name);
            } else {
                song.lyrics[0].sections.push(Section::new(name, body.join("\n")));
            }
            return;
        }
        if value.is_empty() {
            return;
        }

        match tag.name.to_ascii_lowercase().as_str() {
            "title" => song.title = value.to_string(),
            "subtitle" => song.variant = value.to_string(),
            "author" => {
                let kind = tag.attr_text("type").and_then(AuthorType::from_label);
                song.lyrics[0].authors.push(Author::new(value, kind));
            }
            "composer" => song.lyrics[0].authors.push(Author::new(value, Some(AuthorType::Music))),
            "copyright" => song.copyright = value.to_string(),
            "ccli" | "cclinumber" => song.ccli = value.to_string(),
            "key" => song.key = value.to_string(),
            "tempo" => song.tempo = value.to_string(),
            "year" => song.released = value.to_string(),
            "publisher" => song.publisher = value.to_string(),
            "keywords" => song.keywords = value.to_string(),
            "theme" => song.add_tag(value),
            "notes" => song.append_notes(value),
            _ => tracing::trace!("ignoring element <{}>", tag.name),
        }
    }
}
