//! Song-list XML reader.
//!
//! A `<songs>` root without namespace holds one `<song>` per entry. Lyrics come
//! either as named `<section>` elements or as one `<lyrics>` block whose
//! paragraphs become verses.

use super::{walk, Inline, RootElement, StartTag, XmlHandler};
use crate::constants::xml::SONG_LIST_ROOT;
use crate::error::Result;
use crate::formats::{Format, ReadOutcome, SongReader, Warning};
use crate::model::{Author, AuthorType, Section, SectionNamer, Song, SongBook};

/// Whether a root element is a plain song list.
pub fn probe(root: &RootElement) -> bool {
    root.local_name == SONG_LIST_ROOT && root.namespace.is_none()
}

/// Reader for song-list XML.
#[derive(Debug, Clone, Copy, Default)]
pub struct SongListXmlReader;

impl SongReader for SongListXmlReader {
    fn format(&self) -> Format {
        Format::SongListXml
    }

    fn read(&self, input: &[u8], _name_hint: &str) -> Result<ReadOutcome> {
        match super::probe_root(input) {
            Some(root) if probe(&root) => {}
            _ => return Ok(ReadOutcome::empty()),
        }
        let mut handler = Handler::default();
        let mut outcome = ReadOutcome::empty();
        walk(input, &mut handler, &mut outcome.warnings)?;
        outcome.songs = handler.songs;
        outcome.warnings.append(&mut handler.warnings);
        Ok(outcome)
    }
}

/// Split loose text into paragraphs of trimmed, non-blank lines.
fn paragraphs(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                found.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        found.push(current.join("\n"));
    }
    found
}

#[derive(Default)]
struct Handler {
    songs: Vec<Song>,
    warnings: Vec<Warning>,
    current: Option<(Song, SectionNamer)>,
    depth: usize,
}

impl XmlHandler for Handler {
    fn inline(&self, name: &str, _ancestors: &[StartTag]) -> Inline {
        if name == "br" {
            Inline::LineBreak
        } else {
            Inline::Block
        }
    }

    fn start(&mut self, tag: &StartTag) {
        if self.depth == 1 && tag.name == "song" {
            self.current = Some((Song::new(), SectionNamer::new()));
        }
        self.depth += 1;
    }

    fn end(&mut self, tag: &StartTag, text: String) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 1 && tag.name == "song" {
            if let Some((song, _)) = self.current.take() {
                if song.is_blank() {
                    tracing::warn!("skipping empty <song> entry");
                    self.warnings.push(Warning::new("empty <song> entry"));
                } else {
                    self.songs.push(song);
                }
            }
            return;
        }
        let Some((song, namer)) = self.current.as_mut() else {
            return;
        };
        let value = text.trim();
        let lyrics = &mut song.lyrics[0];

        match tag.name.as_str() {
            "section" => {
                let body: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
                if !body.is_empty() {
                    let name = tag.attr_text("name").map_or_else(|| namer.next("verse"), String::from);
                    lyrics.sections.push(Section::new(name, body.join("\n")));
                }
            }
            "lyrics" => {
                for paragraph in paragraphs(&text) {
                    lyrics.sections.push(Section::new(namer.next("verse"), paragraph));
                }
            }
            "songbook" => {
                let name = tag.attr_text("name").or((!value.is_empty()).then_some(value));
                if let Some(name) = name {
                    lyrics.songbooks.push(SongBook::new(name, tag.attr_text("entry").unwrap_or_default()));
                }
            }
            _ if value.is_empty() => {}
            "title" => song.title = value.to_string(),
            "author" => {
                let kind = tag.attr_text("type").and_then(AuthorType::from_label);
                lyrics.authors.push(Author::new(value, kind));
            }
            "copyright" => song.copyright = value.to_string(),
            "ccli" => song.ccli = value.to_string(),
            "key" => song.key = value.to_string(),
            "tempo" => song.tempo = value.to_string(),
            "year" => song.released = value.to_string(),
            "publisher" => song.publisher = value.to_string(),
            "keywords" => song.keywords = value.to_string(),
            "notes" => song.append_notes(value),
            "tag" => song.add_tag(value),
            other => tracing::trace!("ignoring element <{other}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    const DOC: &str = r#"<?xml version="1.0"?>
<songs>
  <song>
    <title>Be Thou My Vision</title>
    <author type="translation">Mary Byrne</author>
    <ccli>30639</ccli>
    <songbook name="Church Hymnary" entry="470"/>
    <tag>Devotion</tag>
    <lyrics>
      Be Thou my vision
      O Lord of my heart

      Be Thou my wisdom
    </lyrics>
  </song>
  <song>
    <title>Doxology</title>
    <section name="Chorus">Praise God<br/>from whom</section>
    <section>All creatures</section>
  </song>
  <song></song>
</songs>"#;

    #[test]
    fn reads_each_song() {
        let outcome = SongListXmlReader.read(DOC.as_bytes(), "list.xml").unwrap();
        assert_eq!(outcome.songs.len(), 2);
        assert_eq!(outcome.warnings.len(), 1);

        let vision = &outcome.songs[0];
        assert_eq!(vision.title, "Be Thou My Vision");
        assert_eq!(vision.ccli, "30639");
        assert_eq!(vision.tags[0].as_str(), "Devotion");
        let lyrics = &vision.lyrics[0];
        assert_eq!(lyrics.authors[0].kind, Some(AuthorType::Translation));
        assert_eq!(lyrics.songbooks, vec![SongBook::new("Church Hymnary", "470")]);
        assert_eq!(
            lyrics.sections,
            vec![
                Section::new("Verse 1", "Be Thou my vision\nO Lord of my heart"),
                Section::new("Verse 2", "Be Thou my wisdom"),
            ]
        );

        let doxology = &outcome.songs[1].lyrics[0];
        assert_eq!(
            doxology.sections,
            vec![Section::new("Chorus", "Praise God\nfrom whom"), Section::new("Verse 1", "All creatures")]
        );
    }

    #[test]
    fn namespaced_songs_root_is_not_a_list() {
        let root = RootElement { local_name: "songs".to_string(), namespace: Some("urn:x".to_string()) };
        assert!(!probe(&root));
    }

    #[test]
    fn paragraph_split() {
        assert_eq!(paragraphs("a\nb\n\n\n c \n"), vec!["a\nb".to_string(), "c".to_string()]);
        assert!(paragraphs("  \n ").is_empty());
    }
}
