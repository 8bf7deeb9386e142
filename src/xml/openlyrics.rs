//! `OpenLyrics` reader.
//!
//! Titles, authors and verses carry `lang` / `translit` attributes and land in
//! the lyrics variant keyed by them. Songbooks are song-wide and copied into
//! every variant when the song closes.

use super::{walk, Inline, RootElement, StartTag, XmlHandler};
use crate::constants::xml::OPENLYRICS_NAMESPACE;
use crate::error::Result;
use crate::formats::{Format, ReadOutcome, SongReader};
use crate::model::{select_default, Author, AuthorType, Preferable, Section, SectionNamer, Song, SongBook};

/// Whether a root element is an `OpenLyrics` song.
pub fn probe(root: &RootElement) -> bool {
    root.local_name == "song" && root.namespace.as_deref() == Some(OPENLYRICS_NAMESPACE)
}

/// Reader for `OpenLyrics` documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenLyricsReader;

impl SongReader for OpenLyricsReader {
    fn format(&self) -> Format {
        Format::OpenLyrics
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
        Ok(outcome)
    }
}

/// A `<title>` seen while reading, kept for the default-title choice.
struct TitleCandidate {
    lyrics: usize,
    text: String,
    language: Option<String>,
    original: bool,
}

impl Preferable for TitleCandidate {
    fn text(&self) -> &str {
        &self.text
    }

    fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    fn is_original(&self) -> bool {
        self.original
    }
}

struct SongDraft {
    song: Song,
    titles: Vec<TitleCandidate>,
    songbooks: Vec<SongBook>,
    namer: SectionNamer,
}

struct VerseDraft {
    lyrics: usize,
    name: String,
    lines: Vec<String>,
}

#[derive(Default)]
struct Handler {
    songs: Vec<Song>,
    draft: Option<SongDraft>,
    verse: Option<VerseDraft>,
}

impl Handler {
    fn finish_song(&mut self) {
        let Some(mut draft) = self.draft.take() else {
            return;
        };
        let song = &mut draft.song;

        if let Some(title) = select_default(&draft.titles) {
            if !title.text.is_empty() {
                song.title = title.text.clone();
            }
            if let Some(lyrics) = song.lyrics.get(title.lyrics) {
                song.primary_lyrics = lyrics.id.clone();
            }
        }

        // The variant allocated with the song is dropped if nothing used it.
        if song.lyrics.len() > 1 && song.lyrics[0].is_empty() {
            let unused = song.lyrics.remove(0);
            tracing::debug!("pruned unused lyrics {}", unused.id);
            if unused.id == song.primary_lyrics {
                song.primary_lyrics = song.lyrics[0].id.clone();
            }
        }

        for lyrics in &mut song.lyrics {
            lyrics.songbooks.extend(draft.songbooks.iter().cloned());
        }

        if draft.song.is_blank() {
            tracing::debug!("skipping empty OpenLyrics song");
        } else {
            self.songs.push(draft.song);
        }
    }
}

impl XmlHandler for Handler {
    fn inline(&self, name: &str, ancestors: &[StartTag]) -> Inline {
        if !ancestors.iter().any(|a| a.name == "lines") {
            return Inline::Block;
        }
        match name {
            "br" => Inline::LineBreak,
            "comment" => Inline::Skip,
            _ => Inline::Transparent,
        }
    }

    fn start(&mut self, tag: &StartTag) {
        match tag.name.as_str() {
            "song" => {
                self.draft = Some(SongDraft {
                    song: Song::new(),
                    titles: Vec::new(),
                    songbooks: Vec::new(),
                    namer: SectionNamer::new(),
                });
            }
            "verse" => {
                let Some(draft) = self.draft.as_mut() else {
                    return;
                };
                let lyrics = draft.song.lyrics_for(tag.attr_text("lang"), tag.attr_text("translit"));
                let name = tag
                    .attr_text("name")
                    .map_or_else(|| draft.namer.next("verse"), String::from);
                self.verse = Some(VerseDraft { lyrics, name, lines: Vec::new() });
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: &StartTag, text: String) {
        if tag.name == "song" {
            self.finish_song();
            return;
        }
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        let song = &mut draft.song;
        let value = text.trim();

        match tag.name.as_str() {
            "title" => {
                let language = tag.attr_text("lang");
                let idx = song.lyrics_for(language, tag.attr_text("translit"));
                let original = tag.attr_text("original").is_some_and(|v| v.eq_ignore_ascii_case("true"));
                let lyrics = &mut song.lyrics[idx];
                if original {
                    lyrics.original = true;
                }
                if lyrics.title.is_empty() && !value.is_empty() {
                    lyrics.title = value.to_string();
                }
                draft.titles.push(TitleCandidate {
                    lyrics: idx,
                    text: value.to_string(),
                    language: language.map(String::from),
                    original,
                });
            }
            "author" => {
                if value.is_empty() {
                    return;
                }
                let kind = tag.attr_text("type").and_then(AuthorType::from_label);
                let idx = song.lyrics_for(tag.attr_text("lang"), None);
                song.lyrics[idx].authors.push(Author::new(value, kind));
            }
            "lines" => {
                if let Some(verse) = self.verse.as_mut() {
                    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
                    if !lines.is_empty() {
                        verse.lines.push(lines.join("\n"));
                    }
                }
            }
            "verse" => {
                if let Some(verse) = self.verse.take() {
                    if verse.lines.is_empty() {
                        tracing::debug!("dropping empty verse {}", verse.name);
                    } else {
                        song.lyrics[verse.lyrics].sections.push(Section::new(verse.name, verse.lines.join("\n")));
                    }
                }
            }
            "songbook" => {
                if let Some(name) = tag.attr_text("name") {
                    draft.songbooks.push(SongBook::new(name, tag.attr_text("entry").unwrap_or_default()));
                }
            }
            "comment" if !value.is_empty() => song.append_notes(value),
            "theme" => song.add_tag(value),
            name => {
                let slot = match name {
                    "copyright" => &mut song.copyright,
                    "ccliNo" => &mut song.ccli,
                    "released" => &mut song.released,
                    "key" => &mut song.key,
                    "tempo" => &mut song.tempo,
                    "transposition" => &mut song.transposition,
                    "variant" => &mut song.variant,
                    "publisher" => &mut song.publisher,
                    "keywords" => &mut song.keywords,
                    _ => {
                        tracing::trace!("ignoring OpenLyrics element <{name}>");
                        return;
                    }
                };
                if !value.is_empty() {
                    *slot = value.to_string();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn read(body: &str) -> ReadOutcome {
        let doc = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<song xmlns="http://openlyrics.info/namespace/2009/song" version="0.9">
{body}
</song>"#
        );
        OpenLyricsReader.read(doc.as_bytes(), "song.xml").unwrap()
    }

    #[test]
    fn reads_properties_and_verses() {
        let outcome = read(
            r#"<properties>
    <titles><title>Amazing Grace</title></titles>
    <authors><author type="words">John Newton</author><author>Anonymous</author></authors>
    <copyright>Public Domain</copyright>
    <ccliNo>22025</ccliNo>
    <key>G</key>
    <tempo type="bpm">72</tempo>
    <comments><comment>Sing slowly</comment></comments>
    <themes><theme>Grace</theme></themes>
    <songbooks><songbook name="Hymnal" entry="378"/></songbooks>
  </properties>
  <lyrics>
    <verse name="v1">
      <lines>Amazing <chord name="G"/>grace how sweet the sound<br/>
        That saved a wretch like me<comment>repeat</comment></lines>
    </verse>
    <verse name="c"><lines>My chains are gone</lines></verse>
  </lyrics>"#,
        );
        assert_eq!(outcome.songs.len(), 1);
        let song = &outcome.songs[0];
        assert_eq!(song.title, "Amazing Grace");
        assert_eq!(song.copyright, "Public Domain");
        assert_eq!(song.ccli, "22025");
        assert_eq!(song.key, "G");
        assert_eq!(song.tempo, "72");
        assert_eq!(song.notes, "Sing slowly");
        assert_eq!(song.tags[0].as_str(), "Grace");
        let lyrics = song.primary().unwrap();
        assert_eq!(lyrics.authors[0], Author::new("John Newton", Some(AuthorType::Lyrics)));
        assert_eq!(lyrics.authors[1].kind, None);
        assert_eq!(lyrics.songbooks, vec![SongBook::new("Hymnal", "378")]);
        assert_eq!(
            lyrics.sections,
            vec![
                Section::new("v1", "Amazing grace how sweet the sound\nThat saved a wretch like me"),
                Section::new("c", "My chains are gone"),
            ]
        );
    }

    #[test]
    fn original_title_beats_unlabelled_one() {
        let outcome = read(
            r#"<properties><titles>
    <title>Silent Night</title>
    <title lang="de" original="true">Stille Nacht</title>
  </titles></properties>
  <lyrics>
    <verse name="v1"><lines>Silent night</lines></verse>
    <verse name="v1" lang="de"><lines>Stille Nacht</lines></verse>
  </lyrics>"#,
        );
        let song = &outcome.songs[0];
        assert_eq!(song.title, "Stille Nacht");
        let primary = song.primary().unwrap();
        assert_eq!(primary.language.as_deref(), Some("de"));
        assert!(primary.original);
        assert_eq!(song.lyrics.len(), 2);
    }

    #[test]
    fn untouched_default_lyrics_pruned() {
        let outcome = read(
            r#"<properties><titles><title lang="en">Holy</title></titles></properties>
  <lyrics><verse name="v1" lang="en"><lines>Holy holy holy</lines></verse></lyrics>"#,
        );
        let song = &outcome.songs[0];
        assert_eq!(song.lyrics.len(), 1);
        assert_eq!(song.lyrics[0].language.as_deref(), Some("en"));
        assert_eq!(song.primary_lyrics, song.lyrics[0].id);
    }

    #[test]
    fn songbooks_copied_to_every_variant() {
        let outcome = read(
            r#"<properties><titles><title>A</title><title lang="fr">B</title></titles>
    <songbooks><songbook name="Psalter" entry="1"/></songbooks></properties>"#,
        );
        let song = &outcome.songs[0];
        assert!(song.lyrics.iter().all(|l| l.songbooks == vec![SongBook::new("Psalter", "1")]));
    }

    #[test]
    fn unnamed_verse_gets_generated_name() {
        let outcome = read(r#"<properties><titles><title>A</title></titles></properties><lyrics><verse><lines>la</lines></verse></lyrics>"#);
        assert_eq!(outcome.songs[0].lyrics[0].sections[0].name, "Verse 1");
    }

    #[test]
    fn other_roots_are_not_openlyrics() {
        let outcome = OpenLyricsReader.read(b"<songs><song><title>A</title></song></songs>", "a.xml").unwrap();
        assert!(outcome.songs.is_empty());
    }
}
