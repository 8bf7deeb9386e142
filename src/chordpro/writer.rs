//! ChordPro writer.
//!
//! Output re-imports through [`super::builder::build`] with the same song
//! scalars, section names and section text.

use std::fmt::Write as _;
use std::io::Write;

use crate::error::Result;
use crate::model::{AuthorType, Lyrics, Section, Song};

/// Serialize a song to ChordPro text.
pub fn to_string(song: &Song) -> String {
    let mut out = String::new();

    let scalars = [
        ("ccli", &song.ccli),
        ("copyright", &song.copyright),
        ("key", &song.key),
        ("keywords", &song.keywords),
        ("title", &song.title),
        ("notes", &song.notes),
        ("publisher", &song.publisher),
        ("year", &song.released),
        ("tempo", &song.tempo),
        ("transpose", &song.transposition),
        ("subtitle", &song.variant),
    ];
    for (name, value) in scalars {
        push_directive(&mut out, name, value);
    }
    for tag in &song.tags {
        push_directive(&mut out, "tag", tag.as_str());
    }

    for lyrics in &song.lyrics {
        write_lyrics(&mut out, lyrics);
    }
    out
}

/// Write a song as ChordPro to `writer`.
pub fn write_song<W: Write>(song: &Song, mut writer: W) -> Result<()> {
    writer.write_all(to_string(song).as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn write_lyrics(out: &mut String, lyrics: &Lyrics) {
    if let Some(translit) = &lyrics.transliteration {
        push_directive(out, "transliteration", translit);
    }
    if let Some(language) = &lyrics.language {
        push_directive(out, "language", language);
    }
    push_directive(out, "lyrics_title", &lyrics.title);

    for author in &lyrics.authors {
        let directive = match author.kind {
            Some(AuthorType::Lyrics) => "lyricist",
            Some(AuthorType::Music) => "composer",
            Some(AuthorType::Translation) => "translator",
            None => continue,
        };
        push_directive(out, directive, &author.name);
    }

    for book in &lyrics.songbooks {
        if book.entry.trim().is_empty() {
            push_directive(out, "songbook", &book.name);
        } else {
            push_directive(out, "songbook", &format!("{} #{}", book.name, book.entry));
        }
    }

    for section in &lyrics.sections {
        write_section(out, section);
    }
}

fn write_section(out: &mut String, section: &Section) {
    let kind = block_type(&section.name);
    let label = section.name.replace('"', "");

    out.push('\n');
    let _ = writeln!(out, "{{start_of_{kind}: label=\"{label}\"}}");
    for line in section.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let _ = writeln!(out, "{line}");
    }
    let _ = writeln!(out, "{{end_of_{kind}}}");
}

/// Block type for a section name: the first of verse/chorus/bridge it contains.
fn block_type(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    ["verse", "chorus", "bridge"]
        .into_iter()
        .find(|kind| lower.contains(kind))
        .unwrap_or("verse")
}

/// One directive per line of a non-empty value.
fn push_directive(out: &mut String, name: &str, value: &str) {
    for line in value.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let _ = writeln!(out, "{{{name}: {line}}}");
    }
}
