//! Directive names, abbreviations and what each one does.
//!
//! Both tables are built once. Lookups take the lower-cased name; anything not
//! listed resolves to `None` and is reported by the builder as unknown.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::model::AuthorType;

/// Song-level scalar fields a directive can set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongField {
    /// `title`
    Title,
    /// `subtitle`, `variant`
    Variant,
    /// `copyright`
    Copyright,
    /// `key`
    Key,
    /// `tempo`
    Tempo,
    /// `transpose`, `transposition`
    Transposition,
    /// `ccli`
    Ccli,
    /// `keywords`
    Keywords,
    /// `year`, `released`
    Released,
    /// `publisher`
    Publisher,
}

/// Lyrics-level fields a directive can set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricsField {
    /// `language`
    Language,
    /// `transliteration`
    Transliteration,
    /// `lyrics_title`
    Title,
}

/// What a directive does to the song under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    /// Flush the current song and start another.
    NewSong,
    /// Open a block of the given type (`chorus`, `tab`, ...).
    StartOf(&'a str),
    /// Close the current block.
    EndOf(&'a str),
    /// Set a song scalar.
    Song(SongField),
    /// Set a lyrics field.
    Lyrics(LyricsField),
    /// Append an author with the given contribution.
    Author(Option<AuthorType>),
    /// Append a songbook reference, `Name #Entry`.
    SongBook,
    /// Add a tag.
    Tag,
    /// Append a line to the notes.
    Notes,
    /// Recognized, but nothing in the model holds it.
    Ignore,
}

/// Block types whose content is notation rather than lyrics.
pub const NOTATION_BLOCKS: &[&str] = &["tab", "grid", "abc", "ly"];

/// Short forms and their canonical names.
static ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("t", "title"),
        ("st", "subtitle"),
        ("c", "comment"),
        ("ci", "comment_italic"),
        ("cb", "comment_box"),
        ("soc", "start_of_chorus"),
        ("eoc", "end_of_chorus"),
        ("sov", "start_of_verse"),
        ("eov", "end_of_verse"),
        ("sob", "start_of_bridge"),
        ("eob", "end_of_bridge"),
        ("sot", "start_of_tab"),
        ("eot", "end_of_tab"),
        ("sog", "start_of_grid"),
        ("eog", "end_of_grid"),
        ("ns", "new_song"),
        ("np", "new_page"),
        ("npp", "new_physical_page"),
        ("col", "columns"),
        ("colb", "column_break"),
        ("g", "grid"),
        ("ng", "no_grid"),
        ("transposition", "transpose"),
        ("released", "year"),
        ("variant", "subtitle"),
    ])
});

/// Canonical names and their actions. `start_of_*` / `end_of_*` are resolved
/// structurally and are not listed.
static ACTIONS: LazyLock<HashMap<&'static str, Action<'static>>> = LazyLock::new(|| {
    HashMap::from([
        ("new_song", Action::NewSong),
        ("title", Action::Song(SongField::Title)),
        ("subtitle", Action::Song(SongField::Variant)),
        ("copyright", Action::Song(SongField::Copyright)),
        ("key", Action::Song(SongField::Key)),
        ("tempo", Action::Song(SongField::Tempo)),
        ("transpose", Action::Song(SongField::Transposition)),
        ("ccli", Action::Song(SongField::Ccli)),
        ("keywords", Action::Song(SongField::Keywords)),
        ("year", Action::Song(SongField::Released)),
        ("publisher", Action::Song(SongField::Publisher)),
        ("language", Action::Lyrics(LyricsField::Language)),
        ("transliteration", Action::Lyrics(LyricsField::Transliteration)),
        ("lyrics_title", Action::Lyrics(LyricsField::Title)),
        ("lyricist", Action::Author(Some(AuthorType::Lyrics))),
        ("composer", Action::Author(Some(AuthorType::Music))),
        ("translator", Action::Author(Some(AuthorType::Translation))),
        ("arranger", Action::Author(None)),
        ("artist", Action::Author(None)),
        ("songbook", Action::SongBook),
        ("tag", Action::Tag),
        ("comment", Action::Notes),
        ("comment_italic", Action::Notes),
        ("comment_box", Action::Notes),
        ("highlight", Action::Notes),
        ("notes", Action::Notes),
        ("meta", Action::Ignore),
        ("album", Action::Ignore),
        ("capo", Action::Ignore),
        ("duration", Action::Ignore),
        ("time", Action::Ignore),
        ("sorttitle", Action::Ignore),
        ("chorus", Action::Ignore),
        ("new_page", Action::Ignore),
        ("new_physical_page", Action::Ignore),
        ("columns", Action::Ignore),
        ("column_break", Action::Ignore),
        ("grid", Action::Ignore),
        ("no_grid", Action::Ignore),
        ("pagetype", Action::Ignore),
        ("textfont", Action::Ignore),
        ("textsize", Action::Ignore),
        ("textcolour", Action::Ignore),
        ("chordfont", Action::Ignore),
        ("chordsize", Action::Ignore),
        ("chordcolour", Action::Ignore),
        ("define", Action::Ignore),
        ("chord", Action::Ignore),
        ("image", Action::Ignore),
    ])
});

/// Lower-case `raw` and expand abbreviations.
pub fn canonical_name(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    ALIASES.get(lower.as_str()).map_or(lower, |canonical| (*canonical).to_string())
}

/// Action for a canonical directive name.
pub fn resolve(name: &str) -> Option<Action<'_>> {
    if let Some(kind) = name.strip_prefix("start_of_") {
        return (!kind.is_empty()).then_some(Action::StartOf(kind));
    }
    if let Some(kind) = name.strip_prefix("end_of_") {
        return (!kind.is_empty()).then_some(Action::EndOf(kind));
    }
    ACTIONS.get(name).copied()
}

/// Whether `kind` is a notation block whose content is skipped.
pub fn is_notation_block(kind: &str) -> bool {
    NOTATION_BLOCKS.contains(&kind)
}
