//! Canonical song model.
//!
//! Every reader produces these types and the ChordPro writer consumes them. The
//! model is data only; the derivations here are lookups and defaulting rules.

pub mod preference;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{LyricsId, SongId};

pub use preference::{select_default, Preferable};

/// Contribution of an author to a song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorType {
    /// Wrote the words.
    Lyrics,
    /// Wrote the music.
    Music,
    /// Translated the words.
    Translation,
}

impl AuthorType {
    /// Parse the labels used across the supported formats.
    ///
    /// Returns `None` for anything that doesn't map, e.g. `arrangement`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "words" | "lyrics" | "lyricist" | "text" => Some(Self::Lyrics),
            "music" | "composer" => Some(Self::Music),
            "translation" | "translator" => Some(Self::Translation),
            _ => None,
        }
    }

    /// Canonical lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lyrics => "lyrics",
            Self::Music => "music",
            Self::Translation => "translation",
        }
    }
}

/// A person credited on a song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name.
    pub name: String,
    /// Contribution, unset when the source doesn't say.
    #[serde(default)]
    pub kind: Option<AuthorType>,
}

impl Author {
    /// Create an author with an optional contribution type.
    pub fn new(name: impl Into<String>, kind: Option<AuthorType>) -> Self {
        Self { name: name.into(), kind }
    }
}

impl Preferable for Author {
    fn text(&self) -> &str {
        &self.name
    }

    fn language(&self) -> Option<&str> {
        None
    }

    fn is_original(&self) -> bool {
        false
    }
}

/// Reference into an external hymnal or songbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongBook {
    /// Name of the book.
    pub name: String,
    /// Entry number or page, free text.
    #[serde(default)]
    pub entry: String,
}

impl SongBook {
    /// Create a songbook reference.
    pub fn new(name: impl Into<String>, entry: impl Into<String>) -> Self {
        Self { name: name.into(), entry: entry.into() }
    }
}

/// Opaque label attached to a song.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub String);

impl Tag {
    /// Create a tag.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Get the label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named block of lyric text: verse, chorus, bridge, ending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Free-text name, conventionally `v1`, `c2b` or `Verse 1`.
    pub name: String,
    /// Newline-separated lines with chord and markup stripped.
    #[serde(default)]
    pub text: String,
}

impl Section {
    /// Create a section.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self { name: name.into(), text: text.into() }
    }

    /// Append one line to the body.
    pub fn push_line(&mut self, line: &str) {
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(line);
    }

    /// Whether the body holds any visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Body lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// One language or transliteration rendering of a song's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lyrics {
    /// Identity within the owning song.
    pub id: LyricsId,
    /// Language tag such as `en` or `de`.
    #[serde(default)]
    pub language: Option<String>,
    /// Transliteration scheme.
    #[serde(default)]
    pub transliteration: Option<String>,
    /// Marks the authoritative-language variant.
    #[serde(default)]
    pub original: bool,
    /// Title for this language; may override the song title.
    #[serde(default)]
    pub title: String,
    /// Credited authors.
    #[serde(default)]
    pub authors: Vec<Author>,
    /// Songbook references.
    #[serde(default)]
    pub songbooks: Vec<SongBook>,
    /// Lyric sections in authoring order.
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Default for Lyrics {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl Lyrics {
    /// Create an empty lyrics variant.
    pub fn new(language: Option<String>, transliteration: Option<String>) -> Self {
        Self {
            id: LyricsId::generate(),
            language,
            transliteration,
            original: false,
            title: String::new(),
            authors: Vec::new(),
            songbooks: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Whether this variant is keyed by the given language and transliteration.
    pub fn matches(&self, language: Option<&str>, transliteration: Option<&str>) -> bool {
        self.language.as_deref() == language && self.transliteration.as_deref() == transliteration
    }

    /// First section whose name equals `name`, ignoring case.
    pub fn section(&self, name: &str) -> Option<&Section> {
        let wanted = name.to_lowercase();
        self.sections.iter().find(|s| s.name.to_lowercase() == wanted)
    }

    /// Default author for display, see [`select_default`].
    pub fn default_author(&self) -> Option<&Author> {
        select_default(&self.authors)
    }

    /// Whether nothing has been recorded on this variant yet.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty()
            && self.authors.is_empty()
            && self.songbooks.is_empty()
            && self.sections.is_empty()
    }

    /// Drop sections whose body is blank.
    pub fn prune_blank_sections(&mut self) {
        self.sections.retain(|s| !s.is_blank());
    }
}

impl Preferable for Lyrics {
    fn text(&self) -> &str {
        &self.title
    }

    fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    fn is_original(&self) -> bool {
        self.original
    }
}

/// Aggregate root for one song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Stable identity.
    pub id: SongId,
    /// Song title.
    #[serde(default)]
    pub title: String,
    /// Copyright line.
    #[serde(default)]
    pub copyright: String,
    /// Source or publisher.
    #[serde(default)]
    pub publisher: String,
    /// CCLI-style license number.
    #[serde(default)]
    pub ccli: String,
    /// Release year, free text.
    #[serde(default)]
    pub released: String,
    /// Musical key.
    #[serde(default)]
    pub key: String,
    /// Tempo, free text.
    #[serde(default)]
    pub tempo: String,
    /// Signed semitone offset, free text.
    #[serde(default)]
    pub transposition: String,
    /// Variant or edition label.
    #[serde(default)]
    pub variant: String,
    /// Free-text notes, newline-joined.
    #[serde(default)]
    pub notes: String,
    /// Free-text keywords.
    #[serde(default)]
    pub keywords: String,
    /// Tags, without exact duplicates.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Id of the primary lyrics variant.
    pub primary_lyrics: LyricsId,
    /// Lyrics variants; never empty.
    pub lyrics: Vec<Lyrics>,
}

impl Default for Song {
    fn default() -> Self {
        Self::new()
    }
}

impl Song {
    /// Create an empty song with one default, primary lyrics variant.
    pub fn new() -> Self {
        let lyrics = Lyrics::default();
        Self {
            id: SongId::generate(),
            title: String::new(),
            copyright: String::new(),
            publisher: String::new(),
            ccli: String::new(),
            released: String::new(),
            key: String::new(),
            tempo: String::new(),
            transposition: String::new(),
            variant: String::new(),
            notes: String::new(),
            keywords: String::new(),
            tags: Vec::new(),
            primary_lyrics: lyrics.id.clone(),
            lyrics: vec![lyrics],
        }
    }

    /// Index of the primary lyrics; the first when the id doesn't resolve.
    pub fn primary_index(&self) -> usize {
        self.lyrics
            .iter()
            .position(|l| l.id == self.primary_lyrics)
            .unwrap_or(0)
    }

    /// The primary lyrics variant.
    ///
    /// Returns `None` only for a song deserialized with an empty lyrics list.
    pub fn primary(&self) -> Option<&Lyrics> {
        self.lyrics.get(self.primary_index())
    }

    /// Index of the lyrics keyed by (`language`, `transliteration`), creating it
    /// when missing.
    pub fn lyrics_for(&mut self, language: Option<&str>, transliteration: Option<&str>) -> usize {
        if let Some(idx) = self.lyrics.iter().position(|l| l.matches(language, transliteration)) {
            return idx;
        }
        self.lyrics.push(Lyrics::new(language.map(String::from), transliteration.map(String::from)));
        self.lyrics.len() - 1
    }

    /// Append a line to the notes.
    pub fn append_notes(&mut self, line: &str) {
        if !self.notes.is_empty() {
            self.notes.push('\n');
        }
        self.notes.push_str(line);
    }

    /// Add a tag unless it is already present.
    pub fn add_tag(&mut self, label: &str) {
        let label = label.trim();
        if label.is_empty() || self.tags.iter().any(|t| t.as_str() == label) {
            return;
        }
        self.tags.push(Tag::new(label));
    }

    /// Default title among the lyrics variants, see [`select_default`].
    pub fn default_title(&self) -> Option<&str> {
        select_default(&self.lyrics)
            .map(|l| l.title.as_str())
            .filter(|t| !t.trim().is_empty())
    }

    /// The song title, falling back to the default lyrics title.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            self.default_title().unwrap_or("")
        } else {
            &self.title
        }
    }

    /// Default author across lyrics variants: the default author of the variant
    /// the title heuristic would pick among those that have authors.
    pub fn default_author(&self) -> Option<&Author> {
        let credited: Vec<CreditedLyrics<'_>> = self
            .lyrics
            .iter()
            .filter_map(|l| l.default_author().map(|author| CreditedLyrics { lyrics: l, author }))
            .collect();
        select_default(&credited).map(|c| c.author)
    }

    /// Whether nothing at all was recorded for this song.
    pub fn is_blank(&self) -> bool {
        let scalars = [
            &self.title,
            &self.copyright,
            &self.publisher,
            &self.ccli,
            &self.released,
            &self.key,
            &self.tempo,
            &self.transposition,
            &self.variant,
            &self.notes,
            &self.keywords,
        ];
        scalars.iter().all(|s| s.trim().is_empty())
            && self.tags.is_empty()
            && self.lyrics.iter().all(Lyrics::is_empty)
    }
}

/// Pairs a lyrics variant with its default author so the variant's language
/// and original flag drive the choice.
struct CreditedLyrics<'a> {
    lyrics: &'a Lyrics,
    author: &'a Author,
}

impl Preferable for CreditedLyrics<'_> {
    fn text(&self) -> &str {
        &self.author.name
    }

    fn language(&self) -> Option<&str> {
        self.lyrics.language.as_deref()
    }

    fn is_original(&self) -> bool {
        self.lyrics.original
    }
}

/// Generates `"<Type> <n>"` section names with one counter per type.
#[derive(Debug, Default, Clone)]
pub struct SectionNamer {
    counters: HashMap<String, u32>,
}

impl SectionNamer {
    /// Create a namer with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next name for `kind`, e.g. `next("verse")` → `"Verse 1"`.
    pub fn next(&mut self, kind: &str) -> String {
        let kind = kind.trim().to_lowercase();
        let counter = self.counters.entry(kind.clone()).or_insert(0);
        *counter += 1;
        format!("{} {}", capitalize(&kind.replace('_', " ")), counter)
    }
}

/// Uppercase the first character.
pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn new_song_has_primary_lyrics() {
        let song = Song::new();
        assert_eq!(song.lyrics.len(), 1);
        assert_eq!(song.primary().unwrap().id, song.primary_lyrics);
    }

    #[test]
    fn dangling_primary_falls_back_to_first() {
        let mut song = Song::new();
        song.primary_lyrics = LyricsId::new("missing");
        assert_eq!(song.primary_index(), 0);
    }

    #[test]
    fn lyrics_for_reuses_matching_variant() {
        let mut song = Song::new();
        let de = song.lyrics_for(Some("de"), None);
        let again = song.lyrics_for(Some("de"), None);
        let default = song.lyrics_for(None, None);
        assert_eq!(de, again);
        assert_eq!(default, 0);
        assert_eq!(song.lyrics.len(), 2);
    }

    #[test]
    fn section_lookup_ignores_case() {
        let mut lyrics = Lyrics::default();
        lyrics.sections.push(Section::new("Chorus", "first"));
        lyrics.sections.push(Section::new("chorus", "second"));
        assert_eq!(lyrics.section("CHORUS").unwrap().text, "first");
        assert!(lyrics.section("bridge").is_none());
    }

    #[test]
    fn tags_are_a_set() {
        let mut song = Song::new();
        song.add_tag("Easter");
        song.add_tag("Easter");
        song.add_tag("  ");
        assert_eq!(song.tags, vec![Tag::new("Easter")]);
    }

    #[test]
    fn namer_counts_per_type() {
        let mut namer = SectionNamer::new();
        assert_eq!(namer.next("verse"), "Verse 1");
        assert_eq!(namer.next("chorus"), "Chorus 1");
        assert_eq!(namer.next("Verse"), "Verse 2");
    }

    #[test]
    fn display_title_uses_lyrics_title() {
        let mut song = Song::new();
        song.lyrics[0].title = "Be Thou My Vision".to_string();
        assert_eq!(song.display_title(), "Be Thou My Vision");
        song.title = "Rob Tu Mo Bhoile".to_string();
        assert_eq!(song.display_title(), "Rob Tu Mo Bhoile");
    }

    #[test]
    fn default_author_prefers_original_variant() {
        let mut song = Song::new();
        song.lyrics[0].language = Some("en".to_string());
        song.lyrics[0].authors.push(Author::new("Translator", Some(AuthorType::Translation)));
        let de = song.lyrics_for(Some("de"), None);
        song.lyrics[de].original = true;
        song.lyrics[de].authors.push(Author::new("Ignaz Franz", Some(AuthorType::Lyrics)));
        assert_eq!(song.default_author().unwrap().name, "Ignaz Franz");
    }

    #[test]
    fn blank_song_detection() {
        let mut song = Song::new();
        assert!(song.is_blank());
        song.key = "D".to_string();
        assert!(!song.is_blank());
    }

    #[test]
    fn author_type_labels() {
        assert_eq!(AuthorType::from_label("words"), Some(AuthorType::Lyrics));
        assert_eq!(AuthorType::from_label("Music"), Some(AuthorType::Music));
        assert_eq!(AuthorType::from_label("arrangement"), None);
    }
}
