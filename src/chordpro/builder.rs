//! Builds songs from classified ChordPro lines.
//!
//! One forward pass. The builder tolerates any ordering of directives and
//! content and never fails: problems become warnings.

use super::classify::{classify, Directive, Line};
use super::directives::{self, Action, LyricsField, SongField};
use crate::formats::{ReadOutcome, Warning};
use crate::model::{Author, Lyrics, Section, SectionNamer, Song, SongBook};

/// Explicit parse state for one ChordPro stream.
#[derive(Debug)]
pub struct SongBuilder {
    songs: Vec<Song>,
    song: Song,
    /// Index of the current lyrics in `song.lyrics`.
    lyrics: usize,
    /// Index of the open section in the current lyrics.
    section: Option<usize>,
    /// Notation block whose content is being skipped.
    ignore_content: Option<String>,
    namer: SectionNamer,
    warnings: Vec<Warning>,
}

impl Default for SongBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SongBuilder {
    /// Builder positioned at the start of a first song.
    pub fn new() -> Self {
        Self {
            songs: Vec::new(),
            song: Song::new(),
            lyrics: 0,
            section: None,
            ignore_content: None,
            namer: SectionNamer::new(),
            warnings: Vec::new(),
        }
    }

    /// Apply one classified line.
    pub fn apply(&mut self, line_no: usize, line: Line) {
        match line {
            Line::Empty => self.section = None,
            Line::Remark(_) | Line::Annotation(_) => {}
            Line::Directive(directive) => self.on_directive(line_no, &directive),
            Line::Content(text) => self.on_content(&text),
        }
    }

    /// Flush the last song and return everything built.
    pub fn finish(mut self) -> ReadOutcome {
        self.flush();
        ReadOutcome { songs: self.songs, warnings: self.warnings }
    }

    fn on_content(&mut self, text: &str) {
        if self.ignore_content.is_some() || text.is_empty() {
            return;
        }
        let idx = match self.section {
            Some(idx) => idx,
            None => {
                let name = self.namer.next("verse");
                self.open_section(name)
            }
        };
        if let Some(section) = self.current_lyrics().sections.get_mut(idx) {
            section.push_line(text);
        }
    }

    fn on_directive(&mut self, line_no: usize, directive: &Directive) {
        match directives::resolve(&directive.name) {
            Some(Action::NewSong) => {
                self.flush();
                self.start_song();
            }
            Some(Action::StartOf(kind)) => {
                self.section = None;
                if directives::is_notation_block(kind) {
                    self.ignore_content = Some(kind.to_string());
                    return;
                }
                let name = directive
                    .attribute("label")
                    .map(str::trim)
                    .filter(|label| !label.is_empty())
                    .map_or_else(|| self.namer.next(kind), String::from);
                self.open_section(name);
            }
            Some(Action::EndOf(kind)) => {
                // Any end closes the section; only a notation end stops skipping.
                if self.ignore_content.as_deref() == Some(kind) || directives::is_notation_block(kind) {
                    self.ignore_content = None;
                }
                self.section = None;
            }
            Some(_) if !directive.attributes.is_empty() => {
                for (key, value) in &directive.attributes {
                    let name = directives::canonical_name(key);
                    self.dispatch(line_no, &name, value);
                }
            }
            _ => self.dispatch(line_no, &directive.name, &directive.value),
        }
    }

    /// Route one metadata name/value pair.
    fn dispatch(&mut self, line_no: usize, name: &str, value: &str) {
        let value = value.trim();
        match directives::resolve(name) {
            Some(Action::Song(field)) => self.set_song_field(field, value),
            Some(Action::Lyrics(field)) => self.set_lyrics_field(field, value),
            Some(Action::Author(kind)) => {
                if !value.is_empty() {
                    self.current_lyrics().authors.push(Author::new(value, kind));
                }
            }
            Some(Action::SongBook) => {
                if let Some(book) = parse_songbook(value) {
                    self.current_lyrics().songbooks.push(book);
                }
            }
            Some(Action::Tag) => self.song.add_tag(value),
            Some(Action::Notes) => {
                if !value.is_empty() {
                    self.song.append_notes(value);
                }
            }
            Some(Action::Ignore | Action::NewSong | Action::StartOf(_) | Action::EndOf(_)) => {
                tracing::debug!("line {line_no}: ignoring directive {name}");
            }
            None => {
                tracing::warn!("line {line_no}: unknown directive {name}");
                self.warnings.push(Warning::at_line(line_no, format!("unknown directive '{name}'")));
            }
        }
    }

    fn set_song_field(&mut self, field: SongField, value: &str) {
        if value.is_empty() {
            return;
        }
        let song = &mut self.song;
        let slot = match field {
            SongField::Title => &mut song.title,
            SongField::Variant => &mut song.variant,
            SongField::Copyright => &mut song.copyright,
            SongField::Key => &mut song.key,
            SongField::Tempo => &mut song.tempo,
            SongField::Transposition => &mut song.transposition,
            SongField::Ccli => &mut song.ccli,
            SongField::Keywords => &mut song.keywords,
            SongField::Released => &mut song.released,
            SongField::Publisher => &mut song.publisher,
        };
        *slot = value.to_string();
    }

    fn set_lyrics_field(&mut self, field: LyricsField, value: &str) {
        if value.is_empty() {
            return;
        }
        // A language block after lyrics text, or a field given twice, starts the next variant.
        let current = self.current_lyrics();
        let already_set = match field {
            LyricsField::Language => current.language.is_some(),
            LyricsField::Transliteration => current.transliteration.is_some(),
            LyricsField::Title => !current.title.trim().is_empty(),
        };
        if already_set || !current.sections.is_empty() {
            self.song.lyrics.push(Lyrics::default());
            self.lyrics = self.song.lyrics.len() - 1;
            self.section = None;
        }
        let lyrics = self.current_lyrics();
        match field {
            LyricsField::Language => lyrics.language = Some(value.to_string()),
            LyricsField::Transliteration => lyrics.transliteration = Some(value.to_string()),
            LyricsField::Title => lyrics.title = value.to_string(),
        }
    }

    fn open_section(&mut self, name: String) -> usize {
        let sections = &mut self.current_lyrics().sections;
        sections.push(Section::new(name, String::new()));
        let idx = sections.len() - 1;
        self.section = Some(idx);
        idx
    }

    fn current_lyrics(&mut self) -> &mut Lyrics {
        if self.lyrics >= self.song.lyrics.len() {
            self.song.lyrics.push(Lyrics::default());
            self.lyrics = self.song.lyrics.len() - 1;
        }
        &mut self.song.lyrics[self.lyrics]
    }

    fn start_song(&mut self) {
        self.song = Song::new();
        self.lyrics = 0;
        self.section = None;
        self.ignore_content = None;
        self.namer = SectionNamer::new();
    }

    fn flush(&mut self) {
        let mut song = std::mem::take(&mut self.song);
        for lyrics in &mut song.lyrics {
            lyrics.prune_blank_sections();
        }
        if song.lyrics.len() > 1 {
            let primary = song.primary_lyrics.clone();
            song.lyrics.retain(|l| l.id == primary || !l.is_empty());
        }
        if song.title.trim().is_empty() {
            if let Some(title) = song.default_title() {
                song.title = title.to_string();
            }
        }
        if song.is_blank() {
            tracing::debug!("dropping blank song");
        } else {
            self.songs.push(song);
        }
    }
}

/// `Name #Entry`, or just `Name`.
fn parse_songbook(value: &str) -> Option<SongBook> {
    if value.is_empty() {
        return None;
    }
    let book = match value.rsplit_once(" #") {
        Some((name, entry)) if !name.trim().is_empty() => SongBook::new(name.trim(), entry.trim()),
        _ => SongBook::new(value, ""),
    };
    Some(book)
}

/// Parse ChordPro text into songs.
///
/// Text without a single directive is not ChordPro and yields no songs.
pub fn build(text: &str) -> ReadOutcome {
    let lines: Vec<(usize, Line)> = text
        .lines()
        .enumerate()
        .map(|(i, raw)| (i + 1, classify(raw)))
        .collect();

    if !lines.iter().any(|(_, line)| matches!(line, Line::Directive(_))) {
        tracing::debug!("no directives found, not ChordPro");
        return ReadOutcome::empty();
    }

    // A leading new_song is only a marker.
    let first = lines
        .iter()
        .position(|(_, line)| !matches!(line, Line::Empty | Line::Remark(_)));
    let skip = match first.and_then(|idx| lines.get(idx).map(|entry| (idx, entry))) {
        Some((idx, (_, Line::Directive(d)))) if d.name == "new_song" => idx + 1,
        _ => 0,
    };

    let significant = lines[skip..]
        .iter()
        .filter(|(_, line)| !matches!(line, Line::Empty))
        .count();
    if significant < 2 {
        tracing::debug!("only {significant} significant lines, not a song");
        return ReadOutcome::empty();
    }

    let mut builder = SongBuilder::new();
    for (line_no, line) in lines.into_iter().skip(skip) {
        builder.apply(line_no, line);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::model::AuthorType;

    fn single(text: &str) -> Song {
        let mut outcome = build(text);
        assert_eq!(outcome.songs.len(), 1, "expected one song from {text:?}");
        outcome.songs.remove(0)
    }

    fn section_names(song: &Song) -> Vec<&str> {
        song.lyrics[0].sections.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_end_to_end_example() {
        let song = single("{title: Amazing Grace}\n{key: G}\n\nVerse text here\n");
        assert_eq!(song.title, "Amazing Grace");
        assert_eq!(song.key, "G");
        assert_eq!(song.lyrics.len(), 1);
        assert_eq!(song.lyrics[0].sections, vec![Section::new("Verse 1", "Verse text here")]);
    }

    #[test]
    fn test_paragraphs_are_auto_named() {
        let song = single("{title: Doxology}\nPraise God from whom\nall blessings flow\n\nPraise Him all creatures\n");
        assert_eq!(section_names(&song), vec!["Verse 1", "Verse 2"]);
        assert_eq!(song.lyrics[0].sections[0].text, "Praise God from whom\nall blessings flow");
    }

    #[test]
    fn test_no_directives_is_not_chordpro() {
        assert!(build("Just some\nplain text\n\nlines").songs.is_empty());
    }

    #[test]
    fn test_too_short_is_not_a_song() {
        assert!(build("{title: Lonely}").songs.is_empty());
        assert!(build("{ns}\n{title: Lonely}\n").songs.is_empty());
    }

    #[test]
    fn test_new_song_splits_stream() {
        let text = "{ns}\n{title: First}\nLine one\n{new_song}\n{title: Second}\nLine two\n{ns}\n{title: Third}\n";
        let outcome = build(text);
        let titles: Vec<&str> = outcome.songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_new_song_resets_counters() {
        let outcome = build("{title: A}\nla\n{ns}\n{title: B}\nlo\n");
        assert_eq!(section_names(&outcome.songs[1]), vec!["Verse 1"]);
    }

    #[test]
    fn test_tab_content_excluded() {
        let text = "{title: Tabbed}\nbefore tab\n{start_of_tab}\ne|---3---|\nB|---0---|\n{end_of_tab}\nafter tab\n";
        let song = single(text);
        let all_text: Vec<&str> = song.lyrics[0].sections.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(all_text, vec!["before tab", "after tab"]);
        assert!(all_text.iter().all(|t| !t.contains("---")));
    }

    #[test]
    fn test_other_end_inside_tab_keeps_skipping() {
        let song = single("{title: T}\n{sot}\n{eoc}\ne|--3--|\n{eot}\nafter\n");
        let all_text: Vec<&str> = song.lyrics[0].sections.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(all_text, vec!["after"]);
    }

    #[test]
    fn test_labels_and_typed_counters() {
        let text = "{title: X}\n{soc}\nrefrain\n{eoc}\n{start_of_verse: label=\"Intro\"}\nhello\n{end_of_verse}\n{soc}\nagain\n{eoc}\nloose\n";
        let song = single(text);
        assert_eq!(section_names(&song), vec!["Chorus 1", "Intro", "Chorus 2", "Verse 1"]);
    }

    #[test]
    fn test_mismatched_end_still_closes() {
        let song = single("{title: X}\n{start_of_chorus}\nsing\n{end_of_verse}\nloose line\n");
        assert_eq!(section_names(&song), vec!["Chorus 1", "Verse 1"]);
    }

    #[test]
    fn test_metadata_dispatch() {
        let text = "{title: Holy}\n{st: Nicaea}\n{copyright: Public Domain}\n{ccli: 1156}\n{tempo: 96}\n\
                    {transpose: -2}\n{year: 1826}\n{keywords: trinity}\n{lyricist: Reginald Heber}\n\
                    {composer: John B. Dykes}\n{arranger: Someone}\n{songbook: Hymns of Faith #1}\n\
                    {tag: Trinity}\n{c: sing boldly}\n{comment: all stand}\nHoly, holy, holy\n";
        let song = single(text);
        assert_eq!(song.variant, "Nicaea");
        assert_eq!(song.copyright, "Public Domain");
        assert_eq!(song.ccli, "1156");
        assert_eq!(song.tempo, "96");
        assert_eq!(song.transposition, "-2");
        assert_eq!(song.released, "1826");
        assert_eq!(song.keywords, "trinity");
        assert_eq!(song.notes, "sing boldly\nall stand");
        assert_eq!(song.tags.len(), 1);
        let lyrics = &song.lyrics[0];
        assert_eq!(lyrics.authors[0], Author::new("Reginald Heber", Some(AuthorType::Lyrics)));
        assert_eq!(lyrics.authors[1].kind, Some(AuthorType::Music));
        assert_eq!(lyrics.authors[2].kind, None);
        assert_eq!(lyrics.songbooks, vec![SongBook::new("Hymns of Faith", "1")]);
    }

    #[test]
    fn test_attributes_dispatch_per_pair() {
        let song = single("{meta: key D}\n{meta: tempo 72}\nline\n");
        assert_eq!(song.key, "D");
        assert_eq!(song.tempo, "72");
    }

    #[test]
    fn test_unknown_directive_warns_and_continues() {
        let outcome = build("{title: X}\n{x_weird: 1}\nline\n");
        assert_eq!(outcome.songs.len(), 1);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].line, Some(2));
    }

    #[test]
    fn test_language_block_starts_new_lyrics() {
        let text = "{title: Silent Night}\n{language: en}\nSilent night\n\n{language: de}\n{lyrics_title: Stille Nacht}\nStille Nacht\n";
        let song = single(text);
        assert_eq!(song.lyrics.len(), 2);
        assert_eq!(song.lyrics[0].language.as_deref(), Some("en"));
        assert_eq!(song.lyrics[1].language.as_deref(), Some("de"));
        assert_eq!(song.lyrics[1].title, "Stille Nacht");
        assert_eq!(song.lyrics[1].sections[0].text, "Stille Nacht");
    }

    #[test]
    fn test_repeated_language_starts_new_lyrics_without_sections() {
        let text = "{title: Silent Night}\n{language: en}\n{lyrics_title: Silent Night}\n\
                    {language: de}\n{lyrics_title: Stille Nacht}\nStille Nacht\n";
        let song = single(text);
        let variants: Vec<(Option<&str>, &str, usize)> = song
            .lyrics
            .iter()
            .map(|l| (l.language.as_deref(), l.title.as_str(), l.sections.len()))
            .collect();
        assert_eq!(variants, vec![(Some("en"), "Silent Night", 0), (Some("de"), "Stille Nacht", 1)]);
    }

    #[test]
    fn test_empty_sections_dropped() {
        let song = single("{title: X}\n{soc}\n{eoc}\nreal line\n");
        assert_eq!(section_names(&song), vec!["Verse 1"]);
    }

    #[test]
    fn test_songbook_parsing() {
        assert_eq!(parse_songbook("Psalter #23"), Some(SongBook::new("Psalter", "23")));
        assert_eq!(parse_songbook("Psalter"), Some(SongBook::new("Psalter", "")));
        assert_eq!(parse_songbook(""), None);
    }
}
