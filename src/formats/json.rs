//! Canonical JSON reader.
//!
//! Reads the serde form of [`Song`]: a single object or an array of them.

use serde::Deserialize;

use super::{Format, ReadOutcome, SongReader, Warning};
use crate::error::Result;
use crate::model::Song;

/// Reader for the canonical JSON form.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalReader;

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Many(Vec<Song>),
    One(Box<Song>),
}

impl SongReader for CanonicalReader {
    fn format(&self) -> Format {
        Format::Canonical
    }

    fn read(&self, input: &[u8], _name_hint: &str) -> Result<ReadOutcome> {
        let text = super::text::decode(input);
        let songs = match serde_json::from_str::<Document>(&text)? {
            Document::Many(songs) => songs,
            Document::One(song) => vec![*song],
        };

        let mut outcome = ReadOutcome::empty();
        for song in songs {
            if song.lyrics.is_empty() {
                tracing::warn!("skipping song {} without lyrics", song.id);
                outcome.warnings.push(Warning::new(format!("song {} has no lyrics", song.id)));
                continue;
            }
            outcome.songs.push(song);
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::error::Error;

    #[test]
    fn reads_single_and_many() {
        let mut song = Song::new();
        song.title = "Amazing Grace".to_string();
        let one = serde_json::to_vec(&song).unwrap();
        let many = serde_json::to_vec(&vec![song.clone(), song.clone()]).unwrap();

        let outcome = CanonicalReader.read(&one, "a.json").unwrap();
        assert_eq!(outcome.songs, vec![song]);
        assert_eq!(CanonicalReader.read(&many, "a.json").unwrap().songs.len(), 2);
    }

    #[test]
    fn missing_optional_fields_default() {
        let doc = br#"{"id": "s1", "title": "Doxology", "primary_lyrics": "l1",
                       "lyrics": [{"id": "l1", "sections": [{"name": "v1", "text": "Praise God"}]}]}"#;
        let song = CanonicalReader.read(doc, "").unwrap().songs.remove(0);
        assert_eq!(song.title, "Doxology");
        assert_eq!(song.lyrics[0].sections[0].text, "Praise God");
        assert!(song.key.is_empty());
    }

    #[test]
    fn songs_without_lyrics_are_skipped() {
        let doc = br#"[{"id": "s1", "primary_lyrics": "l1", "lyrics": []}]"#;
        let outcome = CanonicalReader.read(doc, "").unwrap();
        assert!(outcome.songs.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn invalid_json_is_fatal() {
        let err = CanonicalReader.read(b"{\"id\": ", "").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
