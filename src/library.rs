//! Where imported songs go.
//!
//! Persistence is the caller's business; the import pipeline only needs
//! [`SongLibrary::upsert`].

use std::collections::HashMap;

use crate::error::Result;
use crate::model::Song;
use crate::types::SongId;

/// Outcome of storing one song.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// No song with this id existed.
    Created,
    /// An existing song was replaced.
    Updated,
}

/// Song storage keyed by [`SongId`].
pub trait SongLibrary {
    /// Insert `song`, or replace the stored song with the same id.
    fn upsert(&mut self, song: Song) -> Result<Upsert>;
}

/// Library held in memory, in insertion order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLibrary {
    songs: HashMap<SongId, Song>,
    order: Vec<SongId>,
}

impl InMemoryLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a song by id.
    pub fn get(&self, id: &SongId) -> Option<&Song> {
        self.songs.get(id)
    }

    /// Number of songs stored.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Songs in the order they were first stored.
    pub fn iter(&self) -> impl Iterator<Item = &Song> {
        self.order.iter().filter_map(|id| self.songs.get(id))
    }
}

impl SongLibrary for InMemoryLibrary {
    fn upsert(&mut self, song: Song) -> Result<Upsert> {
        let id = song.id.clone();
        if self.songs.insert(id.clone(), song).is_some() {
            tracing::debug!("updated song {id}");
            Ok(Upsert::Updated)
        } else {
            self.order.push(id);
            Ok(Upsert::Created)
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn upsert_creates_then_updates() {
        let mut library = InMemoryLibrary::new();
        let mut song = Song::new();
        song.title = "First".to_string();
        assert_eq!(library.upsert(song.clone()).unwrap(), Upsert::Created);

        song.title = "Second".to_string();
        assert_eq!(library.upsert(song.clone()).unwrap(), Upsert::Updated);
        assert_eq!(library.len(), 1);
        assert_eq!(library.get(&song.id).unwrap().title, "Second");
    }

    #[test]
    fn iteration_keeps_insertion_order() {
        let mut library = InMemoryLibrary::new();
        for title in ["C", "A", "B"] {
            let mut song = Song::new();
            song.title = title.to_string();
            library.upsert(song).unwrap();
        }
        let titles: Vec<&str> = library.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }
}
