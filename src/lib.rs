//! `songport` - import legacy worship song formats, export ChordPro.
//!
//! Readers for ChordPro, three XML dialects, `SongSelect` exports and the
//! canonical JSON form all produce the same [`model::Song`]. The [`import`]
//! pipeline picks readers by sniffing, and [`export`] writes ChordPro back out.

pub mod chordpro;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod formats;
pub mod import;
pub mod library;
pub mod model;
pub mod songselect;
pub mod types;
pub mod xml;

pub use config::ImportConfig;
pub use error::{Error, Result};
pub use export::{export, export_to};
pub use formats::{Format, FormatCapability, ReadOutcome, SongReader, Warning};
pub use import::{collect_paths, BatchReport, Importer};
pub use library::{InMemoryLibrary, SongLibrary, Upsert};
pub use model::{Author, AuthorType, Lyrics, Section, Song, SongBook, Tag};
pub use types::{LyricsId, SongId};
