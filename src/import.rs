//! Import pipeline.
//!
//! Sniffs each input, tries the candidate readers in order and hands the songs
//! to a [`SongLibrary`]. A reader returning zero songs means "not mine" and the
//! next candidate gets a turn.

use std::io::Read;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::ImportConfig;
use crate::constants::sniff::ARCHIVE_EXTENSIONS;
use crate::error::{Error, Result};
use crate::formats::{candidates, extension_of, is_supported_path, ReadOutcome, SniffInput, Warning};
use crate::library::{SongLibrary, Upsert};

/// Result of importing one file or archive entry.
#[derive(Debug)]
pub struct FileOutcome {
    /// File path, or `archive/entry` for archive members.
    pub path: PathBuf,
    /// Songs and warnings, or the error that stopped this file.
    pub result: Result<ReadOutcome>,
}

/// Summary of a batch import.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Songs stored for the first time.
    pub created: usize,
    /// Songs that replaced a stored song with the same id.
    pub updated: usize,
    /// Files no reader recognized.
    pub unrecognized: Vec<PathBuf>,
    /// Recoverable problems, by file.
    pub warnings: Vec<(PathBuf, Warning)>,
    /// Files that failed, with the reason.
    pub errors: Vec<(PathBuf, Error)>,
}

impl BatchReport {
    /// Songs stored, created or updated.
    pub const fn imported(&self) -> usize {
        self.created + self.updated
    }
}

/// Runs readers over inputs according to an [`ImportConfig`].
#[derive(Debug, Clone, Default)]
pub struct Importer {
    config: ImportConfig,
}

impl Importer {
    /// Create an importer.
    pub const fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub const fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Import songs from bytes, sniffing by name hint and content.
    pub fn import(&self, bytes: &[u8], name_hint: &str) -> Result<ReadOutcome> {
        self.import_with_mime(bytes, name_hint, None)
    }

    /// Import songs from bytes with a declared MIME type.
    ///
    /// Returns the first fatal error only when no candidate produced songs.
    pub fn import_with_mime(&self, bytes: &[u8], name_hint: &str, mime: Option<&str>) -> Result<ReadOutcome> {
        let prefix = &bytes[..bytes.len().min(self.config.sniff_bytes)];
        let input = SniffInput {
            path: (!name_hint.is_empty()).then(|| Path::new(name_hint)),
            mime,
            prefix: Some(prefix),
        };

        let mut first_error: Option<Error> = None;
        for format in candidates(&input) {
            match format.reader().read(bytes, name_hint) {
                Ok(mut outcome) if !outcome.songs.is_empty() => {
                    tracing::debug!("{name_hint}: read {} songs as {format}", outcome.songs.len());
                    self.fill_titles(&mut outcome, name_hint);
                    return Ok(outcome);
                }
                Ok(_) => tracing::debug!("{name_hint}: {format} found no songs"),
                Err(e) => {
                    tracing::debug!("{name_hint}: {format} failed: {e}");
                    first_error.get_or_insert(e);
                }
            }
        }

        first_error.map_or_else(|| Ok(ReadOutcome::empty()), Err)
    }

    /// Import from a reader, refusing more than `max_file_bytes`.
    pub fn import_reader(&self, reader: impl Read, name_hint: &str) -> Result<ReadOutcome> {
        let limit = self.config.max_file_bytes;
        let mut bytes = Vec::new();
        reader.take(limit.saturating_add(1)).read_to_end(&mut bytes)?;
        let size = bytes.len() as u64;
        if size > limit {
            return Err(Error::TooLarge { path: None, size, limit });
        }
        self.import(&bytes, name_hint)
    }

    /// Import one file from disk.
    pub fn import_path(&self, path: &Path) -> Result<ReadOutcome> {
        let size = fs_err::metadata(path).map_err(|e| Error::io(e, path.to_path_buf()))?.len();
        let limit = self.config.max_file_bytes;
        if size > limit {
            return Err(Error::TooLarge { path: Some(path.to_path_buf()), size, limit });
        }
        let bytes = fs_err::read(path).map_err(|e| Error::io(e, path.to_path_buf()))?;
        self.import(&bytes, &path.to_string_lossy())
            .map_err(|e| e.with_file(path))
    }

    /// Import every file entry of a zip archive.
    ///
    /// Failing to open the archive is fatal; a bad entry only fails itself.
    pub fn import_archive(&self, path: &Path) -> Result<Vec<FileOutcome>> {
        let file = fs_err::File::open(path).map_err(|e| Error::io(e, path.to_path_buf()))?;
        let mut archive = zip::ZipArchive::new(file)?;
        let limit = self.config.max_file_bytes;

        let mut outcomes = Vec::new();
        for idx in 0..archive.len() {
            let mut entry = archive.by_index(idx)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let entry_path = path.join(&name);
            let size = entry.size();
            let result = if size > limit {
                Err(Error::TooLarge { path: Some(entry_path.clone()), size, limit })
            } else {
                let mut bytes = Vec::new();
                match entry.read_to_end(&mut bytes) {
                    Ok(_) => self.import(&bytes, &name).map_err(|e| e.with_file(&entry_path)),
                    Err(e) => Err(Error::io(e, entry_path.clone())),
                }
            };
            outcomes.push(FileOutcome { path: entry_path, result });
        }
        tracing::debug!("{}: {} archive entries", path.display(), outcomes.len());
        Ok(outcomes)
    }

    /// Import a file or archive, never failing as a whole.
    pub fn import_file(&self, path: &Path) -> Vec<FileOutcome> {
        if is_archive(path) {
            match self.import_archive(path) {
                Ok(outcomes) => outcomes,
                Err(e) => vec![FileOutcome { path: path.to_path_buf(), result: Err(e.with_file(path)) }],
            }
        } else {
            vec![FileOutcome { path: path.to_path_buf(), result: self.import_path(path) }]
        }
    }

    /// Import many files into `library`.
    ///
    /// Files are parsed independently, in parallel when configured, and stored
    /// in input order. One file's failure never stops the others.
    pub fn import_batch(&self, paths: &[PathBuf], library: &mut impl SongLibrary) -> BatchReport {
        let parsed: Vec<Vec<FileOutcome>> = if self.config.parallel {
            paths.par_iter().map(|p| self.import_file(p)).collect()
        } else {
            paths.iter().map(|p| self.import_file(p)).collect()
        };

        let mut report = BatchReport::default();
        for FileOutcome { path, result } in parsed.into_iter().flatten() {
            let outcome = match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!("{}: {e}", path.display());
                    report.errors.push((path, e));
                    continue;
                }
            };
            if outcome.songs.is_empty() {
                tracing::debug!("{}: no songs recognized", path.display());
                report.unrecognized.push(path.clone());
            }
            report.warnings.extend(outcome.warnings.into_iter().map(|w| (path.clone(), w)));
            for song in outcome.songs {
                match library.upsert(song) {
                    Ok(Upsert::Created) => report.created += 1,
                    Ok(Upsert::Updated) => report.updated += 1,
                    Err(e) => report.errors.push((path.clone(), e)),
                }
            }
        }

        tracing::info!(
            "Imported {} songs ({} new, {} updated), {} warnings, {} errors",
            report.imported(),
            report.created,
            report.updated,
            report.warnings.len(),
            report.errors.len()
        );
        report
    }

    fn fill_titles(&self, outcome: &mut ReadOutcome, name_hint: &str) {
        if !self.config.title_from_name_hint {
            return;
        }
        let Some(stem) = Path::new(name_hint).file_stem().and_then(|s| s.to_str()) else {
            return;
        };
        for song in &mut outcome.songs {
            if song.display_title().trim().is_empty() {
                song.title = stem.to_string();
            }
        }
    }
}

/// Supported files and archives under `root`, sorted by name.
pub fn collect_paths(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_supported_path(e.path()) || is_archive(e.path()))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn is_archive(path: &Path) -> bool {
    path.to_str()
        .and_then(extension_of)
        .is_some_and(|ext| ARCHIVE_EXTENSIONS.contains(&ext.as_str()))
}
