//! Crate constants.
//!
//! Centralizes format markers, extension lists and heuristic thresholds.

/// Format sniffing constants.
pub mod sniff {
    /// Default number of leading bytes inspected when sniffing a stream.
    pub const DEFAULT_PREFIX_BYTES: usize = 4096;

    /// Extensions read as ChordPro.
    pub const CHORDPRO_EXTENSIONS: &[&str] = &["cho", "chopro", "chordpro", "crd", "chord"];

    /// Extensions read as `SongSelect` key=value files.
    pub const USR_EXTENSIONS: &[&str] = &["usr"];

    /// Plain text extensions, ambiguous between ChordPro and `SongSelect` text.
    pub const TEXT_EXTENSIONS: &[&str] = &["txt"];

    /// Extensions for the canonical JSON form.
    pub const JSON_EXTENSIONS: &[&str] = &["json"];

    /// Generic XML extensions; the dialect is decided by content.
    pub const XML_EXTENSIONS: &[&str] = &["xml"];

    /// Zip containers expanded by batch import.
    pub const ARCHIVE_EXTENSIONS: &[&str] = &["zip"];
}

/// XML dialect markers.
pub mod xml {
    /// `OpenLyrics` document namespace.
    pub const OPENLYRICS_NAMESPACE: &str = "http://openlyrics.info/namespace/2009/song";

    /// Root local name suffix of the numbered-parts dialect.
    pub const PARTS_ROOT_SUFFIX: &str = "Song";

    /// Root element of the song-list dialect.
    pub const SONG_LIST_ROOT: &str = "songs";
}

/// `SongSelect` export markers.
pub mod songselect {
    /// First line of a `.usr` file.
    pub const USR_HEADER: &str = "[File]";

    /// Field separator inside `Fields=`, `Words=` and `Themes=`.
    pub const FIELD_SEPARATOR: &str = "/t";

    /// Line separator inside `Words=` entries.
    pub const LINE_SEPARATOR: &str = "/n";

    /// Token that starts the trailing license block of a text export.
    pub const LICENSE_MARKER: &str = "CCLI";

    /// Consecutive blank lines that start a new section in a text export.
    pub const SECTION_BREAK_BLANKS: usize = 2;
}

/// Import pipeline constants.
pub mod import {
    /// Default upper bound for a single input file (16 MiB).
    pub const DEFAULT_MAX_FILE_BYTES: u64 = 16 * 1024 * 1024;
}
