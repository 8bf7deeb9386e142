//! Song export. ChordPro is the only writable format.

use std::io::Write;

use crate::chordpro;
use crate::error::{Error, Result};
use crate::formats::Format;
use crate::model::Song;

/// Serialize `song` in `format`.
pub fn export(song: &Song, format: Format) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    export_to(song, format, &mut out)?;
    Ok(out)
}

/// Write `song` in `format` to `writer`.
pub fn export_to<W: Write>(song: &Song, format: Format, writer: W) -> Result<()> {
    if !format.capabilities().write {
        return Err(Error::unsupported(format.name(), "export"));
    }
    match format {
        Format::ChordPro => chordpro::write_song(song, writer),
        other => Err(Error::unsupported(other.name(), "export")),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use std::io;

    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn chordpro_export() {
        let mut song = Song::new();
        song.title = "Abide With Me".to_string();
        let bytes = export(&song, Format::ChordPro).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "{title: Abide With Me}\n");
    }

    #[test]
    fn read_only_formats_refuse() {
        let err = export(&Song::new(), Format::OpenLyrics).unwrap_err();
        assert!(matches!(err, Error::Unsupported { format: "OpenLyrics", operation: "export" }));
    }

    #[test]
    fn write_failures_are_io_errors() {
        let mut song = Song::new();
        song.key = "D".to_string();
        let err = export_to(&song, Format::ChordPro, BrokenPipe).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
