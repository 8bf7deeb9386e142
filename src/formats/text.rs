//! Byte-to-text decoding for legacy inputs.
//!
//! Handles UTF-8 (with or without BOM) and UTF-16 with BOM. Anything that is not
//! valid UTF-8 is read as Latin-1, which is what old Windows exporters produce
//! for the characters that matter in lyrics. Line endings are normalized to `\n`.

/// Decode `bytes` into text with `\n` line endings.
pub fn decode(bytes: &[u8]) -> String {
    let text = if let Some(rest) = bytes.strip_prefix(b"\xEF\xBB\xBF") {
        String::from_utf8_lossy(rest).into_owned()
    } else if let Some(rest) = bytes.strip_prefix(b"\xFF\xFE") {
        decode_utf16(rest, u16::from_le_bytes)
    } else if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
        decode_utf16(rest, u16::from_be_bytes)
    } else {
        match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => {
                tracing::debug!("input is not UTF-8, reading as Latin-1");
                bytes.iter().map(|&b| char::from(b)).collect()
            }
        }
    };

    normalize_newlines(&text)
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

fn normalize_newlines(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}

/// Skip a BOM and leading whitespace, returning the first significant bytes.
pub(crate) fn significant_prefix(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
    &bytes[start..]
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn strips_utf8_bom() {
        assert_eq!(decode(b"\xEF\xBB\xBF{title: X}"), "{title: X}");
    }

    #[test]
    fn decodes_utf16_le() {
        let bytes: Vec<u8> = [0xFF, 0xFE]
            .into_iter()
            .chain("Gnade".encode_utf16().flat_map(u16::to_le_bytes))
            .collect();
        assert_eq!(decode(&bytes), "Gnade");
    }

    #[test]
    fn decodes_utf16_be() {
        let bytes: Vec<u8> = [0xFE, 0xFF]
            .into_iter()
            .chain("Gnade".encode_utf16().flat_map(u16::to_be_bytes))
            .collect();
        assert_eq!(decode(&bytes), "Gnade");
    }

    #[test]
    fn falls_back_to_latin1() {
        assert_eq!(decode(b"Gr\xFC\xDFe"), "Grüße");
    }

    #[test]
    fn normalizes_line_endings() {
        assert_eq!(decode(b"a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn significant_prefix_skips_bom_and_space() {
        assert_eq!(significant_prefix(b"\xEF\xBB\xBF \n <song/>"), b"<song/>");
        assert_eq!(significant_prefix(b"   "), b"");
    }
}
