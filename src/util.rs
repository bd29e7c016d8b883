//! File reading and text decoding helpers.

use std::borrow::Cow;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Error, Result};

/// Read a template or asset file, reporting missing, non-regular and
/// unreadable paths as distinct errors.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(Error::NotAFile(path.to_path_buf()));
    }
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => Error::NotReadable(path.to_path_buf()),
        _ => Error::Io(e),
    })
}

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from `<?xml encoding="..."?>`)
/// 3. Falls back to Windows-1252
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract the encoding declared in an XML prolog, if any.
///
/// Only the first 100 bytes are inspected.
pub fn extract_xml_encoding(bytes: &[u8]) -> Option<&str> {
    let check_len = bytes.len().min(100);
    let prefix = &bytes[..check_len];

    let xml_start = prefix.windows(5).position(|w| w == b"<?xml")?;
    let after_xml = &prefix[xml_start..];

    let enc_pos = after_xml
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let after_enc = &after_xml[enc_pos + 9..];

    let quote = *after_enc.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }

    let value_end = after_enc[1..].iter().position(|&b| b == quote)? + 1;
    std::str::from_utf8(&after_enc[1..value_end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_text("Grüße".as_bytes(), None), "Grüße");
    }

    #[test]
    fn test_decode_with_hint() {
        // "é" in ISO-8859-1
        let bytes = b"caf\xe9";
        assert_eq!(decode_text(bytes, Some("iso-8859-1")), "café");
        assert_eq!(decode_text(bytes, None), "café");
    }

    #[test]
    fn test_extract_xml_encoding() {
        assert_eq!(
            extract_xml_encoding(br#"<?xml version="1.0" encoding="ISO-8859-1"?><a/>"#),
            Some("ISO-8859-1")
        );
        assert_eq!(
            extract_xml_encoding(b"<?xml version='1.0' encoding='utf-8'?>"),
            Some("utf-8")
        );
        assert_eq!(extract_xml_encoding(b"<a/>"), None);
        assert_eq!(extract_xml_encoding(b"<?xml version=\"1.0\" encoding="), None);
    }

    #[test]
    fn test_read_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_file(&dir.path().join("missing.xml")),
            Err(Error::FileNotFound(_))
        ));
        assert!(matches!(read_file(dir.path()), Err(Error::NotAFile(_))));

        let file = dir.path().join("a.xml");
        fs::write(&file, "<a/>").unwrap();
        assert_eq!(read_file(&file).unwrap(), b"<a/>");
    }
}
