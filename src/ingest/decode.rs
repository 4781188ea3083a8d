use std::path::Path;

use encoding_rs::WINDOWS_1252;
use tracing::debug;

use crate::error::PipelineError;

/// Bytes Windows-1252 leaves undefined. The WHATWG table maps them to C1
/// controls instead of failing, so they are rejected explicitly.
const UNDEFINED_1252: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// Decodes an export as UTF-8, falling back to Windows-1252.
pub fn decode_export(bytes: Vec<u8>, path: &Path) -> Result<String, PipelineError> {
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text)),
        Err(e) => {
            debug!(path = %path.display(), "not UTF-8, retrying as Windows-1252");
            let bytes = e.into_bytes();
            if bytes.iter().any(|b| UNDEFINED_1252.contains(b)) {
                return Err(PipelineError::Undecodable {
                    path: path.to_path_buf(),
                });
            }
            WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(&bytes)
                .map(|text| text.into_owned())
                .ok_or_else(|| PipelineError::Undecodable {
                    path: path.to_path_buf(),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_passthrough() {
        let text = decode_export("Café,4".as_bytes().to_vec(), Path::new("a.csv")).unwrap();
        assert_eq!(text, "Café,4");
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"Subunit");
        assert_eq!(decode_export(bytes, Path::new("a.csv")).unwrap(), "Subunit");
    }

    #[test]
    fn test_windows_1252_fallback() {
        // 0xE9 is 'é' and 0x92 a right single quote in Windows-1252, invalid as UTF-8.
        let bytes = vec![b'C', b'a', b'f', 0xE9, b' ', 0x92];
        let text = decode_export(bytes, Path::new("a.csv")).unwrap();
        assert_eq!(text, "Café \u{2019}");
    }

    #[test]
    fn test_neither_encoding_is_fatal() {
        for byte in UNDEFINED_1252 {
            let bytes = vec![b'a', 0xE9, byte];
            let err = decode_export(bytes, Path::new("bad.csv")).unwrap_err();
            assert!(matches!(err, PipelineError::Undecodable { .. }));
        }
    }

    #[test]
    fn test_undefined_bytes_inside_valid_utf8_are_fine() {
        // U+0141 is 0xC5 0x81 in UTF-8; the 0x81 continuation byte is not a cp1252 concern.
        let text = decode_export("Ł".as_bytes().to_vec(), Path::new("a.csv")).unwrap();
        assert_eq!(text, "Ł");
    }
}
