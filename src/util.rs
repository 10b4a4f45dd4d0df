//! Shared text utilities.

use std::borrow::Cow;

/// Decode raw bytes to text with encoding fallback.
///
/// Tries UTF-8 first (handles BOM automatically), then the hint encoding if
/// one is supplied, then falls back to Windows-1252 (a superset of
/// ISO-8859-1, common in older documents on the web).
///
/// # Examples
///
/// ```
/// use glossator::util::decode_text;
///
/// let utf8_bytes = "Hello, World!".as_bytes();
/// assert_eq!(decode_text(utf8_bytes, None), "Hello, World!");
///
/// // With encoding hint (e.g., from an HTTP header)
/// let bytes = b"Hello";
/// assert_eq!(decode_text(bytes, Some("utf-8")), "Hello");
/// ```
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    // Try UTF-8 first (handles BOM automatically)
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    // If UTF-8 failed, try the hint encoding
    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    // Fallback: Windows-1252
    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_text("héllo".as_bytes(), None), "héllo");
    }

    #[test]
    fn test_decode_cp1252_fallback() {
        // 0x93/0x94 are curly quotes in CP1252, malformed as UTF-8
        let bytes = b"\x93quoted\x94";
        let decoded = decode_text(bytes, None);
        assert_eq!(decoded, "\u{201c}quoted\u{201d}");
    }

    #[test]
    fn test_decode_with_hint() {
        let bytes = b"caf\xe9";
        assert_eq!(decode_text(bytes, Some("iso-8859-1")), "café");
    }
}
