//! Byte Order Mark (BOM) utilities.
//!
//! Files written by other tools often start with a BOM. It is detected and
//! stripped before decoding; when present it overrides the configured charset,
//! the same way XML processors treat it as the authoritative encoding signal.

use encoding_rs::Encoding;

/// Supported BOM encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomKind {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl BomKind {
    /// Returns the byte representation of the BOM.
    #[inline]
    pub const fn as_bytes(&self) -> &'static [u8] {
        match self {
            BomKind::Utf8 => &UTF8_BOM,
            BomKind::Utf16Le => &UTF16_LE_BOM,
            BomKind::Utf16Be => &UTF16_BE_BOM,
            BomKind::Utf32Le => &UTF32_LE_BOM,
            BomKind::Utf32Be => &UTF32_BE_BOM,
        }
    }

    /// Returns the length in bytes of the BOM.
    #[inline]
    #[allow(clippy::len_without_is_empty)] // No need to check for empty BOMs
    pub const fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Decoder matching this BOM. UTF-32 has no decoder in encoding_rs.
    pub fn encoding(&self) -> Option<&'static Encoding> {
        match self {
            BomKind::Utf8 => Some(encoding_rs::UTF_8),
            BomKind::Utf16Le => Some(encoding_rs::UTF_16LE),
            BomKind::Utf16Be => Some(encoding_rs::UTF_16BE),
            BomKind::Utf32Le | BomKind::Utf32Be => None,
        }
    }
}

/// UTF-8 BOM bytes.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
/// UTF-16 little-endian BOM bytes.
pub const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
/// UTF-16 big-endian BOM bytes.
pub const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];
/// UTF-32 little-endian BOM bytes.
pub const UTF32_LE_BOM: [u8; 4] = [0xFF, 0xFE, 0x00, 0x00];
/// UTF-32 big-endian BOM bytes.
pub const UTF32_BE_BOM: [u8; 4] = [0x00, 0x00, 0xFE, 0xFF];

/// Splits a leading BOM off `bytes`.
///
/// Returns the detected kind (if any) and the remaining payload.
pub fn strip_bom(bytes: &[u8]) -> (Option<BomKind>, &[u8]) {
    match detect_bom(bytes) {
        Some(kind) => (Some(kind), &bytes[kind.len()..]),
        None => (None, bytes),
    }
}

fn detect_bom(buf: &[u8]) -> Option<BomKind> {
    // UTF-32 LE shares its first two bytes with UTF-16 LE, so test it first.
    if buf.starts_with(&UTF32_BE_BOM) {
        return Some(BomKind::Utf32Be);
    }
    if buf.starts_with(&UTF32_LE_BOM) {
        return Some(BomKind::Utf32Le);
    }
    if buf.starts_with(&UTF8_BOM) {
        return Some(BomKind::Utf8);
    }
    if buf.starts_with(&UTF16_BE_BOM) {
        return Some(BomKind::Utf16Be);
    }
    if buf.starts_with(&UTF16_LE_BOM) {
        return Some(BomKind::Utf16Le);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_utf8_bom() {
        let (kind, rest) = strip_bom(b"\xEF\xBB\xBF<a/>");
        assert_eq!(kind, Some(BomKind::Utf8));
        assert_eq!(rest, b"<a/>");
    }

    #[test]
    fn test_no_bom() {
        let (kind, rest) = strip_bom(b"<a/>");
        assert_eq!(kind, None);
        assert_eq!(rest, b"<a/>");
    }

    #[test]
    fn test_utf32_le_before_utf16_le() {
        let (kind, rest) = strip_bom(&[0xFF, 0xFE, 0x00, 0x00, b'x']);
        assert_eq!(kind, Some(BomKind::Utf32Le));
        assert_eq!(rest, b"x");
        assert!(BomKind::Utf32Le.encoding().is_none());
    }

    #[test]
    fn test_utf16_bom_encoding() {
        let (kind, _) = strip_bom(&[0xFE, 0xFF, 0x00, b'<']);
        assert_eq!(kind.and_then(|k| k.encoding()), Some(encoding_rs::UTF_16BE));
    }
}
