//! Character encoding of persisted documents.
//!
//! A [`Charset`] pairs the label the caller asked for (kept verbatim, since it
//! is written into the XML declaration) with the `encoding_rs` codec used to
//! decode files on load and encode them on persist.

use crate::common::bom::strip_bom;
use crate::common::{Error, Result};
use encoding_rs::Encoding;
use std::borrow::Cow;
use std::fmt;

/// Label of the default charset.
pub const UTF_8: &str = "UTF-8";
/// Label of the Latin-1 charset.
pub const ISO_8859_1: &str = "ISO-8859-1";

/// Labels that name real ISO-8859-1. The WHATWG registry maps them to
/// windows-1252, which disagrees on 0x80..=0x9F.
const LATIN1_LABELS: &[&str] = &[
    "iso-8859-1",
    "iso8859-1",
    "iso88591",
    "iso_8859-1",
    "iso_8859-1:1987",
    "iso-ir-100",
    "latin1",
    "l1",
    "ibm819",
    "cp819",
    "csisolatin1",
];

/// A named text encoding.
///
/// # Examples
/// ```
/// use tagdoc::Charset;
///
/// let charset = Charset::from_label("ISO-8859-1").unwrap();
/// assert_eq!(charset.name(), "ISO-8859-1");
/// assert_eq!(charset.decode(b"\xE7a").unwrap(), "ça");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Charset {
    label: String,
    encoding: &'static Encoding,
    /// Byte `n` is code point `n`, without the windows-1252 remapping.
    latin1: bool,
}

impl Charset {
    /// Look up a charset by any label registered with the WHATWG encoding
    /// standard (case-insensitive, surrounding whitespace ignored).
    pub fn from_label(label: &str) -> Result<Self> {
        let label = label.trim();
        if label.is_empty() {
            return Err(Error::Encoding(format!(
                "charset must not be blank; use \"{}\" or \"{}\"",
                UTF_8, ISO_8859_1
            )));
        }
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| Error::Encoding(format!("unsupported charset \"{}\"", label)))?;
        let latin1 = LATIN1_LABELS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(label));
        Ok(Self {
            label: label.to_string(),
            encoding,
            latin1,
        })
    }

    /// The UTF-8 charset.
    pub fn utf8() -> Self {
        Self {
            label: UTF_8.to_string(),
            encoding: encoding_rs::UTF_8,
            latin1: false,
        }
    }

    /// The label as given by the caller.
    #[inline]
    pub fn name(&self) -> &str {
        &self.label
    }

    /// The underlying codec. For ISO-8859-1 labels this is windows-1252, but
    /// decoding and encoding use the exact Latin-1 mapping instead.
    #[inline]
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Decode file contents into text.
    ///
    /// A leading BOM takes precedence over this charset. Malformed input is an
    /// error rather than being replaced with U+FFFD.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        let (bom, payload) = strip_bom(bytes);
        let encoding = match bom {
            Some(kind) => kind
                .encoding()
                .ok_or_else(|| Error::Encoding(format!("unsupported byte order mark {:?}", kind)))?,
            None if self.latin1 => return Ok(encoding_rs::mem::decode_latin1(payload).into_owned()),
            None => self.encoding,
        };

        encoding
            .decode_without_bom_handling_and_without_replacement(payload)
            .map(Cow::into_owned)
            .ok_or_else(|| Error::Encoding(format!("input is not valid {}", encoding.name())))
    }

    /// Encode text for writing.
    ///
    /// Fails when the codec cannot be used for output (UTF-16 variants) or
    /// when the text holds characters the charset cannot represent.
    pub fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>> {
        if self.latin1 {
            if !encoding_rs::mem::is_str_latin1(text) {
                return Err(self.unrepresentable());
            }
            return Ok(encoding_rs::mem::encode_latin1_lossy(text));
        }
        if self.encoding.output_encoding() != self.encoding {
            return Err(Error::Encoding(format!(
                "charset \"{}\" cannot be used for output",
                self.label
            )));
        }

        let (bytes, _, had_errors) = self.encoding.encode(text);
        if had_errors {
            return Err(self.unrepresentable());
        }
        Ok(bytes)
    }

    fn unrepresentable(&self) -> Error {
        Error::Encoding(format!(
            "text contains characters not representable in \"{}\"",
            self.label
        ))
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::utf8()
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_keeps_caller_spelling() {
        let charset = Charset::from_label(" iso-8859-1 ").unwrap();
        assert_eq!(charset.name(), "iso-8859-1");
        assert_eq!(charset.to_string(), "iso-8859-1");
    }

    #[test]
    fn test_from_label_rejects_blank_and_unknown() {
        assert!(matches!(Charset::from_label(""), Err(Error::Encoding(_))));
        assert!(matches!(Charset::from_label("   "), Err(Error::Encoding(_))));
        assert!(matches!(
            Charset::from_label("klingon-8"),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn test_default_is_utf8() {
        let charset = Charset::default();
        assert_eq!(charset.name(), UTF_8);
        assert_eq!(charset.encoding(), encoding_rs::UTF_8);
    }

    #[test]
    fn test_latin1_round_trip() {
        let charset = Charset::from_label(ISO_8859_1).unwrap();
        let bytes = charset.encode("ação").unwrap();
        assert_eq!(bytes.as_ref(), b"a\xE7\xE3o");
        assert_eq!(charset.decode(&bytes).unwrap(), "ação");
    }

    #[test]
    fn test_latin1_is_not_windows_1252() {
        let charset = Charset::from_label("latin1").unwrap();
        assert_eq!(charset.decode(b"\x80\x9F").unwrap(), "\u{80}\u{9F}");
        assert_eq!(charset.encode("\u{80}").unwrap().as_ref(), b"\x80");
        assert!(matches!(charset.encode("€"), Err(Error::Encoding(_))));

        let cp1252 = Charset::from_label("windows-1252").unwrap();
        assert_eq!(cp1252.decode(b"\x80").unwrap(), "€");
        assert_eq!(cp1252.encode("€").unwrap().as_ref(), b"\x80");
    }

    #[test]
    fn test_decode_rejects_malformed_utf8() {
        let charset = Charset::utf8();
        assert!(matches!(
            charset.decode(b"<a>\xFF</a>"),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn test_decode_bom_overrides_charset() {
        let charset = Charset::from_label(ISO_8859_1).unwrap();
        let text = charset.decode(b"\xEF\xBB\xBF<a>\xC3\xA7</a>").unwrap();
        assert_eq!(text, "<a>ç</a>");
    }

    #[test]
    fn test_encode_refuses_utf16_and_unmappable() {
        let utf16 = Charset::from_label("UTF-16LE").unwrap();
        assert!(matches!(utf16.encode("a"), Err(Error::Encoding(_))));

        let latin1 = Charset::from_label(ISO_8859_1).unwrap();
        assert!(matches!(latin1.encode("日本"), Err(Error::Encoding(_))));
    }
}
