use super::names::is_xml_char;
use crate::common::{Error, Result};
use aho_corasick::AhoCorasick;
use memchr::memchr;
use once_cell::sync::Lazy;
use std::borrow::Cow;

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

/// Escape XML special characters.
///
/// # Examples
///
/// ```
/// use tagdoc::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>\"hello\"</tag>"), "&lt;tag&gt;&quot;hello&quot;&lt;/tag&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Resolve the name of an entity reference (the part between `&` and `;`).
///
/// Handles the five predefined entities and decimal/hexadecimal character
/// references. Anything else is undeclared, since DTDs are not processed.
/// Character references must name a legal XML character, so `&#0;` fails.
pub fn resolve_entity(name: &str) -> Result<char> {
    let resolved = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => name.strip_prefix('#').and_then(|code| {
            let value = match code.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse::<u32>().ok(),
            };
            value.and_then(char::from_u32).filter(|&ch| is_xml_char(ch))
        }),
    };

    resolved.ok_or_else(|| Error::Parse(format!("unknown entity reference &{};", name)))
}

/// Unescape entity and character references.
///
/// Borrows the input when it holds no `&`. Unknown or unterminated references
/// are errors, as they are in well-formed XML.
///
/// # Examples
///
/// ```
/// use tagdoc::common::xml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;a &amp; b&gt;").unwrap(), "<a & b>");
/// assert_eq!(unescape_xml("&#65;&#x42;").unwrap(), "AB");
/// assert!(unescape_xml("&invalid;").is_err());
/// ```
pub fn unescape_xml(s: &str) -> Result<Cow<'_, str>> {
    let bytes = s.as_bytes();
    let Some(first) = memchr(b'&', bytes) else {
        return Ok(Cow::Borrowed(s));
    };

    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..first]);
    let mut pos = first;

    while pos < bytes.len() {
        // `pos` always points at an '&' here
        let end = memchr(b';', &bytes[pos..])
            .map(|offset| pos + offset)
            .ok_or_else(|| Error::Parse(format!("unterminated entity reference in \"{}\"", s)))?;
        out.push(resolve_entity(&s[pos + 1..end])?);

        pos = end + 1;
        let next = memchr(b'&', &bytes[pos..]).map_or(bytes.len(), |offset| pos + offset);
        out.push_str(&s[pos..next]);
        pos = next;
    }

    Ok(Cow::Owned(out))
}
