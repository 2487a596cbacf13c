//! Lexical checks for XML names and characters.

/// True when `name` can be used as an element or attribute name.
///
/// Accepts the letter-based subset of the XML `Name` production: a letter,
/// `_` or `:` first, then letters, digits, `_`, `:`, `-`, `.` or `·`.
///
/// # Examples
///
/// ```
/// use tagdoc::common::xml::is_xml_name;
/// assert!(is_xml_name("str"));
/// assert!(is_xml_name("xsl:value-of"));
/// assert!(!is_xml_name("1a"));
/// assert!(!is_xml_name("bad name"));
/// ```
pub fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_' || first == ':')
        && chars.all(|ch| ch.is_alphanumeric() || matches!(ch, '_' | ':' | '-' | '.' | '\u{b7}'))
}

/// True when `ch` matches the XML 1.0 `Char` production.
#[inline]
pub fn is_xml_char(ch: char) -> bool {
    matches!(
        ch,
        '\u{9}' | '\u{A}' | '\u{D}' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}
