//! Builds a [`Document`] from text with the quick-xml pull reader.
//!
//! The reader checks end-tag names, duplicate attributes and `--` inside
//! comments. This module adds the rules it leaves to callers: exactly one
//! root element, no character data outside it, valid names, only legal XML
//! characters, no `<` in attribute values and no `]]>` in text. Anything
//! accepted here can be rendered again. Entity references arrive as separate
//! events and are merged back into the surrounding text.

use super::{Document, NodeId};
use crate::common::xml::{is_xml_char, is_xml_name, resolve_entity, unescape_xml};
use crate::common::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::str;

/// Parse well-formed XML text into a document.
///
/// The XML declaration, processing instructions, DOCTYPE and comments outside
/// the root element are not kept.
pub fn parse_str(text: &str) -> Result<Document> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().check_comments = true;
    let mut doc: Option<Document> = None;
    let mut stack: Vec<NodeId> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let id = open_element(&mut doc, &stack, e)?;
                stack.push(id);
            },
            Event::Empty(ref e) => {
                open_element(&mut doc, &stack, e)?;
            },
            Event::End(ref e) => {
                if stack.pop().is_none() {
                    return Err(Error::Parse(format!(
                        "unexpected closing tag </{}>",
                        str::from_utf8(e.name().into_inner())?
                    )));
                }
            },
            Event::Text(ref t) => {
                let content = str::from_utf8(t)?;
                check_chars(content)?;
                if content.contains("]]>") {
                    return Err(Error::Parse("\"]]>\" is not allowed in text".to_string()));
                }
                push_text(&mut doc, &stack, content)?;
            },
            Event::GeneralRef(ref r) => {
                let ch = resolve_entity(str::from_utf8(r)?)?;
                push_text(&mut doc, &stack, ch.encode_utf8(&mut [0u8; 4]))?;
            },
            Event::CData(ref c) => {
                let content = str::from_utf8(c)?;
                check_chars(content)?;
                let parent = *stack
                    .last()
                    .ok_or_else(|| Error::Parse("CDATA section outside the root element".to_string()))?;
                if let Some(doc) = doc.as_mut() {
                    let node = doc.create_cdata(content);
                    doc.append_child(parent, node);
                }
            },
            Event::Comment(ref c) => {
                let content = str::from_utf8(c)?;
                check_chars(content)?;
                if content.contains("--") || content.ends_with('-') {
                    return Err(Error::Parse(format!("comment cannot contain \"--\": {:?}", content)));
                }
                // Comments before or after the root have nowhere to live.
                if let (Some(doc), Some(&parent)) = (doc.as_mut(), stack.last()) {
                    let node = doc.create_comment(content);
                    doc.append_child(parent, node);
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    if let Some(&open) = stack.last() {
        let name = doc
            .as_ref()
            .and_then(|doc| doc.name(open))
            .unwrap_or_default()
            .to_string();
        return Err(Error::Parse(format!("unclosed element <{}>", name)));
    }

    let doc = doc.ok_or_else(|| Error::Parse("no root element found".to_string()))?;
    log::debug!("parsed document with root <{}>", doc.name(doc.root()).unwrap_or_default());
    Ok(doc)
}

/// Create the element for a start (or empty) tag and attach it.
fn open_element(doc: &mut Option<Document>, stack: &[NodeId], e: &BytesStart<'_>) -> Result<NodeId> {
    let name = str::from_utf8(e.name().into_inner())?;
    check_name(name)?;

    let is_root = doc.is_none();
    let doc = doc.get_or_insert_with(|| Document::new(name));
    let id = if is_root {
        doc.root()
    } else {
        let parent = *stack.last().ok_or_else(|| {
            Error::Parse(format!(
                "second root element <{}> after the document element",
                name
            ))
        })?;
        let id = doc.create_element(name);
        doc.append_child(parent, id);
        id
    };

    for attr in e.attributes() {
        let attr = attr?;
        let key = str::from_utf8(attr.key.as_ref())?;
        check_name(key)?;
        let raw = str::from_utf8(&attr.value)?;
        check_chars(raw)?;
        if raw.contains('<') {
            return Err(Error::Parse(format!(
                "attribute {}=\"{}\" contains a literal '<'",
                key, raw
            )));
        }
        doc.set_attribute(id, key, &unescape_xml(raw)?);
    }

    Ok(id)
}

fn push_text(doc: &mut Option<Document>, stack: &[NodeId], content: &str) -> Result<()> {
    match (doc.as_mut(), stack.last()) {
        (Some(doc), Some(&parent)) => {
            doc.append_text(parent, content);
            Ok(())
        },
        _ if is_xml_whitespace(content) => Ok(()),
        _ => Err(Error::Parse(format!(
            "character data outside the root element: \"{}\"",
            content.trim()
        ))),
    }
}

fn check_name(name: &str) -> Result<()> {
    if is_xml_name(name) {
        Ok(())
    } else {
        Err(Error::Parse(format!("invalid XML name \"{}\"", name)))
    }
}

fn check_chars(content: &str) -> Result<()> {
    match content.chars().find(|&ch| !is_xml_char(ch)) {
        Some(ch) => Err(Error::Parse(format!(
            "character U+{:04X} is not allowed in XML",
            ch as u32
        ))),
        None => Ok(()),
    }
}

/// True when `s` holds only XML whitespace (space, tab, CR, LF).
pub(crate) fn is_xml_whitespace(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
}
