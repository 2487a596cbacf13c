//! Mutators of [`XmlHandle`].
//!
//! Each mutator refuses to run when auto-flush is on but there is nowhere to
//! flush to, or when the new names or content could not be written as XML.
//! Only then does it edit the tree, and it saves afterwards if auto-flush is
//! on. A rejected call leaves the tree unchanged.

use super::XmlHandle;
use crate::common::xml::{is_xml_char, is_xml_name};
use crate::common::{Error, Result};

fn check_name(name: &str) -> Result<()> {
    if is_xml_name(name) {
        Ok(())
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}

fn check_content(content: &str) -> Result<()> {
    match content.chars().find(|&ch| !is_xml_char(ch)) {
        Some(ch) => Err(Error::InvalidCharacter(ch)),
        None => Ok(()),
    }
}

impl XmlHandle {
    /// Replace the content of the first `tag` with `value` as text.
    pub fn set_value(&mut self, tag: &str, value: &str) -> Result<()> {
        self.check_flushable()?;
        check_content(value)?;
        let id = self.find(tag, 0)?;
        self.document.set_text_content(id, value);
        self.flush_if_enabled()
    }

    /// Replace the content of the `index`-th `tag` with `value` as text.
    pub fn set_value_at(&mut self, tag: &str, value: &str, index: usize) -> Result<()> {
        self.check_flushable()?;
        check_content(value)?;
        let count = self.document.count_elements(tag);
        if index >= count {
            return Err(Error::IndexOutOfRange {
                tag: tag.to_string(),
                index,
                count,
            });
        }
        let id = self.find(tag, index)?;
        self.document.set_text_content(id, value);
        self.flush_if_enabled()
    }

    /// Replace the content of the first `tag` with one CDATA section.
    pub fn set_cdata(&mut self, tag: &str, value: &str) -> Result<()> {
        self.check_flushable()?;
        check_content(value)?;
        let id = self.find(tag, 0)?;
        self.document.clear_children(id);
        let cdata = self.document.create_cdata(value);
        self.document.append_child(id, cdata);
        self.flush_if_enabled()
    }

    /// Append a new `tag` element under the first `parent`, or under the root
    /// when `parent` is `None` or empty.
    ///
    /// Non-empty `content` becomes the element's text.
    pub fn create_element(
        &mut self,
        parent: Option<&str>,
        tag: &str,
        content: Option<&str>,
    ) -> Result<()> {
        self.check_flushable()?;
        check_name(tag)?;
        if let Some(text) = content {
            check_content(text)?;
        }
        let parent = match parent.filter(|name| !name.is_empty()) {
            Some(name) => self.find(name, 0)?,
            None => self.document.root(),
        };

        let element = self.document.create_element(tag);
        if let Some(text) = content.filter(|text| !text.is_empty()) {
            self.document.set_text_content(element, text);
        }
        self.document.append_child(parent, element);
        self.flush_if_enabled()
    }

    /// Detach the first `tag` and everything below it.
    pub fn remove_element(&mut self, tag: &str) -> Result<()> {
        self.check_flushable()?;
        let id = self.find(tag, 0)?;
        if id == self.document.root() {
            return Err(Error::RootRemoval(tag.to_string()));
        }
        self.document.detach(id);
        self.flush_if_enabled()
    }

    /// Set attribute `name` on the first `tag`, replacing an existing value
    /// in place.
    pub fn set_attribute(&mut self, tag: &str, name: &str, value: &str) -> Result<()> {
        self.check_flushable()?;
        check_name(name)?;
        check_content(value)?;
        let id = self.find(tag, 0)?;
        self.document.set_attribute(id, name, value);
        self.flush_if_enabled()
    }

    /// Remove attribute `name` from the first `tag`, returning its old value.
    pub fn remove_attribute(&mut self, tag: &str, name: &str) -> Result<Option<String>> {
        self.check_flushable()?;
        let id = self.find(tag, 0)?;
        let removed = self.document.remove_attribute(id, name);
        if removed.is_some() {
            self.flush_if_enabled()?;
        }
        Ok(removed)
    }
}
