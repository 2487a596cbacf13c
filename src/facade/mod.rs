//! Tag-oriented access to one XML document.
//!
//! [`XmlHandle`] owns a [`Document`], remembers the file it came from (if
//! any) and the charset used to read and write it, and carries two policy
//! flags:
//!
//! - **auto-load**: every read accessor re-reads the source file first,
//!   discarding in-memory changes that were not saved;
//! - **auto-flush**: every mutator saves to the source file right after
//!   changing the tree.
//!
//! Tags are always looked up across the whole document in document order,
//! root included. "Occurrence `n`" is the `n`-th such element, counted
//! from 0. The accessors come in pairs: `attribute_names(tag)` is
//! `attribute_names_at(tag, 0)`.
//!
//! # Examples
//!
//! ```
//! use tagdoc::XmlHandle;
//!
//! # fn main() -> tagdoc::Result<()> {
//! let mut xml: XmlHandle = "<teste><cod>001</cod><cod>002</cod></teste>".parse()?;
//! assert_eq!(xml.value("cod")?.as_deref(), Some("001"));
//! assert_eq!(xml.values("cod")?, ["001", "002"]);
//!
//! xml.set_value_at("cod", "003", 1)?;
//! xml.create_element(None, "msg", Some("Hello"))?;
//! assert_eq!(
//!     xml.to_xml_string()?,
//!     "<teste>\n    <cod>001</cod>\n    <cod>003</cod>\n    <msg>Hello</msg>\n</teste>"
//! );
//! # Ok(())
//! # }
//! ```

mod read;
mod write;

use crate::common::{Charset, Error, Result};
use crate::store;
use crate::tree::{Document, NodeId, SerializeOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Settings applied when a handle is created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandleOptions {
    /// Save after every mutation.
    pub auto_flush: bool,
    /// Reload before every read.
    pub auto_load: bool,
    /// Charset for reading and writing the source file.
    pub charset: Charset,
}

impl HandleOptions {
    #[must_use]
    pub fn auto_flush(mut self, enable: bool) -> Self {
        self.auto_flush = enable;
        self
    }

    #[must_use]
    pub fn auto_load(mut self, enable: bool) -> Self {
        self.auto_load = enable;
        self
    }

    #[must_use]
    pub fn charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }
}

/// A document plus where it lives and how it is kept in sync.
///
/// Not synchronized: share it across threads behind your own lock.
#[derive(Debug, Clone)]
pub struct XmlHandle {
    document: Document,
    source: Option<PathBuf>,
    charset: Charset,
    auto_flush: bool,
    auto_load: bool,
}

impl XmlHandle {
    /// Load the file at `path` with default options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, HandleOptions::default())
    }

    /// Load the file at `path`.
    ///
    /// Fails with [`Error::NotFound`] when the file does not exist.
    pub fn open_with<P: AsRef<Path>>(path: P, options: HandleOptions) -> Result<Self> {
        let path = path.as_ref();
        let document = store::load(path, &options.charset)?;
        Ok(Self::assemble(document, Some(path.to_path_buf()), options))
    }

    /// Parse a document from text. The handle has no source file.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with(text, HandleOptions::default())
    }

    pub fn parse_with(text: &str, options: HandleOptions) -> Result<Self> {
        let document = store::parse_text(text)?;
        Ok(Self::assemble(document, None, options))
    }

    /// Wrap an existing tree. The handle has no source file.
    pub fn from_document(document: Document) -> Self {
        Self::assemble(document, None, HandleOptions::default())
    }

    fn assemble(document: Document, source: Option<PathBuf>, options: HandleOptions) -> Self {
        Self {
            document,
            source,
            charset: options.charset,
            auto_flush: options.auto_flush,
            auto_load: options.auto_load,
        }
    }

    // --- Properties ---

    /// The file this document was loaded from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct access to the tree. Changes made here bypass auto-flush.
    ///
    /// Node ids taken from it are only valid until the next call on the
    /// handle: saving, reloading and mutators may rebuild the tree.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn charset(&self) -> &Charset {
        &self.charset
    }

    /// Change the charset used for later loads, saves and declarations.
    ///
    /// Blank or unknown labels are rejected and leave the charset unchanged.
    pub fn set_charset(&mut self, label: &str) -> Result<()> {
        self.charset = Charset::from_label(label)?;
        Ok(())
    }

    pub fn auto_flush(&self) -> bool {
        self.auto_flush
    }

    pub fn set_auto_flush(&mut self, enable: bool) {
        self.auto_flush = enable;
    }

    pub fn auto_load(&self) -> bool {
        self.auto_load
    }

    pub fn set_auto_load(&mut self, enable: bool) {
        self.auto_load = enable;
    }

    // --- Persistence ---

    /// Re-read the source file, replacing the in-memory tree.
    pub fn reload(&mut self) -> Result<()> {
        let path = self.source.as_deref().ok_or(Error::NoSourceLocation)?;
        self.document = store::load(path, &self.charset)?;
        Ok(())
    }

    /// Write the document to its source file.
    ///
    /// The in-memory tree is replaced by the one read back from disk.
    pub fn save(&mut self) -> Result<()> {
        let path = self.source.clone().ok_or(Error::NoSourceLocation)?;
        self.persist_to(&path)
    }

    /// Write the document to another file.
    ///
    /// The source location is unchanged, so auto-flush and [`save`] keep
    /// targeting the original file.
    ///
    /// [`save`]: XmlHandle::save
    pub fn save_to<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.persist_to(path.as_ref())
    }

    fn persist_to(&mut self, path: &Path) -> Result<()> {
        self.document = store::persist(&mut self.document, path, &self.charset)?;
        Ok(())
    }

    /// Reload before a read when auto-load is on.
    fn auto_reload(&mut self) -> Result<()> {
        if !self.auto_load {
            return Ok(());
        }
        if self.source.is_none() {
            log::warn!("auto-load is enabled but the document has no source file; reading the in-memory tree");
            return Ok(());
        }
        self.reload()
    }

    /// Mutators call this before touching the tree.
    fn check_flushable(&self) -> Result<()> {
        if self.auto_flush && self.source.is_none() {
            return Err(Error::NoSourceLocation);
        }
        Ok(())
    }

    /// Mutators call this after touching the tree.
    fn flush_if_enabled(&mut self) -> Result<()> {
        self.compact_if_sparse();
        if self.auto_flush { self.save() } else { Ok(()) }
    }

    /// Rebuild the arena once detached nodes outnumber reachable ones.
    fn compact_if_sparse(&mut self) {
        let live = self.document.descendants(self.document.root()).count();
        if self.document.arena_len() > 2 * live + 64 {
            let dropped = self.document.compact();
            log::trace!("compacted document arena, dropped {} nodes", dropped);
        }
    }

    fn find(&self, tag: &str, index: usize) -> Result<NodeId> {
        self.document
            .element_by_tag_name(tag, index)
            .ok_or_else(|| Error::tag_not_found(tag, index))
    }

    // --- Serialization ---

    /// Normalize and render the document.
    ///
    /// The declaration, when included, names this handle's charset.
    pub fn serialize(&mut self, indent: bool, omit_declaration: bool) -> Result<String> {
        let options = SerializeOptions::default()
            .indent(indent)
            .omit_declaration(omit_declaration);
        self.serialize_with(options)
    }

    /// Like [`serialize`](XmlHandle::serialize) with full control over the
    /// layout. The encoding in `options` is overridden by the handle's charset.
    pub fn serialize_with(&mut self, options: SerializeOptions) -> Result<String> {
        let options = options.encoding(self.charset.name());
        let xml = self.document.serialize(&options)?;
        self.compact_if_sparse();
        Ok(xml)
    }

    /// Indented text without a declaration.
    pub fn to_xml_string(&mut self) -> Result<String> {
        self.serialize(true, true)
    }

    /// Copy the sub-tree under the first `tag` into a document of its own.
    ///
    /// The copy is made by rendering and re-parsing, so it shares nothing
    /// with this handle's tree.
    pub fn extract_sub_document(&mut self, tag: &str) -> Result<Document> {
        self.auto_reload()?;
        let node = self.find(tag, 0)?;
        let fragment = self
            .document
            .render(node, &SerializeOptions::default().indent(false))?;
        store::parse_text(&fragment)
    }
}

impl FromStr for XmlHandle {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Self::parse(text)
    }
}

impl From<Document> for XmlHandle {
    fn from(document: Document) -> Self {
        Self::from_document(document)
    }
}
