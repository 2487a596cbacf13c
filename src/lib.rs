//! Tagdoc - A tag-oriented facade over XML documents
//!
//! This library loads an XML document from a file or a string, answers
//! questions about it by tag name, edits it, and writes it back out.
//!
//! # Features
//!
//! - **Tag lookups**: Values, attributes and child maps by tag name and occurrence
//! - **Structural edits**: Set text or CDATA, create and remove elements, edit attributes
//! - **Charsets**: Read and write UTF-8, ISO-8859-1 or any WHATWG-registered encoding
//! - **Sync policies**: Optional reload-before-read and save-after-write
//! - **Serialization**: Indented or compact output, with or without a declaration
//!
//! # Example - Querying a document
//!
//! ```
//! use tagdoc::XmlHandle;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut xml = XmlHandle::parse(
//!     "<teste><cod>001</cod><msg>Hello world 1</msg><str charset=\"utf-8\">a</str></teste>",
//! )?;
//!
//! assert_eq!(xml.value("cod")?.as_deref(), Some("001"));
//! assert_eq!(xml.attribute_names("str")?, ["charset"]);
//! assert_eq!(xml.child_map("teste")?["msg"], "Hello world 1");
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Editing a file in place
//!
//! ```no_run
//! use tagdoc::{Charset, HandleOptions, XmlHandle, ISO_8859_1};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = HandleOptions::default()
//!     .charset(Charset::from_label(ISO_8859_1)?)
//!     .auto_flush(true);
//! let mut xml = XmlHandle::open_with("config.xml", options)?;
//!
//! // Every mutation is written to config.xml immediately
//! xml.set_value("cod", "002")?;
//! xml.create_element(Some("inner"), "str", Some("novo"))?;
//! # Ok(())
//! # }
//! ```

/// Shared error type, charsets and XML text helpers
pub mod common;

/// Tag-oriented document handle
///
/// [`XmlHandle`] is the main entry point: it owns one document and applies
/// the auto-load and auto-flush policies around every accessor and mutator.
pub mod facade;

/// Reading documents from disk and writing them back
pub mod store;

/// Arena-backed XML document tree with its parser and renderer
pub mod tree;

// Re-export commonly used types for convenience
pub use common::{Charset, Error, ISO_8859_1, Result, UTF_8};
pub use facade::{HandleOptions, XmlHandle};
pub use tree::{Document, NodeId, SerializeOptions};
