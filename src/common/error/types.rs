//! Unified error types for tagdoc.
//!
//! Every fallible operation of the store and the tag facade reports one of
//! these variants. Messages carry the offending tag, occurrence index or file
//! path so callers can tell lookups apart without inspecting the call site.
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tagdoc operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Source file does not exist at load time
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Markup is not well-formed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Read or write failure on a file
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unknown charset label, or bytes/text not representable in it
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// No element with this tag name at the requested occurrence
    #[error("Tag [{tag}] not found at occurrence {index}")]
    TagNotFound { tag: String, index: usize },

    /// Explicit index past the last occurrence of a tag
    #[error("Index {index} out of range for tag [{tag}] ({count} occurrences)")]
    IndexOutOfRange {
        tag: String,
        index: usize,
        count: usize,
    },

    /// Attribute names and values of an element do not line up
    #[error("Attribute list of tag [{tag}] has {names} names but {values} values")]
    AttributeMismatch {
        tag: String,
        names: usize,
        values: usize,
    },

    /// Persisting was requested but the handle was not loaded from a file
    #[error("Document has no source location to persist to")]
    NoSourceLocation,

    /// Rendering the tree to text failed
    #[error("Render error: {0}")]
    Render(String),

    /// The file was written but reading it back failed
    #[error("Reload after writing {} failed: {source}", path.display())]
    PostPersistReload {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// A tag or attribute name that is not a valid XML name
    #[error("Invalid XML name \"{0}\"")]
    InvalidName(String),

    /// Content holding a character XML does not allow
    #[error("Character {0:?} is not allowed in XML content")]
    InvalidCharacter(char),

    /// The root element cannot be detached
    #[error("Refusing to remove root element [{0}]")]
    RootRemoval(String),
}

impl Error {
    pub(crate) fn tag_not_found(tag: &str, index: usize) -> Self {
        Error::TagNotFound {
            tag: tag.to_string(),
            index,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for tagdoc operations.
pub type Result<T> = std::result::Result<T, Error>;
