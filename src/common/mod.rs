//! Common types and utilities shared across the crate.
//!
//! This module provides the unified error type, charset handling and the XML
//! text helpers used by both the tree parser and the renderer.

// Submodule declarations
pub mod bom;
pub mod encoding;
pub mod error;
pub mod xml;

// Re-exports for convenience
pub use encoding::{Charset, ISO_8859_1, UTF_8};
pub use error::{Error, Result};
