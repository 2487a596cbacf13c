//! Unified error types for tagdoc.
//!
//! This module provides a single error type shared by the parser, the
//! document store and the tag facade.

// Submodule declarations
pub mod types;
pub mod conversions;

// Re-exports
pub use types::{Error, Result};
