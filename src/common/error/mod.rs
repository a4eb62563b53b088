//! Unified error types for flowdoc.
//!
//! This module provides the single error type shared by the document model,
//! the XML codec and the markup rewrite engine.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
