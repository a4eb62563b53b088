//! Common types and utilities shared across the crate.
//!
//! Error handling, text validation, cell coordinates, style value objects
//! and the XML plumbing used by the flowdoc codec.

// Submodule declarations
pub mod bom;
pub mod coordinates;
pub mod error;
pub mod style;
pub mod text;
pub mod xml;

// Re-exports for convenience
pub use coordinates::CellPosition;
pub use error::{Error, Result};
