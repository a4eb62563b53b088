//! Flowdoc - structured flow documents and their XML interchange format
//!
//! This library models rich text as a flat, addressable sequence of typed
//! nodes and converts it to and from the flowdoc XML format.
//!
//! # Features
//!
//! - **Flow content model**: Immutable node sequences measured in UTF-16 code units
//! - **Cursor algebra**: Position arithmetic, slicing and markup bracket matching
//! - **Spanning tables**: Sparse grids with overlap-safe row and column edits
//! - **Flowdoc codec**: Lossless XML round trip with de-duplicated styles and scripts
//! - **Markup rewriting**: Async transclusion and removal of tagged regions
//!
//! # Example - Building and navigating content
//!
//! ```
//! use flowdoc::flow::FlowContent;
//!
//! # fn main() -> Result<(), flowdoc::Error> {
//! let content = FlowContent::from_text("Hello\nWorld");
//! assert_eq!(content.size(), 11);
//!
//! let cursor = content.cursor_at_start().move_by(7)?;
//! assert_eq!(cursor.node().and_then(|n| n.as_text_run()).map(|r| r.text()), Some("World"));
//! assert_eq!(cursor.offset(), 1);
//!
//! let slice = content.slice(2, 8)?;
//! assert_eq!(slice.plain_text(), "llo\nWo");
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Writing and reading flowdoc
//!
//! ```
//! use flowdoc::flow::FlowContent;
//! use flowdoc::flowdoc::{FlowdocOptions, ToFlowdoc, deserialize_flowdoc};
//!
//! # fn main() -> Result<(), flowdoc::Error> {
//! let content = FlowContent::from_text("Quarterly report\n");
//! let xml = content.to_flowdoc()?;
//! let parsed = deserialize_flowdoc(&xml, &FlowdocOptions::default())?;
//! assert_eq!(parsed, content);
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Editing a table grid
//!
//! ```
//! use flowdoc::common::CellPosition;
//! use flowdoc::flow::{FlowContent, FlowTableCell, FlowTableContent, TableOptions};
//!
//! # fn main() -> Result<(), flowdoc::Error> {
//! let grid = FlowTableContent::from_keys(
//!     vec![("A1", FlowTableCell::new(FlowContent::from_text("Name")))],
//!     &TableOptions::default(),
//! )?
//! .with_dimensions(2, 2)?
//! .merge(CellPosition::new(0, 0), 2, 1)?;
//! assert!(grid.is_shadowed("B1".parse()?));
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod flow;
pub mod flowdoc;
pub mod markup;
pub mod script;

// Re-export commonly used types
pub use common::{Error, Result};
pub use flow::{FlowContent, FlowCursor, FlowNode};
