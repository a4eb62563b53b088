//! Unified error types for flowdoc.
//!
//! Every fallible operation in the crate reports one of these variants, from
//! cursor arithmetic through table grid edits to the XML codec.
use thiserror::Error;

/// Main error type for flowdoc operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A cursor move or slice reached outside `[0, size]`
    #[error("Position {position} is out of range (content size is {size})")]
    OutOfRange { position: isize, size: usize },

    /// A split was requested inside a node that cannot be split
    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    /// Text rejected at construction
    #[error("Invalid text: {0}")]
    InvalidText(String),

    /// Table cell key is not valid A1 notation
    #[error("Invalid cell key: {0}")]
    InvalidCellKey(String),

    /// A style, script or image source id is absent from the trailer
    #[error("Missing {kind} reference: {id}")]
    MissingReference { kind: &'static str, id: String },

    /// Wrong root element, namespace or structure
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// A required attribute is absent
    #[error("Element <{element}> requires attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    /// A merge would cover a cell that is already merged
    #[error("Cell is already merged: {0}")]
    AlreadyMerged(String),

    /// Two cells claim the same anchor
    #[error("Duplicate cell: {0}")]
    DuplicateCell(String),

    /// A cell position is covered by another cell's span
    #[error("Cell {key} is overlapped by the cell at {anchor}")]
    OverlappedCell { key: String, anchor: String },

    /// A table grid would exceed its position limit
    #[error("Table of {columns}x{rows} positions exceeds the limit of {limit}")]
    TableTooLarge { columns: u64, rows: u64, limit: u64 },

    /// Message text outside the supported plural/select subset
    #[error("Unsupported message format: {0}")]
    UnsupportedMessageFormat(String),

    /// Interaction variant that the codec cannot represent
    #[error("Unsupported interaction: {0}")]
    UnsupportedInteraction(String),

    /// XML syntax error
    #[error("XML error: {0}")]
    XmlError(String),

    /// A markup handler failed
    #[error("Markup handler failed: {0}")]
    Handler(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for flowdoc operations.
pub type Result<T> = std::result::Result<T, Error>;
