//! Flow document model.
//!
//! - [`FlowNode`]: the closed set of node variants
//! - [`FlowContent`]: an immutable node sequence
//! - [`FlowCursor`]: position arithmetic, slicing and markup bracket matching
//! - [`FlowTableContent`]: the spanning grid behind table nodes
//! - [`FlowVisitor`]: per-variant dispatch used by renderers and the codec

pub mod content;
pub mod cursor;
pub mod node;
pub mod table;
pub mod visitor;

pub use content::{FlowContent, Paragraph, Paragraphs};
pub use cursor::FlowCursor;
pub use node::{
    AttrValue, DEFAULT_SCALE, DynamicText, EmptyMarkup, EndMarkup, FlowBox, FlowIcon, FlowImage,
    FlowNode, FlowVideo, ImageSource, LineBreak, MarkupAttrs, ParagraphBreak, StartMarkup, TextRun,
};
pub use table::{
    DEFAULT_MAX_POSITIONS, FlowTable, FlowTableCell, FlowTableColumn, FlowTableContent,
    TableOptions,
};
pub use visitor::{FlowVisitor, PlainTextVisitor};
