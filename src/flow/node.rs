//! Flow node variants.
//!
//! A flow document is a flat sequence of [`FlowNode`]s. Every node has a size
//! in UTF-16 code units: text runs measure their text, everything else is 1.

use crate::common::style::{BoxStyle, ParagraphStyle, TextStyle};
use crate::common::text::{utf16_len, utf16_to_byte_offset, validate_text};
use crate::common::{Error, Result};
use crate::flow::content::FlowContent;
use crate::flow::table::FlowTable;
use crate::flow::visitor::FlowVisitor;
use crate::script::Script;
use std::collections::BTreeMap;

/// Value of a markup attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrValue {
    Text(String),
    /// Computed by a script when the document is rendered
    Script(Script),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

/// Markup attributes, ordered by key.
pub type MarkupAttrs = BTreeMap<String, AttrValue>;

/// A run of text with uniform style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    text: String,
    size: usize,
    pub style: TextStyle,
}

impl TextRun {
    /// Create a text run; the text must pass [`validate_text`].
    pub fn new(text: impl Into<String>, style: TextStyle) -> Result<Self> {
        let text = text.into();
        validate_text(&text)?;
        let size = utf16_len(&text);
        Ok(Self { text, size, style })
    }

    /// Create a run from text already known to be valid.
    pub(crate) fn new_unchecked(text: String, style: TextStyle) -> Self {
        let size = utf16_len(&text);
        Self { text, size, style }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in UTF-16 code units.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Split at a UTF-16 offset into a head and a tail run.
    pub fn split_at(&self, offset: usize) -> Result<(TextRun, TextRun)> {
        let byte = utf16_to_byte_offset(&self.text, offset).ok_or_else(|| {
            Error::InvalidSplit(format!(
                "Offset {} is not a character boundary of a text run of size {}",
                offset, self.size
            ))
        })?;
        let (head, tail) = self.text.split_at(byte);
        Ok((
            TextRun {
                text: head.to_string(),
                size: offset,
                style: self.style.clone(),
            },
            TextRun {
                text: tail.to_string(),
                size: self.size - offset,
                style: self.style.clone(),
            },
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBreak {
    pub style: TextStyle,
}

/// Ends a paragraph and carries its style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphBreak {
    pub style: ParagraphStyle,
}

/// Opens a tag-delimited region; paired with an [`EndMarkup`] of the same tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartMarkup {
    pub tag: String,
    pub style: TextStyle,
    pub attr: MarkupAttrs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndMarkup {
    pub tag: String,
    pub style: TextStyle,
}

/// A self-contained markup tag with no content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyMarkup {
    pub tag: String,
    pub style: TextStyle,
    pub attr: MarkupAttrs,
}

/// Text computed by a script expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicText {
    pub expression: Script,
    pub style: TextStyle,
}

/// Icon given by SVG path data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowIcon {
    pub data: String,
    pub style: TextStyle,
}

/// Location and intrinsic size of an image or video resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageSource {
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// Low resolution data URL shown while loading
    pub placeholder: Option<String>,
    /// Id of a pending upload
    pub upload: Option<String>,
}

impl ImageSource {
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            url: url.into(),
            width,
            height,
            placeholder: None,
            upload: None,
        }
    }
}

/// Default image and video scale, in percent.
pub const DEFAULT_SCALE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowImage {
    pub source: ImageSource,
    /// Scale in percent
    pub scale: u32,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowVideo {
    pub source: ImageSource,
    pub poster: Option<ImageSource>,
    /// Scale in percent
    pub scale: u32,
    pub style: TextStyle,
}

/// A container holding nested content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowBox {
    pub content: FlowContent,
    pub style: BoxStyle,
}

/// One element of a flow content sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowNode {
    TextRun(TextRun),
    LineBreak(LineBreak),
    ParagraphBreak(ParagraphBreak),
    StartMarkup(StartMarkup),
    EndMarkup(EndMarkup),
    EmptyMarkup(EmptyMarkup),
    DynamicText(DynamicText),
    Icon(FlowIcon),
    Image(FlowImage),
    Video(FlowVideo),
    Box(FlowBox),
    Table(FlowTable),
}

impl FlowNode {
    /// Text run node; see [`TextRun::new`].
    pub fn text(text: impl Into<String>, style: TextStyle) -> Result<Self> {
        TextRun::new(text, style).map(FlowNode::TextRun)
    }

    pub fn paragraph_break(style: ParagraphStyle) -> Self {
        FlowNode::ParagraphBreak(ParagraphBreak { style })
    }

    pub fn line_break(style: TextStyle) -> Self {
        FlowNode::LineBreak(LineBreak { style })
    }

    pub fn start_markup(tag: impl Into<String>, attr: MarkupAttrs) -> Self {
        FlowNode::StartMarkup(StartMarkup {
            tag: tag.into(),
            style: TextStyle::default(),
            attr,
        })
    }

    pub fn end_markup(tag: impl Into<String>) -> Self {
        FlowNode::EndMarkup(EndMarkup {
            tag: tag.into(),
            style: TextStyle::default(),
        })
    }

    pub fn empty_markup(tag: impl Into<String>, attr: MarkupAttrs) -> Self {
        FlowNode::EmptyMarkup(EmptyMarkup {
            tag: tag.into(),
            style: TextStyle::default(),
            attr,
        })
    }

    /// Size in UTF-16 code units.
    #[inline]
    pub fn size(&self) -> usize {
        match self {
            FlowNode::TextRun(run) => run.size(),
            _ => 1,
        }
    }

    /// Text style of inline nodes; `None` for paragraph breaks, boxes and tables.
    pub fn text_style(&self) -> Option<&TextStyle> {
        match self {
            FlowNode::TextRun(n) => Some(&n.style),
            FlowNode::LineBreak(n) => Some(&n.style),
            FlowNode::StartMarkup(n) => Some(&n.style),
            FlowNode::EndMarkup(n) => Some(&n.style),
            FlowNode::EmptyMarkup(n) => Some(&n.style),
            FlowNode::DynamicText(n) => Some(&n.style),
            FlowNode::Icon(n) => Some(&n.style),
            FlowNode::Image(n) => Some(&n.style),
            FlowNode::Video(n) => Some(&n.style),
            FlowNode::ParagraphBreak(_) | FlowNode::Box(_) | FlowNode::Table(_) => None,
        }
    }

    #[inline]
    pub fn is_paragraph_break(&self) -> bool {
        matches!(self, FlowNode::ParagraphBreak(_))
    }

    #[inline]
    pub fn as_text_run(&self) -> Option<&TextRun> {
        match self {
            FlowNode::TextRun(run) => Some(run),
            _ => None,
        }
    }

    #[inline]
    pub fn as_paragraph_break(&self) -> Option<&ParagraphBreak> {
        match self {
            FlowNode::ParagraphBreak(node) => Some(node),
            _ => None,
        }
    }

    /// Markup tag of start, end and empty markup nodes.
    pub fn markup_tag(&self) -> Option<&str> {
        match self {
            FlowNode::StartMarkup(n) => Some(&n.tag),
            FlowNode::EndMarkup(n) => Some(&n.tag),
            FlowNode::EmptyMarkup(n) => Some(&n.tag),
            _ => None,
        }
    }

    /// Split at a UTF-16 offset. Only text runs can be split.
    pub fn split_at(&self, offset: usize) -> Result<(FlowNode, FlowNode)> {
        match self {
            FlowNode::TextRun(run) => {
                let (head, tail) = run.split_at(offset)?;
                Ok((FlowNode::TextRun(head), FlowNode::TextRun(tail)))
            },
            _ => Err(Error::InvalidSplit(format!(
                "Cannot split {} node",
                self.kind()
            ))),
        }
    }

    /// Short variant name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            FlowNode::TextRun(_) => "text",
            FlowNode::LineBreak(_) => "line break",
            FlowNode::ParagraphBreak(_) => "paragraph break",
            FlowNode::StartMarkup(_) => "start markup",
            FlowNode::EndMarkup(_) => "end markup",
            FlowNode::EmptyMarkup(_) => "empty markup",
            FlowNode::DynamicText(_) => "dynamic text",
            FlowNode::Icon(_) => "icon",
            FlowNode::Image(_) => "image",
            FlowNode::Video(_) => "video",
            FlowNode::Box(_) => "box",
            FlowNode::Table(_) => "table",
        }
    }

    /// Dispatch to the visitor method for this variant.
    pub fn accept<V: FlowVisitor + ?Sized>(&self, visitor: &mut V) -> Result<()> {
        match self {
            FlowNode::TextRun(n) => visitor.visit_text_run(n),
            FlowNode::LineBreak(n) => visitor.visit_line_break(n),
            FlowNode::ParagraphBreak(n) => visitor.visit_paragraph_break(n),
            FlowNode::StartMarkup(n) => visitor.visit_start_markup(n),
            FlowNode::EndMarkup(n) => visitor.visit_end_markup(n),
            FlowNode::EmptyMarkup(n) => visitor.visit_empty_markup(n),
            FlowNode::DynamicText(n) => visitor.visit_dynamic_text(n),
            FlowNode::Icon(n) => visitor.visit_icon(n),
            FlowNode::Image(n) => visitor.visit_image(n),
            FlowNode::Video(n) => visitor.visit_video(n),
            FlowNode::Box(n) => visitor.visit_box(n),
            FlowNode::Table(n) => visitor.visit_table(n),
        }
    }
}

macro_rules! impl_from_node {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        $(
            impl From<$ty> for FlowNode {
                #[inline]
                fn from(node: $ty) -> Self {
                    FlowNode::$variant(node)
                }
            }
        )+
    };
}

impl_from_node!(
    TextRun(TextRun),
    LineBreak(LineBreak),
    ParagraphBreak(ParagraphBreak),
    StartMarkup(StartMarkup),
    EndMarkup(EndMarkup),
    EmptyMarkup(EmptyMarkup),
    DynamicText(DynamicText),
    Icon(FlowIcon),
    Image(FlowImage),
    Video(FlowVideo),
    Box(FlowBox),
    Table(FlowTable),
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        let run = FlowNode::text("a😀b", TextStyle::default()).unwrap();
        assert_eq!(run.size(), 4);
        assert_eq!(FlowNode::paragraph_break(ParagraphStyle::default()).size(), 1);
        assert_eq!(FlowNode::empty_markup("x", MarkupAttrs::new()).size(), 1);
    }

    #[test]
    fn test_text_run_rejects_invalid_text() {
        assert!(matches!(
            TextRun::new("bad\u{0001}", TextStyle::default()),
            Err(Error::InvalidText(_))
        ));
    }

    #[test]
    fn test_split_text_run() {
        let run = TextRun::new("ab😀", TextStyle::bold()).unwrap();
        let (head, tail) = run.split_at(2).unwrap();
        assert_eq!(head.text(), "ab");
        assert_eq!(tail.text(), "😀");
        assert_eq!(tail.size(), 2);
        assert_eq!(tail.style, TextStyle::bold());
        assert!(matches!(run.split_at(3), Err(Error::InvalidSplit(_))));
    }

    #[test]
    fn test_split_non_text_fails() {
        let node = FlowNode::line_break(TextStyle::default());
        assert!(matches!(node.split_at(0), Err(Error::InvalidSplit(_))));
    }
}
