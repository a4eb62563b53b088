//! Immutable flow content sequences.

use crate::common::style::{ParagraphStyle, TextStyle};
use crate::common::text::{MAX_TEXT_RUN_LENGTH, normalize_text};
use crate::common::{Error, Result};
use crate::flow::cursor::FlowCursor;
use crate::flow::node::{FlowNode, ParagraphBreak, TextRun};
use crate::flow::visitor::{FlowVisitor, PlainTextVisitor};
use std::sync::Arc;

/// An ordered, immutable sequence of flow nodes.
///
/// Cloning is cheap: the node list is shared. Every editing operation
/// returns a new instance.
///
/// # Examples
///
/// ```
/// use flowdoc::flow::FlowContent;
///
/// let content = FlowContent::from_text("Hello\nWorld");
/// assert_eq!(content.size(), 11);
/// assert_eq!(content.paragraph_count(), 2);
/// assert_eq!(content.slice(2, 8).unwrap().plain_text(), "llo\nWo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowContent {
    nodes: Arc<[FlowNode]>,
    size: usize,
}

impl Default for FlowContent {
    fn default() -> Self {
        Self::empty()
    }
}

impl FlowContent {
    /// Build content from nodes. Empty text runs are dropped.
    pub fn new(nodes: impl IntoIterator<Item = FlowNode>) -> Self {
        let nodes: Vec<FlowNode> = nodes.into_iter().filter(|node| node.size() > 0).collect();
        let size = nodes.iter().map(FlowNode::size).sum();
        Self {
            nodes: nodes.into(),
            size,
        }
    }

    #[inline]
    pub fn empty() -> Self {
        Self {
            nodes: Arc::from(Vec::new()),
            size: 0,
        }
    }

    /// Build content from free-form text.
    ///
    /// Each line becomes a paragraph. The text is sanitized with
    /// [`normalize_text`] and long lines are split into several runs.
    pub fn from_text(text: &str) -> Self {
        let mut nodes = Vec::new();
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                nodes.push(FlowNode::paragraph_break(ParagraphStyle::default()));
            }
            let line = normalize_text(line.strip_suffix('\r').unwrap_or(line));

            let mut chunk = String::new();
            let mut units = 0;
            for ch in line.chars() {
                if units + ch.len_utf16() > MAX_TEXT_RUN_LENGTH {
                    nodes.push(FlowNode::TextRun(TextRun::new_unchecked(
                        std::mem::take(&mut chunk),
                        TextStyle::default(),
                    )));
                    units = 0;
                }
                chunk.push(ch);
                units += ch.len_utf16();
            }
            if !chunk.is_empty() {
                nodes.push(FlowNode::TextRun(TextRun::new_unchecked(
                    chunk,
                    TextStyle::default(),
                )));
            }
        }
        Self::new(nodes)
    }

    #[inline]
    pub fn nodes(&self) -> &[FlowNode] {
        &self.nodes
    }

    /// Total size in UTF-16 code units.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn cursor_at_start(&self) -> FlowCursor<'_> {
        FlowCursor::new(self)
    }

    #[inline]
    pub fn cursor_at_end(&self) -> FlowCursor<'_> {
        FlowCursor::new(self).move_to_end()
    }

    /// Cursor at an absolute position.
    pub fn peek(&self, position: usize) -> Result<FlowCursor<'_>> {
        FlowCursor::new(self).move_by(to_signed(position)?)
    }

    /// Concatenate two sequences.
    pub fn append(&self, other: &FlowContent) -> FlowContent {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        Self::new(self.nodes.iter().chain(other.nodes.iter()).cloned())
    }

    /// Insert `content` at `position`, splitting a text run if needed.
    pub fn insert(&self, position: usize, content: &FlowContent) -> Result<FlowContent> {
        let head = self.slice(0, position)?;
        let tail = self.slice(position, self.size)?;
        Ok(head.append(content).append(&tail))
    }

    /// Remove the range `[from, to)`.
    pub fn remove(&self, from: usize, to: usize) -> Result<FlowContent> {
        let (from, to) = (from.min(to), from.max(to));
        let head = self.slice(0, from)?;
        let tail = self.slice(to, self.size)?;
        Ok(head.append(&tail))
    }

    /// Copy the range `[from, to)`; boundary text runs are split.
    pub fn slice(&self, from: usize, to: usize) -> Result<FlowContent> {
        let start = self.peek(from)?;
        start.range(to_signed(to)? - to_signed(from)?)
    }

    /// Text content with breaks rendered as newlines.
    pub fn plain_text(&self) -> String {
        let mut visitor = PlainTextVisitor::default();
        // The plain text visitor never fails
        let _ = visitor.visit_content(self);
        visitor.finish()
    }

    /// Iterate over paragraphs; see [`Paragraph`].
    #[inline]
    pub fn paragraphs(&self) -> Paragraphs<'_> {
        Paragraphs { rest: &self.nodes }
    }

    /// Number of paragraphs, counting trailing content without a break.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs().count()
    }
}

impl From<Vec<FlowNode>> for FlowContent {
    fn from(nodes: Vec<FlowNode>) -> Self {
        Self::new(nodes)
    }
}

impl FromIterator<FlowNode> for FlowContent {
    fn from_iter<I: IntoIterator<Item = FlowNode>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Inline nodes of one paragraph plus the break that ends it.
#[derive(Debug, Clone, Copy)]
pub struct Paragraph<'a> {
    pub inline: &'a [FlowNode],
    /// `None` for trailing content after the last paragraph break
    pub end: Option<&'a ParagraphBreak>,
}

/// Iterator returned by [`FlowContent::paragraphs`].
#[derive(Debug, Clone)]
pub struct Paragraphs<'a> {
    rest: &'a [FlowNode],
}

impl<'a> Iterator for Paragraphs<'a> {
    type Item = Paragraph<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        match self.rest.iter().position(FlowNode::is_paragraph_break) {
            Some(index) => {
                let inline = &self.rest[..index];
                let end = self.rest[index].as_paragraph_break();
                self.rest = &self.rest[index + 1..];
                Some(Paragraph { inline, end })
            },
            None => {
                let inline = self.rest;
                self.rest = &[];
                Some(Paragraph { inline, end: None })
            },
        }
    }
}

#[inline]
pub(crate) fn to_signed(value: usize) -> Result<isize> {
    isize::try_from(value).map_err(|_| Error::OutOfRange {
        position: isize::MAX,
        size: value,
    })
}
