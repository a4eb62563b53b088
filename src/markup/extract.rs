//! Synchronous markup extraction.

use super::types::ParagraphMode;
use crate::common::Result;
use crate::flow::content::to_signed;
use crate::flow::{FlowContent, FlowNode};

/// One markup region taken out of the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupMatch {
    /// The `StartMarkup` or `EmptyMarkup` node
    pub node: FlowNode,
    /// Nodes between start and end; `None` for empty markup
    pub content: Option<FlowContent>,
    /// Nodes of the matches extracted before this one
    pub siblings_before: Vec<FlowNode>,
}

/// Result of [`extract_markup`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedMarkup {
    /// The content with every matched region removed
    pub remainder: FlowContent,
    pub matches: Vec<MarkupMatch>,
}

/// Split matched markup regions out of `content`.
///
/// `predicate` sees each `StartMarkup` (with a matching end) and each
/// `EmptyMarkup` at the top level of `content`. Nested content is neither
/// searched nor rewritten. A paragraph break right after a removed region is
/// dropped when that region was the paragraph's only content.
///
/// # Examples
///
/// ```
/// use flowdoc::common::style::{ParagraphStyle, TextStyle};
/// use flowdoc::flow::{FlowContent, FlowNode, MarkupAttrs};
/// use flowdoc::markup::extract_markup;
///
/// let content = FlowContent::new(vec![
///     FlowNode::empty_markup("meta", MarkupAttrs::new()),
///     FlowNode::paragraph_break(ParagraphStyle::default()),
///     FlowNode::text("Body", TextStyle::default()).unwrap(),
/// ]);
/// let extracted = extract_markup(&content, |node| node.markup_tag() == Some("meta")).unwrap();
/// assert_eq!(extracted.matches.len(), 1);
/// assert_eq!(extracted.remainder.plain_text(), "Body");
/// ```
pub fn extract_markup<F>(content: &FlowContent, mut predicate: F) -> Result<ExtractedMarkup>
where
    F: FnMut(&FlowNode) -> bool,
{
    let mut remainder: Vec<FlowNode> = Vec::with_capacity(content.node_count());
    let mut matches: Vec<MarkupMatch> = Vec::new();
    let mut mode = ParagraphMode::Empty;

    let mut next = Some(content.cursor_at_start());
    while let Some(cursor) = next {
        let Some(node) = cursor.node() else {
            break;
        };
        next = cursor.move_to_start_of_next_node();

        let matched = match node {
            FlowNode::StartMarkup(_) if predicate(node) => match cursor.find_markup_end() {
                Some(end) => {
                    next = end.move_to_start_of_next_node();
                    let inner = match cursor.move_to_start_of_next_node() {
                        Some(first) => first.range(to_signed(end.position() - first.position())?)?,
                        None => FlowContent::empty(),
                    };
                    Some(Some(inner))
                },
                None => {
                    tracing::warn!(
                        tag = node.markup_tag().unwrap_or_default(),
                        position = cursor.position(),
                        "Start markup has no matching end, leaving it in place"
                    );
                    None
                },
            },
            FlowNode::EmptyMarkup(_) if predicate(node) => Some(None),
            _ => None,
        };

        match matched {
            Some(inner) => {
                matches.push(MarkupMatch {
                    node: node.clone(),
                    content: inner,
                    siblings_before: matches.iter().map(|m| m.node.clone()).collect(),
                });
                mode = mode.after_drop();
            },
            None if node.is_paragraph_break() => {
                if mode != ParagraphMode::Omit {
                    remainder.push(node.clone());
                }
                mode = ParagraphMode::Empty;
            },
            None => {
                remainder.push(node.clone());
                mode = ParagraphMode::NotEmpty;
            },
        }
    }

    Ok(ExtractedMarkup {
        remainder: FlowContent::new(remainder),
        matches,
    })
}
