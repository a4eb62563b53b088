//! Handler contract and shared types for markup rewriting.

use crate::common::Result;
use crate::common::style::TextStyle;
use crate::flow::{AttrValue, EmptyMarkup, FlowContent, FlowNode, MarkupAttrs};
use async_trait::async_trait;

/// Tag prefix of placeholders left where a handler registered a value.
pub const REPLACEMENT_TAG_PREFIX: &str = "REPLACEMENT_";

/// Placeholder attribute holding the registry index.
pub const REPLACEMENT_REF_ATTR: &str = "ref";

/// A matched markup node as seen by a handler.
#[derive(Debug, Clone)]
pub struct MarkupContext<'a> {
    /// The `StartMarkup` or `EmptyMarkup` node
    pub node: &'a FlowNode,
    /// Nodes between the start and its matching end; `None` for empty markup
    pub content: Option<FlowContent>,
    /// Markup nodes matched earlier at the same level
    pub siblings_before: &'a [FlowNode],
    /// Enclosing markup node when rewriting nested content
    pub parent: Option<&'a FlowNode>,
}

impl<'a> MarkupContext<'a> {
    /// Tag of the matched node.
    pub fn tag(&self) -> &'a str {
        self.node.markup_tag().unwrap_or_default()
    }

    /// Attributes of the matched node.
    pub fn attrs(&self) -> Option<&'a MarkupAttrs> {
        match self.node {
            FlowNode::StartMarkup(start) => Some(&start.attr),
            FlowNode::EmptyMarkup(empty) => Some(&empty.attr),
            _ => None,
        }
    }

    #[inline]
    pub fn attr(&self, key: &str) -> Option<&'a AttrValue> {
        self.attrs()?.get(key)
    }

    pub fn style(&self) -> Option<&'a TextStyle> {
        self.node.text_style()
    }
}

/// What a handler decided for one matched node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupAction<T> {
    /// Keep the markup; its nested content is still rewritten
    Keep,
    /// Drop the markup together with its content
    Remove,
    /// Splice this content in place of the markup; it is rewritten first
    Replace(FlowContent),
    /// Store the value in the registry and leave a placeholder
    Register(T),
}

/// Decides what happens to each matched markup node.
///
/// Handlers are awaited one at a time, in document order, exactly once per
/// matched node. An error aborts the whole rewrite.
#[async_trait]
pub trait MarkupHandler<T: Send + 'static>: Send + Sync {
    async fn handle(&self, context: MarkupContext<'_>) -> Result<MarkupAction<T>>;
}

#[async_trait]
impl<T, F> MarkupHandler<T> for F
where
    T: Send + 'static,
    F: Fn(&MarkupContext<'_>) -> Result<MarkupAction<T>> + Send + Sync,
{
    async fn handle(&self, context: MarkupContext<'_>) -> Result<MarkupAction<T>> {
        self(&context)
    }
}

/// Caller-owned side table for values registered by handlers.
///
/// # Examples
///
/// ```
/// use flowdoc::markup::ReplacementRegistry;
///
/// let mut registry = ReplacementRegistry::new();
/// let index = registry.register("chart");
/// let placeholder = registry.placeholder("embed", index);
/// assert_eq!(placeholder.markup_tag(), Some("REPLACEMENT_embed"));
/// assert_eq!(registry.resolve(&placeholder), Some(&"chart"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementRegistry<T> {
    entries: Vec<T>,
}

impl<T> Default for ReplacementRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReplacementRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Store a value and return its index.
    pub fn register(&mut self, value: T) -> usize {
        self.entries.push(value);
        self.entries.len() - 1
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.entries
    }

    /// Placeholder node for the value at `index`, replacing markup `tag`.
    pub fn placeholder(&self, tag: &str, index: usize) -> FlowNode {
        placeholder(tag, TextStyle::default(), index)
    }

    /// Value referenced by a placeholder node.
    pub fn resolve(&self, node: &FlowNode) -> Option<&T> {
        self.get(placeholder_index(node)?)
    }
}

pub(crate) fn placeholder(tag: &str, style: TextStyle, index: usize) -> FlowNode {
    let mut attr = MarkupAttrs::new();
    attr.insert(
        REPLACEMENT_REF_ATTR.to_string(),
        AttrValue::Text(index.to_string()),
    );
    EmptyMarkup {
        tag: format!("{}{}", REPLACEMENT_TAG_PREFIX, tag),
        style,
        attr,
    }
    .into()
}

/// Registry index carried by a placeholder node.
pub fn placeholder_index(node: &FlowNode) -> Option<usize> {
    let FlowNode::EmptyMarkup(empty) = node else {
        return None;
    };
    if !empty.tag.starts_with(REPLACEMENT_TAG_PREFIX) {
        return None;
    }
    match empty.attr.get(REPLACEMENT_REF_ATTR)? {
        AttrValue::Text(index) => index.parse().ok(),
        AttrValue::Script(_) => None,
    }
}

/// Emptiness of the paragraph being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParagraphMode {
    Empty,
    NotEmpty,
    /// Emptied only by dropped markup; its break is suppressed
    Omit,
}

impl ParagraphMode {
    /// State after dropping a markup node.
    #[inline]
    pub(crate) fn after_drop(self) -> Self {
        match self {
            ParagraphMode::Empty => ParagraphMode::Omit,
            other => other,
        }
    }
}
