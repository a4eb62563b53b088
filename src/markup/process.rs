//! Asynchronous markup rewriting.

use super::types::{
    MarkupAction, MarkupContext, MarkupHandler, ParagraphMode, ReplacementRegistry, placeholder,
};
use crate::common::style::ParagraphStyle;
use crate::common::{Error, Result};
use crate::flow::content::to_signed;
use crate::flow::{FlowBox, FlowContent, FlowCursor, FlowNode, FlowTable, ParagraphBreak};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

type ProcessFuture<'a> = Pin<Box<dyn Future<Output = Result<FlowContent>> + Send + 'a>>;

/// Rewrite every matched markup region of `content` through `handler`.
///
/// Markup is matched as start/end brackets; each `StartMarkup` with a
/// matching `EndMarkup`, and each `EmptyMarkup`, is handed to the handler in
/// document order. Content nested in kept markup, replacement content, boxes
/// and table cells is rewritten recursively. A paragraph left empty only
/// because its markup was removed loses its paragraph break too.
///
/// # Examples
///
/// ```
/// use flowdoc::common::style::{ParagraphStyle, TextStyle};
/// use flowdoc::flow::{FlowContent, FlowNode, MarkupAttrs};
/// use flowdoc::markup::{MarkupAction, MarkupContext, ReplacementRegistry, process_markup};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), flowdoc::Error> {
/// let content = FlowContent::new(vec![
///     FlowNode::text("Hello ", TextStyle::default())?,
///     FlowNode::empty_markup("name", MarkupAttrs::new()),
///     FlowNode::paragraph_break(ParagraphStyle::default()),
/// ]);
///
/// let handler = |context: &MarkupContext<'_>| -> flowdoc::Result<MarkupAction<()>> {
///     Ok(match context.tag() {
///         "name" => MarkupAction::Replace(FlowContent::from_text("world")),
///         _ => MarkupAction::Keep,
///     })
/// };
/// let mut registry = ReplacementRegistry::new();
/// let rewritten = process_markup(&content, &handler, &mut registry).await?;
/// assert_eq!(rewritten.plain_text(), "Hello world\n");
/// # Ok(())
/// # }
/// ```
pub async fn process_markup<T, H>(
    content: &FlowContent,
    handler: &H,
    registry: &mut ReplacementRegistry<T>,
) -> Result<FlowContent>
where
    T: Send + 'static,
    H: MarkupHandler<T> + ?Sized,
{
    let mut processor = Processor { handler, registry };
    processor.process(content, None).await
}

/// Run [`process_markup`] to completion on a current-thread runtime.
///
/// For synchronous callers. Must not be called from inside an async runtime.
pub fn process_markup_blocking<T, H>(
    content: &FlowContent,
    handler: &H,
    registry: &mut ReplacementRegistry<T>,
) -> Result<FlowContent>
where
    T: Send + 'static,
    H: MarkupHandler<T> + ?Sized,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(|e| Error::Other(format!("Failed to start runtime: {}", e)))?;
    runtime.block_on(process_markup(content, handler, registry))
}

struct Processor<'h, T, H: ?Sized> {
    handler: &'h H,
    registry: &'h mut ReplacementRegistry<T>,
}

impl<'h, T, H> Processor<'h, T, H>
where
    T: Send + 'static,
    H: MarkupHandler<T> + ?Sized,
{
    fn process<'a>(
        &'a mut self,
        content: &'a FlowContent,
        parent: Option<&'a FlowNode>,
    ) -> ProcessFuture<'a> {
        Box::pin(async move {
            let mut output: Vec<FlowNode> = Vec::with_capacity(content.node_count());
            let mut mode = ParagraphMode::Empty;
            // Current list item already emitted its visible marker
            let mut continued = false;
            let mut siblings: Vec<FlowNode> = Vec::new();

            let mut next = Some(content.cursor_at_start());
            while let Some(cursor) = next {
                let Some(node) = cursor.node() else {
                    break;
                };
                next = cursor.move_to_start_of_next_node();

                let (inner, end) = match node {
                    FlowNode::StartMarkup(start) => match cursor.find_markup_end() {
                        Some(end) => {
                            next = end.move_to_start_of_next_node();
                            (Some(inner_content(&cursor, &end)?), end.node())
                        },
                        None => {
                            tracing::warn!(
                                tag = %start.tag,
                                position = cursor.position(),
                                "Start markup has no matching end, keeping it as is"
                            );
                            output.push(node.clone());
                            mode = ParagraphMode::NotEmpty;
                            continue;
                        },
                    },
                    FlowNode::EmptyMarkup(_) => (None, None),
                    FlowNode::ParagraphBreak(_) => {
                        if mode != ParagraphMode::Omit {
                            output.push(node.clone());
                        }
                        mode = ParagraphMode::Empty;
                        continued = false;
                        continue;
                    },
                    FlowNode::Box(flow_box) => {
                        let processed = self.process(&flow_box.content, parent).await?;
                        output.push(if processed == flow_box.content {
                            node.clone()
                        } else {
                            FlowBox {
                                content: processed,
                                style: flow_box.style.clone(),
                            }
                            .into()
                        });
                        mode = ParagraphMode::NotEmpty;
                        continue;
                    },
                    FlowNode::Table(table) => {
                        let processed = self.process_table(table, parent).await?;
                        output.push(processed.into());
                        mode = ParagraphMode::NotEmpty;
                        continue;
                    },
                    _ => {
                        output.push(node.clone());
                        mode = ParagraphMode::NotEmpty;
                        continue;
                    },
                };

                let list_style = if mode != ParagraphMode::NotEmpty {
                    cursor
                        .get_paragraph_style()
                        .filter(|style| style.is_list_item())
                } else {
                    None
                };

                let tag = node.markup_tag().unwrap_or_default();
                tracing::debug!(tag, position = cursor.position(), "Invoking markup handler");
                let context = MarkupContext {
                    node,
                    content: inner.clone(),
                    siblings_before: &siblings,
                    parent,
                };
                let action = self.handler.handle(context).await?;

                match action {
                    MarkupAction::Keep => {
                        output.push(node.clone());
                        if let Some(inner) = &inner {
                            let processed = self.process(inner, Some(node)).await?;
                            output.extend(processed.nodes().iter().cloned());
                        }
                        if let Some(end) = end {
                            output.push(end.clone());
                        }
                        mode = ParagraphMode::NotEmpty;
                    },
                    MarkupAction::Remove => {
                        mode = mode.after_drop();
                    },
                    MarkupAction::Replace(replacement) => {
                        let processed = self.process(&replacement, Some(node)).await?;
                        mode = splice(&mut output, &processed, list_style, mode, &mut continued);
                    },
                    MarkupAction::Register(value) => {
                        let index = self.registry.register(value);
                        let style = node.text_style().cloned().unwrap_or_default();
                        output.push(placeholder(tag, style, index));
                        mode = ParagraphMode::NotEmpty;
                    },
                }
                siblings.push(node.clone());
            }

            Ok(FlowContent::new(output))
        })
    }

    /// Rewrite every explicit cell, then the default cell content once.
    async fn process_table(&mut self, table: &FlowTable, parent: Option<&FlowNode>) -> Result<FlowTable> {
        let grid = &table.content;
        let mut updated = HashMap::new();
        for (position, cell) in grid.cells() {
            let processed = self.process(cell.content(), parent).await?;
            if processed != *cell.content() {
                updated.insert(position, processed);
            }
        }
        let default_content = self.process(grid.default_content(), parent).await?;

        let content = grid.update_all_content(|position, current| {
            updated.remove(&position).unwrap_or_else(|| current.clone())
        });
        let content = if default_content != *grid.default_content() {
            content.with_default_content(default_content)
        } else {
            content.into_owned()
        };

        Ok(FlowTable {
            columns: table.columns.clone(),
            style: table.style.clone(),
            content,
        })
    }
}

/// Nodes strictly between a start markup and its matching end.
fn inner_content(start: &FlowCursor<'_>, end: &FlowCursor<'_>) -> Result<FlowContent> {
    match start.move_to_start_of_next_node() {
        Some(first) => first.range(to_signed(end.position() - first.position())?),
        None => Ok(FlowContent::empty()),
    }
}

/// Append a rewritten replacement and return the new paragraph state.
///
/// A list replacement landing after an earlier one in the same item keeps
/// every marker it inherits hidden.
fn splice(
    output: &mut Vec<FlowNode>,
    replacement: &FlowContent,
    list_style: Option<&ParagraphStyle>,
    mode: ParagraphMode,
    continued: &mut bool,
) -> ParagraphMode {
    if replacement.is_empty() {
        return mode.after_drop();
    }

    match list_style {
        Some(outer) => {
            output.extend(transplant_list(replacement, outer, *continued));
            *continued |= replacement.nodes().iter().any(FlowNode::is_paragraph_break);
        },
        None => output.extend(replacement.nodes().iter().cloned()),
    }

    // A replacement ending in a paragraph break closes the current paragraph
    if replacement.nodes().last().is_some_and(FlowNode::is_paragraph_break) {
        ParagraphMode::Omit
    } else {
        ParagraphMode::NotEmpty
    }
}

/// Nest the replacement's paragraphs under the list item it lands in.
///
/// Every paragraph break gains the outer list level. Paragraphs that were
/// not list items themselves continue the outer item, so after the first
/// one their marker is hidden. With `continued` the first one is hidden too.
fn transplant_list<'r>(
    replacement: &'r FlowContent,
    outer: &'r ParagraphStyle,
    continued: bool,
) -> impl Iterator<Item = FlowNode> + 'r {
    let level = outer.list_level();
    let mut first = !continued;
    replacement.nodes().iter().map(move |node| {
        let FlowNode::ParagraphBreak(paragraph) = node else {
            return node.clone();
        };
        let mut style = paragraph.style.clone();
        if !style.is_list_item() {
            style.list_marker = style.list_marker.or(outer.list_marker);
            if !first {
                style.hide_list_marker = Some(true);
            }
        }
        style.list_level = Some(style.list_level() + level);
        first = false;
        ParagraphBreak { style }.into()
    })
}
