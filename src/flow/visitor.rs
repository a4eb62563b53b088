//! Per-variant dispatch over flow nodes.

use crate::common::Result;
use crate::flow::content::FlowContent;
use crate::flow::node::{
    DynamicText, EmptyMarkup, EndMarkup, FlowBox, FlowIcon, FlowImage, FlowVideo, LineBreak,
    ParagraphBreak, StartMarkup, TextRun,
};
use crate::flow::table::FlowTable;

/// Visitor with one method per node variant.
///
/// Every method defaults to doing nothing, except boxes and tables, which
/// walk their nested content.
pub trait FlowVisitor {
    fn visit_content(&mut self, content: &FlowContent) -> Result<()> {
        for node in content.nodes() {
            node.accept(self)?;
        }
        Ok(())
    }

    fn visit_text_run(&mut self, _node: &TextRun) -> Result<()> {
        Ok(())
    }

    fn visit_line_break(&mut self, _node: &LineBreak) -> Result<()> {
        Ok(())
    }

    fn visit_paragraph_break(&mut self, _node: &ParagraphBreak) -> Result<()> {
        Ok(())
    }

    fn visit_start_markup(&mut self, _node: &StartMarkup) -> Result<()> {
        Ok(())
    }

    fn visit_end_markup(&mut self, _node: &EndMarkup) -> Result<()> {
        Ok(())
    }

    fn visit_empty_markup(&mut self, _node: &EmptyMarkup) -> Result<()> {
        Ok(())
    }

    fn visit_dynamic_text(&mut self, _node: &DynamicText) -> Result<()> {
        Ok(())
    }

    fn visit_icon(&mut self, _node: &FlowIcon) -> Result<()> {
        Ok(())
    }

    fn visit_image(&mut self, _node: &FlowImage) -> Result<()> {
        Ok(())
    }

    fn visit_video(&mut self, _node: &FlowVideo) -> Result<()> {
        Ok(())
    }

    fn visit_box(&mut self, node: &FlowBox) -> Result<()> {
        self.visit_content(&node.content)
    }

    fn visit_table(&mut self, node: &FlowTable) -> Result<()> {
        for (_, cell) in node.content.cells() {
            self.visit_content(cell.content())?;
        }
        Ok(())
    }
}

/// Collects the text of a content tree.
///
/// Line and paragraph breaks become `\n`. Boxes and table cells are
/// rendered as their own blocks.
#[derive(Debug, Default)]
pub struct PlainTextVisitor {
    out: String,
}

impl PlainTextVisitor {
    pub fn finish(self) -> String {
        self.out
    }

    fn end_block(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }
}

impl FlowVisitor for PlainTextVisitor {
    fn visit_text_run(&mut self, node: &TextRun) -> Result<()> {
        self.out.push_str(node.text());
        Ok(())
    }

    fn visit_line_break(&mut self, _node: &LineBreak) -> Result<()> {
        self.out.push('\n');
        Ok(())
    }

    fn visit_paragraph_break(&mut self, _node: &ParagraphBreak) -> Result<()> {
        self.out.push('\n');
        Ok(())
    }

    fn visit_box(&mut self, node: &FlowBox) -> Result<()> {
        self.end_block();
        self.visit_content(&node.content)?;
        self.end_block();
        Ok(())
    }

    fn visit_table(&mut self, node: &FlowTable) -> Result<()> {
        self.end_block();
        for (_, cell) in node.content.cells() {
            self.visit_content(cell.content())?;
            self.end_block();
        }
        Ok(())
    }
}
