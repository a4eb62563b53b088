//! Flowdoc writer.

use super::config::FlowdocOptions;
use super::constants::*;
use super::interner::Interner;
use super::message::write_message;
use super::styles::{
    box_style_attrs, paragraph_style_attrs, table_style_attrs, text_style_attrs,
    write_style_element,
};
use crate::common::coordinates::digit_to_alpha;
use crate::common::style::{BoxStyle, ParagraphStyle, TableStyle, TextStyle};
use crate::common::xml::{Attrs, XmlWriter};
use crate::common::Result;
use crate::flow::{
    AttrValue, DEFAULT_SCALE, DynamicText, EmptyMarkup, EndMarkup, FlowBox, FlowContent, FlowIcon,
    FlowImage, FlowTable, FlowVideo, FlowVisitor, ImageSource, LineBreak, MarkupAttrs,
    ParagraphBreak, StartMarkup, TextRun,
};
use crate::script::Script;

/// Serialize content as a flowdoc XML document.
///
/// Styles, scripts and image sources are written once each to the trailer
/// after `<body>` and referenced by id. Fails with `UnsupportedInteraction`
/// when a style or link carries a custom interaction.
///
/// # Examples
///
/// ```
/// use flowdoc::flow::FlowContent;
/// use flowdoc::flowdoc::{FlowdocOptions, deserialize_flowdoc, serialize_flowdoc};
///
/// let content = FlowContent::from_text("Hello\n");
/// let xml = serialize_flowdoc(&content, &FlowdocOptions::default()).unwrap();
/// assert!(xml.contains("<p><t>Hello</t></p>"));
/// assert_eq!(deserialize_flowdoc(&xml, &FlowdocOptions::default()).unwrap(), content);
/// ```
pub fn serialize_flowdoc(content: &FlowContent, options: &FlowdocOptions) -> Result<String> {
    let mut serializer = Serializer::new(options);
    serializer.write_document(content)?;
    Ok(serializer.w.finish())
}

struct Serializer {
    w: XmlWriter,
    xml_declaration: bool,
    text_styles: Interner<TextStyle>,
    para_styles: Interner<ParagraphStyle>,
    box_styles: Interner<BoxStyle>,
    table_styles: Interner<TableStyle>,
    scripts: Interner<Script>,
    images: Interner<ImageSource>,
}

impl Serializer {
    fn new(options: &FlowdocOptions) -> Self {
        Self {
            w: XmlWriter::new(options.indent),
            xml_declaration: options.xml_declaration,
            text_styles: Interner::new(TEXT_PREFIX),
            para_styles: Interner::new(PARA_PREFIX),
            box_styles: Interner::new(BOX_PREFIX),
            table_styles: Interner::new(TABLE_PREFIX),
            scripts: Interner::new(SCRIPT_PREFIX),
            images: Interner::new(IMAGE_PREFIX),
        }
    }

    fn write_document(&mut self, content: &FlowContent) -> Result<()> {
        if self.xml_declaration {
            self.w.declaration();
        }
        let mut root = Attrs::new();
        root.push("xmlns", FLOWDOC_NAMESPACE);
        self.w.open(FLOWDOC, &root);

        self.w.open(BODY, &Attrs::new());
        self.write_content(content)?;
        self.w.close(BODY);

        self.write_trailer()?;
        self.w.close(FLOWDOC);
        Ok(())
    }

    /// Paragraphs become `<p>`; trailing inline nodes are written bare.
    fn write_content(&mut self, content: &FlowContent) -> Result<()> {
        for paragraph in content.paragraphs() {
            let Some(end) = paragraph.end else {
                for node in paragraph.inline {
                    node.accept(self)?;
                }
                continue;
            };

            let mut attrs = Attrs::new();
            if !end.style.is_empty() {
                attrs.push("style", self.para_styles.intern(&end.style));
            }
            if paragraph.inline.is_empty() {
                self.w.empty(P, &attrs);
                continue;
            }
            self.w.open(P, &attrs);
            for node in paragraph.inline {
                node.accept(self)?;
            }
            self.w.close(P);
        }
        Ok(())
    }

    fn style_attrs(&mut self, style: &TextStyle) -> Attrs {
        let mut attrs = Attrs::new();
        self.push_text_style(&mut attrs, style);
        attrs
    }

    fn push_text_style(&mut self, attrs: &mut Attrs, style: &TextStyle) {
        if !style.is_empty() {
            attrs.push("style", self.text_styles.intern(style));
        }
    }

    fn write_markup(&mut self, tag_name: &str, tag: &str, style: &TextStyle, attr: &MarkupAttrs) {
        let mut attrs = Attrs::new();
        attrs.push("tag", tag);
        self.push_text_style(&mut attrs, style);
        if attr.is_empty() {
            self.w.empty(tag_name, &attrs);
            return;
        }
        self.w.open(tag_name, &attrs);
        for (key, value) in attr {
            let mut attrs = Attrs::new();
            attrs.push("key", key.as_str());
            match value {
                AttrValue::Text(text) => attrs.push("value", text.as_str()),
                AttrValue::Script(script) => attrs.push("script", self.scripts.intern(script)),
            };
            self.w.empty(ATTR, &attrs);
        }
        self.w.close(tag_name);
    }

    fn write_trailer(&mut self) -> Result<()> {
        for (id, style) in self.text_styles.drain() {
            let mut attrs = Attrs::new();
            attrs.push("id", id);
            text_style_attrs(&style, &mut attrs);
            write_style_element(
                &mut self.w,
                TEXT_STYLE,
                &attrs,
                style.link.as_ref(),
                &mut self.scripts,
            )?;
        }

        for (id, style) in self.para_styles.drain() {
            let mut attrs = Attrs::new();
            attrs.push("id", id);
            paragraph_style_attrs(&style, &mut attrs);
            self.w.empty(PARA_STYLE, &attrs);
        }

        for (id, style) in self.box_styles.drain() {
            let mut attrs = Attrs::new();
            attrs.push("id", id);
            box_style_attrs(&style, &mut attrs);
            write_style_element(
                &mut self.w,
                BOX_STYLE,
                &attrs,
                style.interaction.as_ref(),
                &mut self.scripts,
            )?;
        }

        for (id, style) in self.table_styles.drain() {
            let mut attrs = Attrs::new();
            attrs.push("id", id);
            table_style_attrs(&style, &mut attrs);
            write_style_element(
                &mut self.w,
                TABLE_STYLE,
                &attrs,
                style.interaction.as_ref(),
                &mut self.scripts,
            )?;
        }

        for (id, script) in self.scripts.drain() {
            let mut attrs = Attrs::new();
            attrs.push("id", id);
            self.w.open(SCRIPT, &attrs);
            self.w.text_element(CODE, &Attrs::new(), &script.code);
            for (key, source) in &script.messages {
                write_message(&mut self.w, key, source);
            }
            self.w.close(SCRIPT);
        }

        for (id, source) in self.images.drain() {
            let mut attrs = Attrs::new();
            attrs
                .push("id", id)
                .push("url", source.url.as_str())
                .push("width", source.width.to_string())
                .push("height", source.height.to_string())
                .push_opt("placeholder", source.placeholder.as_deref())
                .push_opt("upload", source.upload.as_deref());
            self.w.empty(IMAGE_SOURCE, &attrs);
        }
        Ok(())
    }
}

impl FlowVisitor for Serializer {
    fn visit_text_run(&mut self, node: &TextRun) -> Result<()> {
        let mut attrs = Attrs::new();
        // <c> alone already means "do not translate"
        let tag = if node.style.translate == Some(false) {
            let implied = TextStyle {
                translate: Some(false),
                ..TextStyle::default()
            };
            if node.style != implied {
                self.push_text_style(&mut attrs, &node.style);
            }
            C
        } else {
            self.push_text_style(&mut attrs, &node.style);
            T
        };
        self.w.text_element(tag, &attrs, node.text());
        Ok(())
    }

    fn visit_line_break(&mut self, node: &LineBreak) -> Result<()> {
        let attrs = self.style_attrs(&node.style);
        self.w.empty(BR, &attrs);
        Ok(())
    }

    fn visit_paragraph_break(&mut self, _node: &ParagraphBreak) -> Result<()> {
        // Paragraph breaks are written as <p> by write_content
        Ok(())
    }

    fn visit_start_markup(&mut self, node: &StartMarkup) -> Result<()> {
        self.write_markup(START_MARKUP, &node.tag, &node.style, &node.attr);
        Ok(())
    }

    fn visit_end_markup(&mut self, node: &EndMarkup) -> Result<()> {
        let mut attrs = Attrs::new();
        attrs.push("tag", node.tag.as_str());
        self.push_text_style(&mut attrs, &node.style);
        self.w.empty(END_MARKUP, &attrs);
        Ok(())
    }

    fn visit_empty_markup(&mut self, node: &EmptyMarkup) -> Result<()> {
        self.write_markup(MARKUP, &node.tag, &node.style, &node.attr);
        Ok(())
    }

    fn visit_dynamic_text(&mut self, node: &DynamicText) -> Result<()> {
        let mut attrs = Attrs::new();
        attrs.push("expression", self.scripts.intern(&node.expression));
        self.push_text_style(&mut attrs, &node.style);
        self.w.empty(DYNAMIC, &attrs);
        Ok(())
    }

    fn visit_icon(&mut self, node: &FlowIcon) -> Result<()> {
        let mut attrs = Attrs::new();
        attrs.push("data", node.data.as_str());
        self.push_text_style(&mut attrs, &node.style);
        self.w.empty(ICON, &attrs);
        Ok(())
    }

    fn visit_image(&mut self, node: &FlowImage) -> Result<()> {
        let mut attrs = Attrs::new();
        attrs
            .push("source", self.images.intern(&node.source))
            .push_opt("scale", (node.scale != DEFAULT_SCALE).then_some(node.scale));
        self.push_text_style(&mut attrs, &node.style);
        self.w.empty(IMAGE, &attrs);
        Ok(())
    }

    fn visit_video(&mut self, node: &FlowVideo) -> Result<()> {
        let mut attrs = Attrs::new();
        attrs.push("source", self.images.intern(&node.source));
        if let Some(poster) = &node.poster {
            attrs.push("poster", self.images.intern(poster));
        }
        attrs.push_opt("scale", (node.scale != DEFAULT_SCALE).then_some(node.scale));
        self.push_text_style(&mut attrs, &node.style);
        self.w.empty(VIDEO, &attrs);
        Ok(())
    }

    fn visit_box(&mut self, node: &FlowBox) -> Result<()> {
        let mut attrs = Attrs::new();
        if !node.style.is_empty() {
            attrs.push("style", self.box_styles.intern(&node.style));
        }
        if node.content.is_empty() {
            self.w.empty(BOX, &attrs);
            return Ok(());
        }
        self.w.open(BOX, &attrs);
        self.write_content(&node.content)?;
        self.w.close(BOX);
        Ok(())
    }

    fn visit_table(&mut self, node: &FlowTable) -> Result<()> {
        let grid = &node.content;
        let mut attrs = Attrs::new();
        if !node.style.is_empty() {
            attrs.push("style", self.table_styles.intern(&node.style));
        }
        attrs
            .push("columns", grid.column_count().to_string())
            .push("rows", grid.row_count().to_string());
        self.w.open(TABLE, &attrs);

        for (&index, column) in &node.columns {
            let mut attrs = Attrs::new();
            attrs
                .push("key", digit_to_alpha(index))
                .push_opt("width", column.width);
            self.w.empty(COL, &attrs);
        }

        if !grid.default_content().is_empty() {
            let mut attrs = Attrs::new();
            attrs.push("key", DEFAULT_CELL_KEY);
            self.w.open(CELL, &attrs);
            self.write_content(grid.default_content())?;
            self.w.close(CELL);
        }

        for (position, cell) in grid.cells() {
            let mut attrs = Attrs::new();
            attrs
                .push("key", position.to_a1())
                .push_opt("colspan", (cell.col_span() > 1).then_some(cell.col_span()))
                .push_opt("rowspan", (cell.row_span() > 1).then_some(cell.row_span()));
            if cell.content().is_empty() {
                self.w.empty(CELL, &attrs);
                continue;
            }
            self.w.open(CELL, &attrs);
            self.write_content(cell.content())?;
            self.w.close(CELL);
        }

        self.w.close(TABLE);
        Ok(())
    }
}
