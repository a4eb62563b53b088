//! Flowdoc reader.

use super::config::FlowdocOptions;
use super::constants::*;
use super::message::read_message;
use super::styles::{read_box_style, read_paragraph_style, read_table_style, read_text_style};
use crate::common::bom::strip_utf8_bom;
use crate::common::coordinates::alpha_to_digit;
use crate::common::style::{BoxStyle, ParagraphStyle, TableStyle, TextStyle};
use crate::common::xml::XmlElement;
use crate::common::{Error, Result};
use crate::flow::{
    AttrValue, DEFAULT_SCALE, DynamicText, EmptyMarkup, EndMarkup, FlowBox, FlowContent, FlowIcon,
    FlowImage, FlowNode, FlowTable, FlowTableCell, FlowTableColumn, FlowTableContent, FlowVideo,
    ImageSource, LineBreak, MarkupAttrs, StartMarkup, TextRun,
};
use crate::script::Script;
use std::collections::{BTreeMap, HashMap};

/// Parse a flowdoc XML document.
///
/// The root must be `<flowdoc>` in the flowdoc namespace. References to
/// trailer entries that do not exist fail with `MissingReference`.
pub fn deserialize_flowdoc(xml: &str, options: &FlowdocOptions) -> Result<FlowContent> {
    let root = XmlElement::parse_document(xml)?;
    if !root.is(FLOWDOC_NAMESPACE, FLOWDOC) {
        return Err(Error::MalformedDocument(format!(
            "Expected root <{}> in namespace {}, found <{}>",
            FLOWDOC,
            FLOWDOC_NAMESPACE,
            root.name()
        )));
    }

    let trailer = Trailer::build(&root)?;
    let body = root
        .children()
        .iter()
        .find(|child| child.is(FLOWDOC_NAMESPACE, BODY))
        .ok_or_else(|| Error::MalformedDocument("Missing <body> element".to_string()))?;

    let reader = Reader {
        trailer: &trailer,
        options,
    };
    reader.read_content(body)
}

/// Parse a flowdoc document from bytes, skipping a UTF-8 BOM.
pub fn deserialize_flowdoc_bytes(bytes: &[u8], options: &FlowdocOptions) -> Result<FlowContent> {
    let xml = std::str::from_utf8(strip_utf8_bom(bytes))?;
    deserialize_flowdoc(xml, options)
}

/// Trailer definitions indexed by id.
#[derive(Debug, Default)]
struct Trailer {
    text_styles: HashMap<String, TextStyle>,
    para_styles: HashMap<String, ParagraphStyle>,
    box_styles: HashMap<String, BoxStyle>,
    table_styles: HashMap<String, TableStyle>,
    scripts: HashMap<String, Script>,
    images: HashMap<String, ImageSource>,
}

impl Trailer {
    /// Index every trailer element; scripts first, since styles refer to them.
    fn build(root: &XmlElement) -> Result<Self> {
        let mut trailer = Trailer::default();
        let elements = || {
            root.children()
                .iter()
                .filter(|child| child.namespace() == Some(FLOWDOC_NAMESPACE))
        };

        for el in elements().filter(|el| el.name() == SCRIPT) {
            let id = el.required_attr("id")?.to_string();
            trailer.scripts.insert(id, read_script(el));
        }

        for el in elements() {
            match el.name() {
                BODY | SCRIPT => {},
                TEXT_STYLE => {
                    let style = read_text_style(el, &trailer.scripts)?;
                    trailer.text_styles.insert(el.required_attr("id")?.to_string(), style);
                },
                PARA_STYLE => {
                    let style = read_paragraph_style(el);
                    trailer.para_styles.insert(el.required_attr("id")?.to_string(), style);
                },
                BOX_STYLE => {
                    let style = read_box_style(el, &trailer.scripts)?;
                    trailer.box_styles.insert(el.required_attr("id")?.to_string(), style);
                },
                TABLE_STYLE => {
                    let style = read_table_style(el, &trailer.scripts)?;
                    trailer.table_styles.insert(el.required_attr("id")?.to_string(), style);
                },
                IMAGE_SOURCE => {
                    let source = read_image_source(el)?;
                    trailer.images.insert(el.required_attr("id")?.to_string(), source);
                },
                other => tracing::warn!(element = other, "Skipping unknown trailer element"),
            }
        }
        Ok(trailer)
    }
}

fn lookup<T: Clone>(map: &HashMap<String, T>, kind: &'static str, id: &str) -> Result<T> {
    map.get(id).cloned().ok_or_else(|| Error::MissingReference {
        kind,
        id: id.to_string(),
    })
}

fn read_script(el: &XmlElement) -> Script {
    let mut script = Script::default();
    for child in el.children() {
        match child.name() {
            CODE => script.code = child.text().to_string(),
            MESSAGE => {
                let key = child.attr("key").unwrap_or_default().to_string();
                script.messages.insert(key, read_message(child));
            },
            other => tracing::warn!(element = other, "Skipping unknown script element"),
        }
    }
    script
}

fn read_image_source(el: &XmlElement) -> Result<ImageSource> {
    let dimension = |name: &'static str| -> Result<u32> {
        let value = el.required_attr(name)?;
        value.trim().parse().map_err(|_| {
            Error::MalformedDocument(format!("Invalid {} '{}' on <{}>", name, value, el.name()))
        })
    };
    Ok(ImageSource {
        url: el.required_attr("url")?.to_string(),
        width: dimension("width")?,
        height: dimension("height")?,
        placeholder: el.attr("placeholder").map(str::to_string),
        upload: el.attr("upload").map(str::to_string),
    })
}

struct Reader<'a> {
    trailer: &'a Trailer,
    options: &'a FlowdocOptions,
}

impl Reader<'_> {
    fn text_style(&self, el: &XmlElement) -> Result<TextStyle> {
        match el.attr("style") {
            Some(id) => lookup(&self.trailer.text_styles, "text style", id),
            None => Ok(TextStyle::default()),
        }
    }

    fn script(&self, id: &str) -> Result<Script> {
        lookup(&self.trailer.scripts, "script", id)
    }

    fn image(&self, id: &str) -> Result<ImageSource> {
        lookup(&self.trailer.images, "image source", id)
    }

    /// Read body, box or cell content.
    fn read_content(&self, parent: &XmlElement) -> Result<FlowContent> {
        let mut nodes = Vec::new();
        for child in self.content_children(parent) {
            match CONTENT_ELEMENTS.get(child.name()) {
                Some(ContentElement::Paragraph) => {
                    for inline in self.content_children(child) {
                        match CONTENT_ELEMENTS.get(inline.name()) {
                            Some(ContentElement::Paragraph) | None => {
                                tracing::warn!(element = inline.name(), "Skipping unexpected paragraph child");
                            },
                            Some(&kind) => nodes.push(self.read_node(kind, inline)?),
                        }
                    }
                    let style = match child.attr("style") {
                        Some(id) => lookup(&self.trailer.para_styles, "paragraph style", id)?,
                        None => ParagraphStyle::default(),
                    };
                    nodes.push(FlowNode::paragraph_break(style));
                },
                Some(&kind) => nodes.push(self.read_node(kind, child)?),
                None => tracing::warn!(element = child.name(), "Skipping unknown content element"),
            }
        }
        Ok(FlowContent::new(nodes))
    }

    fn content_children<'e>(&self, el: &'e XmlElement) -> impl Iterator<Item = &'e XmlElement> {
        el.children().iter().filter(|child| {
            let known = child.namespace() == Some(FLOWDOC_NAMESPACE);
            if !known {
                tracing::warn!(element = child.name(), "Skipping element outside the flowdoc namespace");
            }
            known
        })
    }

    fn read_node(&self, kind: ContentElement, el: &XmlElement) -> Result<FlowNode> {
        let node: FlowNode = match kind {
            ContentElement::Text => {
                TextRun::new(el.text(), self.text_style(el)?)?.into()
            },
            ContentElement::CodeText => {
                let mut style = self.text_style(el)?;
                style.translate = Some(false);
                TextRun::new(el.text(), style)?.into()
            },
            ContentElement::LineBreak => LineBreak {
                style: self.text_style(el)?,
            }
            .into(),
            ContentElement::StartMarkup => StartMarkup {
                tag: el.required_attr("tag")?.to_string(),
                style: self.text_style(el)?,
                attr: self.read_markup_attrs(el)?,
            }
            .into(),
            ContentElement::EndMarkup => EndMarkup {
                tag: el.required_attr("tag")?.to_string(),
                style: self.text_style(el)?,
            }
            .into(),
            ContentElement::Markup => EmptyMarkup {
                tag: el.required_attr("tag")?.to_string(),
                style: self.text_style(el)?,
                attr: self.read_markup_attrs(el)?,
            }
            .into(),
            ContentElement::Dynamic => DynamicText {
                expression: self.script(el.required_attr("expression")?)?,
                style: self.text_style(el)?,
            }
            .into(),
            ContentElement::Icon => FlowIcon {
                data: el.attr("data").unwrap_or_default().to_string(),
                style: self.text_style(el)?,
            }
            .into(),
            ContentElement::Image => FlowImage {
                source: self.image(el.required_attr("source")?)?,
                scale: el.u32_attr("scale").unwrap_or(DEFAULT_SCALE),
                style: self.text_style(el)?,
            }
            .into(),
            ContentElement::Video => FlowVideo {
                source: self.image(el.required_attr("source")?)?,
                poster: el.attr("poster").map(|id| self.image(id)).transpose()?,
                scale: el.u32_attr("scale").unwrap_or(DEFAULT_SCALE),
                style: self.text_style(el)?,
            }
            .into(),
            ContentElement::Box => FlowBox {
                content: self.read_content(el)?,
                style: match el.attr("style") {
                    Some(id) => lookup(&self.trailer.box_styles, "box style", id)?,
                    None => BoxStyle::default(),
                },
            }
            .into(),
            ContentElement::Table => self.read_table(el)?.into(),
            ContentElement::Paragraph => {
                return Err(Error::MalformedDocument("Nested <p> element".to_string()));
            },
        };
        Ok(node)
    }

    fn read_markup_attrs(&self, el: &XmlElement) -> Result<MarkupAttrs> {
        let mut attrs = MarkupAttrs::new();
        for child in self.content_children(el) {
            if child.name() != ATTR {
                tracing::warn!(element = child.name(), "Skipping unknown markup child");
                continue;
            }
            let key = child.required_attr("key")?.to_string();
            let value = match child.attr("script") {
                Some(id) => AttrValue::Script(self.script(id)?),
                None => AttrValue::Text(child.attr("value").unwrap_or_default().to_string()),
            };
            attrs.insert(key, value);
        }
        Ok(attrs)
    }

    fn read_table(&self, el: &XmlElement) -> Result<FlowTable> {
        let style = match el.attr("style") {
            Some(id) => lookup(&self.trailer.table_styles, "table style", id)?,
            None => TableStyle::default(),
        };

        let mut columns = BTreeMap::new();
        let mut cells = Vec::new();
        let mut default_content = FlowContent::empty();

        for child in self.content_children(el) {
            match child.name() {
                COL => {
                    let key = child.attr("key").unwrap_or_default();
                    match alpha_to_digit(key) {
                        Ok(index) => {
                            columns.insert(
                                index,
                                FlowTableColumn {
                                    width: child.u32_attr("width"),
                                },
                            );
                        },
                        Err(e) => tracing::warn!(key, error = %e, "Skipping invalid column key"),
                    }
                },
                CELL => {
                    let key = child.required_attr("key")?;
                    let content = self.read_content(child)?;
                    if key == DEFAULT_CELL_KEY {
                        default_content = content;
                    } else {
                        let cell = FlowTableCell::with_span(
                            content,
                            child.u32_attr("colspan").unwrap_or(1),
                            child.u32_attr("rowspan").unwrap_or(1),
                        );
                        cells.push((key.to_string(), cell));
                    }
                },
                other => tracing::warn!(element = other, "Skipping unknown table child"),
            }
        }

        let grid = FlowTableContent::from_keys(cells, &self.options.table)?
            .with_default_content(default_content);
        let content = match grid.with_dimensions(
            el.u32_attr("columns").unwrap_or(0),
            el.u32_attr("rows").unwrap_or(0),
        ) {
            Ok(content) => content,
            Err(e) if !self.options.table.strict => {
                tracing::warn!(error = %e, "Ignoring declared table dimensions");
                grid
            },
            Err(e) => return Err(e),
        };
        Ok(FlowTable {
            columns,
            style,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::coordinates::CellPosition;
    use crate::common::style::{
        BoxVariant, FlowColor, Interaction, ListMarker, ParagraphVariant,
    };
    use crate::flow::TableOptions;
    use crate::flowdoc::serialize_flowdoc;
    use proptest::prelude::*;

    fn options() -> FlowdocOptions {
        FlowdocOptions::default()
    }

    fn text(value: &str, style: TextStyle) -> FlowNode {
        FlowNode::text(value, style).unwrap()
    }

    fn para(style: ParagraphStyle) -> FlowNode {
        FlowNode::paragraph_break(style)
    }

    fn round_trip(content: &FlowContent) -> FlowContent {
        let xml = serialize_flowdoc(content, &options()).unwrap();
        deserialize_flowdoc(&xml, &options()).unwrap()
    }

    fn rich_document() -> FlowContent {
        let script = Script::new("return user.name")
            .with_message("greeting", "Hello {name}!")
            .with_message("items", "{n, plural, one {1 item} other {# items}}");
        let linked = TextStyle {
            underline: Some(true),
            link: Some(Interaction::run_script(script.clone())),
            ..TextStyle::default()
        };
        let heading = ParagraphStyle {
            variant: Some(ParagraphVariant::H1),
            ..ParagraphStyle::default()
        };
        let item = ParagraphStyle {
            list_level: Some(1),
            list_marker: Some(ListMarker::Disc),
            ..ParagraphStyle::default()
        };

        let mut attrs = MarkupAttrs::new();
        attrs.insert("href".to_string(), AttrValue::from("https://example.com"));
        attrs.insert("who".to_string(), AttrValue::Script(Script::new("who()")));

        let image = ImageSource::new("https://example.com/a.png", 640, 480);
        let cells = FlowTableContent::from_keys(
            vec![
                ("A1", FlowTableCell::with_span(FlowContent::from_text("wide\n"), 2, 1)),
                ("B2", FlowTableCell::new(FlowContent::from_text("tail"))),
            ],
            &Default::default(),
        )
        .unwrap()
        .with_default_content(FlowContent::from_text("-"))
        .insert_row(2, 1);
        let mut table = FlowTable::new(cells);
        table.columns.insert(1, FlowTableColumn { width: Some(3) });
        table.style.interaction = Some(Interaction::open_url("https://example.com/t"));

        FlowContent::new(vec![
            text("Title", TextStyle::bold()),
            para(heading),
            text("Click ", TextStyle::default()),
            text("me", linked),
            FlowNode::line_break(TextStyle::default()),
            FlowNode::start_markup("link", attrs),
            text("marked", TextStyle::default()),
            FlowNode::end_markup("link"),
            FlowNode::empty_markup("toc", MarkupAttrs::new()),
            text(
                "no translate",
                TextStyle {
                    translate: Some(false),
                    ..TextStyle::default()
                },
            ),
            text(
                "bold code",
                TextStyle {
                    bold: Some(true),
                    translate: Some(false),
                    ..TextStyle::default()
                },
            ),
            para(item.clone()),
            FlowNode::DynamicText(DynamicText {
                expression: script,
                style: TextStyle::default(),
            }),
            FlowIcon {
                data: "M0 0L10 10".to_string(),
                style: TextStyle::default(),
            }
            .into(),
            FlowImage {
                source: image.clone(),
                scale: 50,
                style: TextStyle::default(),
            }
            .into(),
            FlowVideo {
                source: ImageSource::new("https://example.com/v.mp4", 1920, 1080),
                poster: Some(image),
                scale: DEFAULT_SCALE,
                style: TextStyle::default(),
            }
            .into(),
            para(item),
            FlowBox {
                content: FlowContent::from_text("boxed\ntrailing"),
                style: BoxStyle {
                    variant: Some(BoxVariant::Alert),
                    color: Some(FlowColor::Warning),
                    ..BoxStyle::default()
                },
            }
            .into(),
            table.into(),
            text("after  the  table", TextStyle::default()),
        ])
    }

    #[test]
    fn test_round_trip_rich_document() {
        let content = rich_document();
        assert_eq!(round_trip(&content), content);
    }

    #[test]
    fn test_round_trip_indented() {
        let content = rich_document();
        let options = FlowdocOptions::new()
            .with_indent(Some(2))
            .with_xml_declaration(true);
        let xml = serialize_flowdoc(&content, &options).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert_eq!(deserialize_flowdoc(&xml, &options).unwrap(), content);
    }

    #[test]
    fn test_shared_style_interned_once() {
        let content = FlowContent::new(vec![
            text("one", TextStyle::bold()),
            para(ParagraphStyle::default()),
            text("two", TextStyle::bold()),
            para(ParagraphStyle::default()),
        ]);
        let xml = serialize_flowdoc(&content, &options()).unwrap();
        assert_eq!(xml.matches("<text-style ").count(), 1);
        assert_eq!(xml.matches(r#"<t style="text-1">"#).count(), 2);
        assert!(xml.contains(r#"<text-style id="text-1" bold="true"/>"#));
    }

    #[test]
    fn test_trailer_order() {
        let xml = serialize_flowdoc(&rich_document(), &options()).unwrap();
        let positions: Vec<usize> = [
            "<text-style ",
            "<para-style ",
            "<box-style ",
            "<table-style ",
            "<script ",
            "<image-source ",
        ]
        .iter()
        .map(|tag| xml.find(tag).unwrap())
        .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(xml.find("</body>").unwrap() < positions[0]);
    }

    #[test]
    fn test_table_dimensions_survive() {
        let content = rich_document();
        let read = round_trip(&content);
        let FlowNode::Table(table) = &read.nodes()[read.node_count() - 2] else {
            panic!("expected table");
        };
        assert_eq!(table.content.row_count(), 3);
        assert_eq!(table.content.column_count(), 2);
        assert!(table.content.is_shadowed(CellPosition::new(0, 1)));
    }

    fn read_table_xml(table: &str, options: &FlowdocOptions) -> Result<FlowTable> {
        let xml = format!(
            r#"<flowdoc xmlns="{}"><body>{}</body></flowdoc>"#,
            FLOWDOC_NAMESPACE, table
        );
        let content = deserialize_flowdoc(&xml, options)?;
        match &content.nodes()[0] {
            FlowNode::Table(table) => Ok(table.clone()),
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_table_spans_and_dimensions() {
        let table = read_table_xml(
            r#"<table><cell key="B1" colspan="4294967295" rowspan="4294967295"/></table>"#,
            &options(),
        )
        .unwrap();
        let b1 = table.content.get_cell(CellPosition::new(0, 1)).unwrap();
        assert_eq!((b1.col_span(), b1.row_span()), (1, 1));
        assert_eq!(table.content.positions().len(), 2);

        let table = read_table_xml(
            r#"<table columns="4294967295" rows="4294967295"><cell key="A1"/></table>"#,
            &options(),
        )
        .unwrap();
        assert_eq!((table.content.column_count(), table.content.row_count()), (1, 1));

        let strict = FlowdocOptions::new().with_table_options(TableOptions::new().with_strict(true));
        for xml in [
            r#"<table><cell key="A1" colspan="4294967295"/></table>"#,
            r#"<table columns="100000" rows="100000"/>"#,
        ] {
            assert!(matches!(
                read_table_xml(xml, &strict),
                Err(Error::TableTooLarge { .. })
            ));
        }
    }

    #[test]
    fn test_wrong_root_rejected() {
        let result = deserialize_flowdoc("<flowdoc><body/></flowdoc>", &options());
        assert!(matches!(result, Err(Error::MalformedDocument(_))));

        let xml = format!(r#"<document xmlns="{}"><body/></document>"#, FLOWDOC_NAMESPACE);
        assert!(matches!(
            deserialize_flowdoc(&xml, &options()),
            Err(Error::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_missing_reference_is_fatal() {
        let xml = format!(
            r#"<flowdoc xmlns="{}"><body><p><t style="text-7">x</t></p></body></flowdoc>"#,
            FLOWDOC_NAMESPACE
        );
        assert!(matches!(
            deserialize_flowdoc(&xml, &options()),
            Err(Error::MissingReference { ref id, .. }) if id == "text-7"
        ));
    }

    #[test]
    fn test_required_attributes() {
        let xml = format!(
            r#"<flowdoc xmlns="{}"><body/><image-source id="image-1" url="x" width="1"/></flowdoc>"#,
            FLOWDOC_NAMESPACE
        );
        assert!(matches!(
            deserialize_flowdoc(&xml, &options()),
            Err(Error::MissingAttribute { attribute: "height", .. })
        ));
    }

    #[test]
    fn test_code_text_without_style() {
        let xml = format!(
            r#"<flowdoc xmlns="{}"><body><c>x &lt; y</c><unknown/></body></flowdoc>"#,
            FLOWDOC_NAMESPACE
        );
        let content = deserialize_flowdoc(&xml, &options()).unwrap();
        let run = content.nodes()[0].as_text_run().unwrap();
        assert_eq!(run.text(), "x < y");
        assert_eq!(run.style.translate, Some(false));
        assert_eq!(content.node_count(), 1);
    }

    #[test]
    fn test_custom_interaction_fails_serialization() {
        let content = FlowContent::new(vec![text(
            "x",
            TextStyle {
                link: Some(Interaction::Custom("share".to_string())),
                ..TextStyle::default()
            },
        )]);
        assert_eq!(
            serialize_flowdoc(&content, &options()),
            Err(Error::UnsupportedInteraction("share".to_string()))
        );
    }

    #[test]
    fn test_bytes_with_bom() {
        let xml = format!(
            "\u{FEFF}<flowdoc xmlns=\"{}\"><body><p><t>hi</t></p></body></flowdoc>",
            FLOWDOC_NAMESPACE
        );
        let content = deserialize_flowdoc_bytes(xml.as_bytes(), &options()).unwrap();
        assert_eq!(content.plain_text(), "hi\n");
        assert!(deserialize_flowdoc_bytes(b"\xFF\xFE", &options()).is_err());
    }

    #[test]
    fn test_attribute_whitespace_escaped() {
        let mut attrs = MarkupAttrs::new();
        attrs.insert("text".to_string(), AttrValue::from("a\tb\nc"));
        let content = FlowContent::new(vec![FlowNode::empty_markup("x", attrs)]);
        let xml = serialize_flowdoc(&content, &options()).unwrap();
        assert!(xml.contains(r#"value="a&#9;b&#10;c""#));
        assert_eq!(round_trip(&content), content);
    }

    fn arb_script() -> impl Strategy<Value = Script> {
        let message = prop::sample::select(vec![
            "Hello {name}!",
            "{n, plural, one {1 item} other {# items}}",
            "{n,plural,one{1 item}other{# items}}",
            "{g, select, female {She} other {They}} replied",
            "{n, selectordinal, =1 {first} other {#th}}",
            "{n, number, integer}",
            "{n, plural, one {missing other}}",
            "",
        ]);
        (
            "[a-z ().;]{0,12}",
            prop::collection::btree_map("[a-z]{1,4}", message, 0..3),
        )
            .prop_map(|(code, messages)| Script {
                code,
                messages: messages
                    .into_iter()
                    .map(|(key, message)| (key, message.to_string()))
                    .collect(),
            })
    }

    fn arb_text_style() -> impl Strategy<Value = TextStyle> {
        prop_oneof![
            Just(TextStyle::default()),
            Just(TextStyle::bold()),
            Just(TextStyle {
                translate: Some(false),
                ..TextStyle::default()
            }),
            Just(TextStyle {
                italic: Some(true),
                translate: Some(false),
                ..TextStyle::default()
            }),
            arb_script().prop_map(|script| TextStyle {
                link: Some(Interaction::run_script(script)),
                ..TextStyle::default()
            }),
        ]
    }

    fn arb_paragraph_style() -> impl Strategy<Value = ParagraphStyle> {
        prop_oneof![
            Just(ParagraphStyle::default()),
            Just(ParagraphStyle {
                variant: Some(ParagraphVariant::H1),
                ..ParagraphStyle::default()
            }),
            (1u32..4).prop_map(|level| ParagraphStyle {
                list_level: Some(level),
                list_marker: Some(ListMarker::Disc),
                ..ParagraphStyle::default()
            }),
        ]
    }

    fn arb_attrs() -> impl Strategy<Value = MarkupAttrs> {
        let value = prop_oneof![
            "[a-z <>&\"'\t]{0,6}".prop_map(AttrValue::Text),
            arb_script().prop_map(AttrValue::Script),
        ];
        prop::collection::btree_map("[a-z]{1,4}", value, 0..3)
    }

    fn arb_leaf() -> impl Strategy<Value = FlowNode> {
        prop_oneof![
            4 => ("[a-zA-Z <>&'\"😀]{1,8}", arb_text_style())
                .prop_map(|(value, style)| text(&value, style)),
            2 => arb_paragraph_style().prop_map(FlowNode::paragraph_break),
            1 => Just(FlowNode::line_break(TextStyle::default())),
            1 => ("[a-z]{1,5}", arb_attrs()).prop_map(|(tag, attrs)| FlowNode::start_markup(tag, attrs)),
            1 => "[a-z]{1,5}".prop_map(FlowNode::end_markup),
            1 => ("[a-z]{1,5}", arb_attrs()).prop_map(|(tag, attrs)| FlowNode::empty_markup(tag, attrs)),
            1 => arb_script().prop_map(|expression| FlowNode::DynamicText(DynamicText {
                expression,
                style: TextStyle::default(),
            })),
            1 => "[A-Z0-9 ]{1,8}".prop_map(|data| FlowIcon {
                data,
                style: TextStyle::default(),
            }
            .into()),
        ]
    }

    fn arb_box() -> impl Strategy<Value = FlowNode> {
        (prop::collection::vec(arb_leaf(), 0..5), any::<bool>()).prop_map(|(nodes, alert)| {
            let style = if alert {
                BoxStyle {
                    variant: Some(BoxVariant::Alert),
                    ..BoxStyle::default()
                }
            } else {
                BoxStyle::default()
            };
            FlowBox {
                content: FlowContent::new(nodes),
                style,
            }
            .into()
        })
    }

    fn arb_table() -> impl Strategy<Value = FlowNode> {
        let cell = (
            0u32..3,
            0u32..3,
            1u32..3,
            1u32..3,
            prop::collection::vec(arb_leaf(), 0..4),
        );
        (
            prop::collection::vec(cell, 0..5),
            prop::collection::vec(arb_leaf(), 0..3),
            0u32..4,
            0u32..4,
        )
            .prop_map(|(cells, default_content, columns, rows)| {
                let cells = cells.into_iter().map(|(row, column, col_span, row_span, nodes)| {
                    (
                        CellPosition::new(row, column),
                        FlowTableCell::with_span(FlowContent::new(nodes), col_span, row_span),
                    )
                });
                let grid = FlowTableContent::new(cells)
                    .with_default_content(FlowContent::new(default_content))
                    .with_dimensions(columns, rows)
                    .unwrap();
                FlowTable::new(grid).into()
            })
    }

    fn arb_content() -> impl Strategy<Value = FlowContent> {
        let node = prop_oneof![
            8 => arb_leaf(),
            1 => arb_box(),
            1 => arb_table(),
        ];
        prop::collection::vec(node, 0..16).prop_map(FlowContent::new)
    }

    proptest! {
        #[test]
        fn prop_serialized_content_reads_back(content in arb_content()) {
            let xml = serialize_flowdoc(&content, &options()).unwrap();
            prop_assert_eq!(deserialize_flowdoc(&xml, &options()).unwrap(), content);
        }
    }
}
