//! Flowdoc element names and dispatch tables.

use phf::phf_map;

/// Namespace of every flowdoc element.
pub const FLOWDOC_NAMESPACE: &str = "https://flowdoc.dev/schema/flowdoc/v1";

/// Key of the table cell element holding the default cell content.
pub const DEFAULT_CELL_KEY: &str = "default";

// Document structure
pub(crate) const FLOWDOC: &str = "flowdoc";
pub(crate) const BODY: &str = "body";

// Content
pub(crate) const P: &str = "p";
pub(crate) const T: &str = "t";
pub(crate) const C: &str = "c";
pub(crate) const BR: &str = "br";
pub(crate) const START_MARKUP: &str = "start-markup";
pub(crate) const END_MARKUP: &str = "end-markup";
pub(crate) const MARKUP: &str = "markup";
pub(crate) const ATTR: &str = "attr";
pub(crate) const DYNAMIC: &str = "dynamic";
pub(crate) const ICON: &str = "icon";
pub(crate) const IMAGE: &str = "image";
pub(crate) const VIDEO: &str = "video";
pub(crate) const BOX: &str = "box";
pub(crate) const TABLE: &str = "table";
pub(crate) const COL: &str = "col";
pub(crate) const CELL: &str = "cell";

// Trailer, in output order
pub(crate) const TEXT_STYLE: &str = "text-style";
pub(crate) const PARA_STYLE: &str = "para-style";
pub(crate) const BOX_STYLE: &str = "box-style";
pub(crate) const TABLE_STYLE: &str = "table-style";
pub(crate) const SCRIPT: &str = "script";
pub(crate) const IMAGE_SOURCE: &str = "image-source";

// Scripts and interactions
pub(crate) const CODE: &str = "code";
pub(crate) const MESSAGE: &str = "message";
pub(crate) const INTERACTION: &str = "interaction";
pub(crate) const OPEN_URL: &str = "open-url";
pub(crate) const RUN_SCRIPT: &str = "run-script";

// Messages
pub(crate) const COUNT: &str = "count";
pub(crate) const VALUE: &str = "value";
pub(crate) const PLURAL: &str = "plural";
pub(crate) const EXACT: &str = "exact";
pub(crate) const CHOOSE: &str = "choose";
pub(crate) const WHEN: &str = "when";
pub(crate) const OTHER: &str = "other";

// Id prefixes
pub(crate) const TEXT_PREFIX: &str = "text";
pub(crate) const PARA_PREFIX: &str = "para";
pub(crate) const BOX_PREFIX: &str = "box";
pub(crate) const TABLE_PREFIX: &str = "table";
pub(crate) const SCRIPT_PREFIX: &str = "script";
pub(crate) const IMAGE_PREFIX: &str = "image";

/// Elements that may appear in body, box and cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContentElement {
    Paragraph,
    Text,
    CodeText,
    LineBreak,
    StartMarkup,
    EndMarkup,
    Markup,
    Dynamic,
    Icon,
    Image,
    Video,
    Box,
    Table,
}

pub(crate) static CONTENT_ELEMENTS: phf::Map<&'static str, ContentElement> = phf_map! {
    "p" => ContentElement::Paragraph,
    "t" => ContentElement::Text,
    "c" => ContentElement::CodeText,
    "br" => ContentElement::LineBreak,
    "start-markup" => ContentElement::StartMarkup,
    "end-markup" => ContentElement::EndMarkup,
    "markup" => ContentElement::Markup,
    "dynamic" => ContentElement::Dynamic,
    "icon" => ContentElement::Icon,
    "image" => ContentElement::Image,
    "video" => ContentElement::Video,
    "box" => ContentElement::Box,
    "table" => ContentElement::Table,
};
