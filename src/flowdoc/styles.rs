//! Style and interaction attribute mapping.
//!
//! Each style is written as one trailer element whose attributes carry the
//! set properties. Click handlers become a nested `<interaction>` element.

use super::constants::{INTERACTION, OPEN_URL, RUN_SCRIPT};
use super::interner::Interner;
use crate::common::style::{
    BaselineOffset, BoxStyle, BoxVariant, FlowColor, FontFamily, Interaction, ListMarker,
    ParagraphStyle, ParagraphVariant, TableStyle, TextAlignment, TextDirection, TextStyle,
};
use crate::common::xml::{Attrs, XmlElement, XmlWriter};
use crate::common::{Error, Result};
use crate::script::Script;
use std::collections::HashMap;

pub(crate) fn text_style_attrs(style: &TextStyle, attrs: &mut Attrs) {
    attrs
        .push_bool("bold", style.bold)
        .push_bool("italic", style.italic)
        .push_bool("underline", style.underline)
        .push_bool("strike", style.strike)
        .push_opt("baseline", style.baseline.map(|v| v.as_str()))
        .push_opt("font-family", style.font_family.map(|v| v.as_str()))
        .push_opt("font-size", style.font_size)
        .push_opt("color", style.color.map(|v| v.as_str()))
        .push_opt("lang", style.lang.as_deref())
        .push_bool("spellcheck", style.spellcheck)
        .push_bool("translate", style.translate);
}

pub(crate) fn paragraph_style_attrs(style: &ParagraphStyle, attrs: &mut Attrs) {
    attrs
        .push_opt("alignment", style.alignment.map(|v| v.as_str()))
        .push_opt("direction", style.direction.map(|v| v.as_str()))
        .push_opt("variant", style.variant.map(|v| v.as_str()))
        .push_opt("line-spacing", style.line_spacing)
        .push_opt("space-before", style.space_before)
        .push_opt("space-after", style.space_after)
        .push_opt("list-level", style.list_level)
        .push_opt("list-marker", style.list_marker.map(|v| v.as_str()))
        .push_bool("hide-list-marker", style.hide_list_marker)
        .push_opt("list-counter", style.list_counter);
}

pub(crate) fn box_style_attrs(style: &BoxStyle, attrs: &mut Attrs) {
    attrs
        .push_opt("variant", style.variant.map(|v| v.as_str()))
        .push_opt("color", style.color.map(|v| v.as_str()))
        .push_bool("inline", style.inline);
}

pub(crate) fn table_style_attrs(style: &TableStyle, attrs: &mut Attrs) {
    attrs
        .push_bool("inline", style.inline)
        .push_opt("head", style.head);
}

/// Write a trailer element for a style with an optional click handler.
pub(crate) fn write_style_element(
    w: &mut XmlWriter,
    tag: &str,
    attrs: &Attrs,
    interaction: Option<&Interaction>,
    scripts: &mut Interner<Script>,
) -> Result<()> {
    match interaction {
        Some(interaction) => {
            w.open(tag, attrs);
            write_interaction(w, interaction, scripts)?;
            w.close(tag);
        },
        None => w.empty(tag, attrs),
    }
    Ok(())
}

/// Write `<interaction>`; custom interactions cannot be represented.
pub(crate) fn write_interaction(
    w: &mut XmlWriter,
    interaction: &Interaction,
    scripts: &mut Interner<Script>,
) -> Result<()> {
    let mut attrs = Attrs::new();
    let tag = match interaction {
        Interaction::OpenUrl { href } => {
            attrs.push("href", href.as_str());
            OPEN_URL
        },
        Interaction::RunScript { script } => {
            attrs.push("ref", scripts.intern(script));
            RUN_SCRIPT
        },
        Interaction::Custom(name) => {
            return Err(Error::UnsupportedInteraction(name.clone()));
        },
    };
    w.open(INTERACTION, &Attrs::new());
    w.empty(tag, &attrs);
    w.close(INTERACTION);
    Ok(())
}

/// Read a keyword attribute; unknown keywords read as unset.
fn keyword<T>(el: &XmlElement, name: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
    el.attr(name).and_then(parse)
}

pub(crate) fn read_text_style(
    el: &XmlElement,
    scripts: &HashMap<String, Script>,
) -> Result<TextStyle> {
    Ok(TextStyle {
        bold: el.bool_attr("bold"),
        italic: el.bool_attr("italic"),
        underline: el.bool_attr("underline"),
        strike: el.bool_attr("strike"),
        baseline: keyword(el, "baseline", BaselineOffset::parse),
        font_family: keyword(el, "font-family", FontFamily::parse),
        font_size: el.u32_attr("font-size"),
        color: keyword(el, "color", FlowColor::parse),
        lang: el.attr("lang").map(str::to_string),
        spellcheck: el.bool_attr("spellcheck"),
        translate: el.bool_attr("translate"),
        link: read_interaction(el, scripts)?,
    })
}

pub(crate) fn read_paragraph_style(el: &XmlElement) -> ParagraphStyle {
    ParagraphStyle {
        alignment: keyword(el, "alignment", TextAlignment::parse),
        direction: keyword(el, "direction", TextDirection::parse),
        variant: keyword(el, "variant", ParagraphVariant::parse),
        line_spacing: el.u32_attr("line-spacing"),
        space_before: el.u32_attr("space-before"),
        space_after: el.u32_attr("space-after"),
        list_level: el.u32_attr("list-level"),
        list_marker: keyword(el, "list-marker", ListMarker::parse),
        hide_list_marker: el.bool_attr("hide-list-marker"),
        list_counter: el.u32_attr("list-counter"),
    }
}

pub(crate) fn read_box_style(
    el: &XmlElement,
    scripts: &HashMap<String, Script>,
) -> Result<BoxStyle> {
    Ok(BoxStyle {
        variant: keyword(el, "variant", BoxVariant::parse),
        color: keyword(el, "color", FlowColor::parse),
        inline: el.bool_attr("inline"),
        interaction: read_interaction(el, scripts)?,
    })
}

pub(crate) fn read_table_style(
    el: &XmlElement,
    scripts: &HashMap<String, Script>,
) -> Result<TableStyle> {
    Ok(TableStyle {
        inline: el.bool_attr("inline"),
        head: el.u32_attr("head"),
        interaction: read_interaction(el, scripts)?,
    })
}

/// Read the `<interaction>` child of a style element, if any.
fn read_interaction(
    el: &XmlElement,
    scripts: &HashMap<String, Script>,
) -> Result<Option<Interaction>> {
    let Some(interaction) = el.children().iter().find(|c| c.name() == INTERACTION) else {
        return Ok(None);
    };
    for child in interaction.children() {
        match child.name() {
            OPEN_URL => {
                return Ok(Some(Interaction::open_url(child.attr("href").unwrap_or_default())));
            },
            RUN_SCRIPT => {
                let id = child.required_attr("ref")?;
                let script = scripts.get(id).ok_or_else(|| Error::MissingReference {
                    kind: "script",
                    id: id.to_string(),
                })?;
                return Ok(Some(Interaction::run_script(script.clone())));
            },
            other => tracing::warn!(element = other, "Skipping unknown interaction"),
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_style_attributes() {
        let style = TextStyle {
            bold: Some(true),
            italic: Some(false),
            font_family: Some(FontFamily::Monospace),
            lang: Some("sv".to_string()),
            ..TextStyle::default()
        };
        let mut w = XmlWriter::new(None);
        let mut attrs = Attrs::new();
        text_style_attrs(&style, &mut attrs);
        w.empty("s", &attrs);
        let xml = w.finish();
        assert_eq!(
            xml,
            r#"<s bold="true" italic="false" font-family="monospace" lang="sv"/>"#
        );

        let el = XmlElement::parse_document(&xml).unwrap();
        assert_eq!(read_text_style(&el, &HashMap::new()).unwrap(), style);
    }

    #[test]
    fn test_permissive_values() {
        let el = XmlElement::parse_document(
            r#"<s list-level="x" alignment="middle" hide-list-marker="true"/>"#,
        )
        .unwrap();
        let style = read_paragraph_style(&el);
        assert_eq!(style.list_level, None);
        assert_eq!(style.alignment, None);
        assert_eq!(style.hide_list_marker, Some(true));
    }

    #[test]
    fn test_custom_interaction_rejected() {
        let mut w = XmlWriter::new(None);
        let mut scripts = Interner::new("script");
        let result = write_interaction(&mut w, &Interaction::Custom("share".into()), &mut scripts);
        assert_eq!(result, Err(Error::UnsupportedInteraction("share".into())));
    }

    #[test]
    fn test_missing_script_reference() {
        let el = XmlElement::parse_document(
            r#"<s><interaction><run-script ref="script-9"/></interaction></s>"#,
        )
        .unwrap();
        assert!(matches!(
            read_box_style(&el, &HashMap::new()),
            Err(Error::MissingReference { kind: "script", .. })
        ));
    }
}
