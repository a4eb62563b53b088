//! Character-level style.

use super::{BaselineOffset, FlowColor, Interaction};

keyword_enum! {
    /// Symbolic font family resolved by the theme.
    pub enum FontFamily {
        Body => "body",
        Heading => "heading",
        Monospace => "monospace",
        Cursive => "cursive",
    }
}

/// Style carried by inline nodes (text runs, breaks, markup, inline objects).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TextStyle {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strike: Option<bool>,
    pub baseline: Option<BaselineOffset>,
    pub font_family: Option<FontFamily>,
    /// Font size in percent of the ambient size
    pub font_size: Option<u32>,
    pub color: Option<FlowColor>,
    /// BCP 47 language tag
    pub lang: Option<String>,
    pub spellcheck: Option<bool>,
    /// `Some(false)` marks text that must not be machine translated
    pub translate: Option<bool>,
    pub link: Option<Interaction>,
}

impl TextStyle {
    /// A style with every property unset.
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check whether no property is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shorthand for a bold-only style.
    pub fn bold() -> Self {
        Self {
            bold: Some(true),
            ..Self::default()
        }
    }

    /// Overlay `other` on this style; properties set in `other` win.
    pub fn merge(&self, other: &TextStyle) -> TextStyle {
        TextStyle {
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            underline: other.underline.or(self.underline),
            strike: other.strike.or(self.strike),
            baseline: other.baseline.or(self.baseline),
            font_family: other.font_family.or(self.font_family),
            font_size: other.font_size.or(self.font_size),
            color: other.color.or(self.color),
            lang: other.lang.clone().or_else(|| self.lang.clone()),
            spellcheck: other.spellcheck.or(self.spellcheck),
            translate: other.translate.or(self.translate),
            link: other.link.clone().or_else(|| self.link.clone()),
        }
    }
}
