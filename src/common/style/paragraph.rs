//! Paragraph-level style, carried by paragraph breaks.

keyword_enum! {
    pub enum TextAlignment {
        Start => "start",
        Center => "center",
        End => "end",
        Justify => "justify",
    }
}

keyword_enum! {
    pub enum TextDirection {
        Ltr => "ltr",
        Rtl => "rtl",
    }
}

keyword_enum! {
    /// Semantic paragraph kind.
    pub enum ParagraphVariant {
        Normal => "normal",
        Title => "title",
        Subtitle => "subtitle",
        H1 => "h1",
        H2 => "h2",
        H3 => "h3",
        H4 => "h4",
        H5 => "h5",
        H6 => "h6",
        Code => "code",
        Preamble => "preamble",
    }
}

keyword_enum! {
    pub enum ListMarker {
        Ordered => "ordered",
        Unordered => "unordered",
        Decimal => "decimal",
        LowerAlpha => "lower-alpha",
        UpperAlpha => "upper-alpha",
        LowerRoman => "lower-roman",
        UpperRoman => "upper-roman",
        Disc => "disc",
        Circle => "circle",
        Square => "square",
        Dash => "dash",
    }
}

/// Style of the paragraph terminated by a paragraph break.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ParagraphStyle {
    pub alignment: Option<TextAlignment>,
    pub direction: Option<TextDirection>,
    pub variant: Option<ParagraphVariant>,
    /// Line spacing in percent
    pub line_spacing: Option<u32>,
    pub space_before: Option<u32>,
    pub space_after: Option<u32>,
    /// List nesting; 0 or unset means "not a list item"
    pub list_level: Option<u32>,
    pub list_marker: Option<ListMarker>,
    pub hide_list_marker: Option<bool>,
    pub list_counter: Option<u32>,
}

impl ParagraphStyle {
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Effective list level (0 when unset).
    #[inline]
    pub fn list_level(&self) -> u32 {
        self.list_level.unwrap_or(0)
    }

    /// Check whether this paragraph is a list item.
    #[inline]
    pub fn is_list_item(&self) -> bool {
        self.list_level() > 0
    }
}
