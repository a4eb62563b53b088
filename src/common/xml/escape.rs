use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Static initialization: automatons are built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">"])
        .expect("Failed to build XML escaper")
});

// Attribute values also need quotes escaped, and non-space whitespace kept
// as character references so attribute value normalization cannot eat it.
static ATTR_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'", "\t", "\n", "\r"])
        .expect("Failed to build XML attribute escaper")
});

/// Escape XML special characters in element text.
///
/// # Examples
///
/// ```
/// use flowdoc::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;"])
}

/// Escape an attribute value.
///
/// Tabs, line feeds and carriage returns are written as numeric character
/// references.
///
/// # Examples
///
/// ```
/// use flowdoc::common::xml::escape_attr;
/// assert_eq!(escape_attr("say \"hi\""), "say &quot;hi&quot;");
/// assert_eq!(escape_attr("a\nb\tc"), "a&#10;b&#9;c");
/// ```
#[inline]
pub fn escape_attr(s: &str) -> String {
    ATTR_ESCAPER.replace_all(
        s,
        &[
            "&amp;", "&lt;", "&gt;", "&quot;", "&apos;", "&#9;", "&#10;", "&#13;",
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text_keeps_quotes() {
        assert_eq!(escape_xml("\"it's\""), "\"it's\"");
        assert_eq!(escape_xml("1 < 2 && 3 > 2"), "1 &lt; 2 &amp;&amp; 3 &gt; 2");
    }

    #[test]
    fn test_escape_attr_whitespace() {
        assert_eq!(escape_attr("a b"), "a b");
        assert_eq!(escape_attr("\r\n"), "&#13;&#10;");
        assert_eq!(escape_attr("'&'"), "&apos;&amp;&apos;");
    }
}
