//! String-backed XML writer with optional indentation.

use super::escape::{escape_attr, escape_xml};
use smallvec::SmallVec;
use std::fmt::Write as FmtWrite;

/// Attribute list for one element, in output order.
#[derive(Debug, Default)]
pub struct Attrs {
    items: SmallVec<[(&'static str, String); 8]>,
}

impl Attrs {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute.
    #[inline]
    pub fn push(&mut self, name: &'static str, value: impl Into<String>) -> &mut Self {
        self.items.push((name, value.into()));
        self
    }

    /// Add an attribute only when a value is present.
    #[inline]
    pub fn push_opt<T: ToString>(&mut self, name: &'static str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.items.push((name, value.to_string()));
        }
        self
    }

    /// Add a boolean attribute as `"true"`/`"false"` when explicitly set.
    #[inline]
    pub fn push_bool(&mut self, name: &'static str, value: Option<bool>) -> &mut Self {
        if let Some(value) = value {
            self.items.push((name, if value { "true" } else { "false" }.to_string()));
        }
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Streaming XML writer.
///
/// Indentation, when enabled, is only emitted between elements; text written
/// with [`XmlWriter::text_element`] is never touched.
#[derive(Debug)]
pub struct XmlWriter {
    out: String,
    indent: Option<usize>,
    depth: usize,
    // Whether each open element has child elements yet
    open: SmallVec<[bool; 16]>,
}

impl XmlWriter {
    pub fn new(indent: Option<usize>) -> Self {
        Self {
            out: String::with_capacity(4096),
            indent,
            depth: 0,
            open: SmallVec::new(),
        }
    }

    /// Write the XML declaration.
    pub fn declaration(&mut self) {
        self.out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
    }

    /// Open an element: `<tag attrs>`.
    pub fn open(&mut self, tag: &str, attrs: &Attrs) {
        self.newline();
        self.start_tag(tag, attrs);
        self.out.push('>');
        self.open.push(false);
        self.depth += 1;
    }

    /// Close the most recently opened element.
    pub fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        if self.open.pop().unwrap_or(false) {
            self.newline();
        }
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }

    /// Write an empty element: `<tag attrs/>`.
    pub fn empty(&mut self, tag: &str, attrs: &Attrs) {
        self.newline();
        self.start_tag(tag, attrs);
        self.out.push_str("/>");
    }

    /// Write an element holding only text: `<tag attrs>text</tag>`.
    pub fn text_element(&mut self, tag: &str, attrs: &Attrs, text: &str) {
        if text.is_empty() {
            self.empty(tag, attrs);
            return;
        }
        self.newline();
        self.start_tag(tag, attrs);
        self.out.push('>');
        self.out.push_str(&escape_xml(text));
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }

    /// Finish writing and return the document.
    pub fn finish(self) -> String {
        self.out
    }

    fn start_tag(&mut self, tag: &str, attrs: &Attrs) {
        self.out.push('<');
        self.out.push_str(tag);
        for (name, value) in &attrs.items {
            // Writing into a String cannot fail
            let _ = write!(self.out, " {}=\"{}\"", name, escape_attr(value));
        }
    }

    fn newline(&mut self) {
        if let Some(parent) = self.open.last_mut() {
            *parent = true;
        }
        if let Some(width) = self.indent {
            if !self.out.is_empty() {
                self.out.push('\n');
            }
            for _ in 0..self.depth * width {
                self.out.push(' ');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_output() {
        let mut w = XmlWriter::new(None);
        let mut attrs = Attrs::new();
        attrs.push("id", "a\"b").push_bool("flag", Some(false)).push_opt::<u32>("n", None);
        w.open("root", &attrs);
        w.text_element("t", &Attrs::new(), "x < y");
        w.empty("br", &Attrs::new());
        w.close("root");
        assert_eq!(
            w.finish(),
            "<root id=\"a&quot;b\" flag=\"false\"><t>x &lt; y</t><br/></root>"
        );
    }

    #[test]
    fn test_indented_output() {
        let mut w = XmlWriter::new(Some(2));
        w.open("a", &Attrs::new());
        w.open("b", &Attrs::new());
        w.text_element("t", &Attrs::new(), " keep ");
        w.close("b");
        w.open("c", &Attrs::new());
        w.close("c");
        w.close("a");
        assert_eq!(
            w.finish(),
            "<a>\n  <b>\n    <t> keep </t>\n  </b>\n  <c></c>\n</a>"
        );
    }
}
