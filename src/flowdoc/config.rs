//! Configuration types for the flowdoc codec.

use crate::flow::TableOptions;

/// Configuration for the flowdoc codec.
///
/// # Examples
///
/// ```rust
/// use flowdoc::flowdoc::FlowdocOptions;
///
/// // Compact output, no declaration
/// let options = FlowdocOptions::default();
///
/// // Or customize
/// let options = FlowdocOptions::new()
///     .with_indent(Some(2))
///     .with_xml_declaration(true);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowdocOptions {
    /// Spaces per nesting level; `None` writes everything on one line
    pub indent: Option<usize>,
    /// Whether to start the document with `<?xml version="1.0" ...?>`
    pub xml_declaration: bool,
    /// How tables are rebuilt when reading
    pub table: TableOptions,
}

impl FlowdocOptions {
    /// Create a new `FlowdocOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width.
    ///
    /// Indentation only adds whitespace between elements. Text inside
    /// `<t>`, `<c>` and `<code>` is never reformatted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flowdoc::flowdoc::FlowdocOptions;
    ///
    /// let options = FlowdocOptions::new().with_indent(Some(4));
    /// ```
    #[inline]
    pub fn with_indent(mut self, indent: Option<usize>) -> Self {
        self.indent = indent;
        self
    }

    /// Set whether to write the XML declaration.
    #[inline]
    pub fn with_xml_declaration(mut self, include: bool) -> Self {
        self.xml_declaration = include;
        self
    }

    /// Set the table construction options used when reading.
    ///
    /// With strict tables, a document holding overlapping cells fails to
    /// parse instead of dropping the overlapped cells.
    #[inline]
    pub fn with_table_options(mut self, table: TableOptions) -> Self {
        self.table = table;
        self
    }
}
