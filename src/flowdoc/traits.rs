//! Core trait for flowdoc conversion.

use super::config::FlowdocOptions;
use crate::common::Result;

/// Types that can be written as a flowdoc XML document.
///
/// # Examples
///
/// ```rust
/// use flowdoc::flow::FlowContent;
/// use flowdoc::flowdoc::{FlowdocOptions, ToFlowdoc};
///
/// # fn main() -> Result<(), flowdoc::Error> {
/// let content = FlowContent::from_text("Hello");
/// let xml = content.to_flowdoc()?;
/// assert!(xml.starts_with("<flowdoc"));
///
/// let pretty = content.to_flowdoc_with_options(&FlowdocOptions::new().with_indent(Some(2)))?;
/// assert!(pretty.contains('\n'));
/// # Ok(())
/// # }
/// ```
pub trait ToFlowdoc {
    /// Convert this item to flowdoc with default options.
    fn to_flowdoc(&self) -> Result<String> {
        self.to_flowdoc_with_options(&FlowdocOptions::default())
    }

    /// Convert this item to flowdoc with custom options.
    fn to_flowdoc_with_options(&self, options: &FlowdocOptions) -> Result<String>;
}
