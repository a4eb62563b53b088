/// Flowdoc XML codec for flow content.
///
/// Flowdoc is the interchange format for [`FlowContent`]: a `<body>` holding
/// the node tree, followed by a trailer of shared definitions (styles,
/// scripts and image sources) that body elements reference by id.
///
/// # Quick Start
///
/// ```rust
/// use flowdoc::flow::FlowContent;
/// use flowdoc::flowdoc::{FlowdocOptions, ToFlowdoc, deserialize_flowdoc};
///
/// # fn main() -> Result<(), flowdoc::Error> {
/// let content = FlowContent::from_text("First\nSecond");
/// let xml = content.to_flowdoc()?;
///
/// let read = deserialize_flowdoc(&xml, &FlowdocOptions::default())?;
/// assert_eq!(read, content);
/// # Ok(())
/// # }
/// ```
///
/// # Architecture
///
/// - [`ToFlowdoc`] trait: types that can be written as flowdoc
/// - [`FlowdocOptions`]: output formatting and table strictness
/// - `serialize`: visitor-based writer that interns trailer entries
/// - `deserialize`: tree reader that resolves trailer references
/// - `message`: token-tree form of script messages
///
/// # Document Shape
///
/// ```xml
/// <flowdoc xmlns="https://flowdoc.dev/schema/flowdoc/v1">
///   <body>
///     <p style="para-1"><t style="text-1">Title</t></p>
///     <p><t>Hello </t><dynamic expression="script-1"/></p>
///   </body>
///   <text-style id="text-1" bold="true"/>
///   <para-style id="para-1" variant="h1"/>
///   <script id="script-1"><code>return user.name</code></script>
/// </flowdoc>
/// ```
pub mod config;
pub mod constants;
pub mod deserialize;
mod interner;
mod message;
pub mod serialize;
mod styles;
pub mod traits;

pub use config::FlowdocOptions;
pub use constants::{DEFAULT_CELL_KEY, FLOWDOC_NAMESPACE};
pub use deserialize::{deserialize_flowdoc, deserialize_flowdoc_bytes};
pub use serialize::serialize_flowdoc;
pub use traits::ToFlowdoc;

use crate::common::Result;
use crate::flow::FlowContent;

impl ToFlowdoc for FlowContent {
    fn to_flowdoc_with_options(&self, options: &FlowdocOptions) -> Result<String> {
        serialize_flowdoc(self, options)
    }
}
