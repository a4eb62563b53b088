//! XML helpers shared by the flowdoc codec.

pub mod element;
pub mod escape;
pub mod writer;

pub use element::XmlElement;
pub use escape::{escape_attr, escape_xml};
pub use writer::{Attrs, XmlWriter};
