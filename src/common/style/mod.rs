//! Style value objects referenced by flow nodes.
//!
//! Styles are plain attribute bags: every property is optional and an unset
//! property means "inherit from the ambient theme". They are compared and
//! hashed structurally so the codec can intern equal values.

/// Declares a closed keyword enum with its wire spelling.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Wire keyword for this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }

            /// Parse a wire keyword; unknown keywords yield `None`.
            pub fn parse(text: &str) -> Option<Self> {
                match text {
                    $( $text => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// Submodule declarations
pub mod boxes;
pub mod color;
pub mod interaction;
pub mod paragraph;
pub mod pos;
pub mod table;
pub mod text;

// Re-exports
pub use boxes::{BoxStyle, BoxVariant};
pub use color::FlowColor;
pub use interaction::Interaction;
pub use paragraph::{ListMarker, ParagraphStyle, ParagraphVariant, TextAlignment, TextDirection};
pub use pos::BaselineOffset;
pub use table::TableStyle;
pub use text::{FontFamily, TextStyle};
