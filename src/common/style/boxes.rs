//! Box container style.

use super::{FlowColor, Interaction};

keyword_enum! {
    pub enum BoxVariant {
        Basic => "basic",
        Outlined => "outlined",
        Contained => "contained",
        Alert => "alert",
        Quote => "quote",
    }
}

/// Style of a box node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BoxStyle {
    pub variant: Option<BoxVariant>,
    pub color: Option<FlowColor>,
    pub inline: Option<bool>,
    /// Click handler attached to the whole box
    pub interaction: Option<Interaction>,
}

impl BoxStyle {
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
