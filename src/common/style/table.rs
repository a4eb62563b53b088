use super::Interaction;

/// Style of a table node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TableStyle {
    pub inline: Option<bool>,
    /// Number of header rows
    pub head: Option<u32>,
    pub interaction: Option<Interaction>,
}

impl TableStyle {
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
