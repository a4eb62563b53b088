keyword_enum! {
    /// Vertical text position (superscript/subscript).
    pub enum BaselineOffset {
        /// Normal position
        Normal => "normal",
        /// Subscript
        Sub => "sub",
        /// Superscript
        Super => "super",
    }
}

impl BaselineOffset {
    /// Check if this is a normal (non-superscript, non-subscript) position.
    #[inline]
    pub fn is_normal(&self) -> bool {
        matches!(self, BaselineOffset::Normal)
    }
}
