keyword_enum! {
    /// Theme color slot.
    ///
    /// Colors are symbolic; the theme decides the actual RGB value.
    pub enum FlowColor {
        Default => "default",
        Primary => "primary",
        Secondary => "secondary",
        Subtle => "subtle",
        Information => "information",
        Success => "success",
        Warning => "warning",
        Error => "error",
    }
}
