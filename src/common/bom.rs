//! Byte Order Mark (BOM) handling for text-based input.

/// UTF-8 BOM bytes.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Strip a leading UTF-8 BOM, if present.
///
/// # Examples
///
/// ```
/// use flowdoc::common::bom::strip_utf8_bom;
///
/// assert_eq!(strip_utf8_bom(b"\xEF\xBB\xBF<a/>"), b"<a/>");
/// assert_eq!(strip_utf8_bom(b"<a/>"), b"<a/>");
/// ```
#[inline]
pub fn strip_utf8_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes)
}
