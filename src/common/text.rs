//! Text run validation and sanitizing.
//!
//! Node sizes are measured in UTF-16 code units, so every length here is a
//! UTF-16 length rather than a byte or `char` count.

use crate::common::{Error, Result};

/// Maximum length of a single text run, in UTF-16 code units.
pub const MAX_TEXT_RUN_LENGTH: usize = 10_000;

/// Length of `text` in UTF-16 code units.
#[inline]
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Byte offset of the UTF-16 offset `offset` in `text`.
///
/// Returns `None` when the offset falls between the two halves of a
/// surrogate pair or beyond the end of the text.
pub fn utf16_to_byte_offset(text: &str, offset: usize) -> Option<usize> {
    let mut units = 0usize;
    for (index, ch) in text.char_indices() {
        if units == offset {
            return Some(index);
        }
        units += ch.len_utf16();
        if units > offset {
            return None;
        }
    }
    (units == offset).then_some(text.len())
}

/// Whether `ch` may appear in a text run.
#[inline]
pub fn is_allowed_char(ch: char) -> bool {
    !(ch.is_control() || is_private_use(ch) || ch == '\u{2028}' || ch == '\u{2029}')
}

#[inline]
fn is_private_use(ch: char) -> bool {
    matches!(ch, '\u{E000}'..='\u{F8FF}' | '\u{F0000}'..='\u{FFFFD}' | '\u{100000}'..='\u{10FFFD}')
}

/// Check that `text` can be stored in a text run.
pub fn validate_text(text: &str) -> Result<()> {
    let length = utf16_len(text);
    if length > MAX_TEXT_RUN_LENGTH {
        return Err(Error::InvalidText(format!(
            "Text run is {} characters long, maximum is {}",
            length, MAX_TEXT_RUN_LENGTH
        )));
    }
    if let Some((index, ch)) = text.char_indices().find(|(_, ch)| !is_allowed_char(*ch)) {
        return Err(Error::InvalidText(format!(
            "Character U+{:04X} at byte {} is not allowed",
            ch as u32, index
        )));
    }
    Ok(())
}

/// Sanitize free-form text so it passes [`validate_text`] (except for length).
///
/// Tabs and line terminators become a single space; every other rejected
/// character becomes U+FFFD.
///
/// # Examples
///
/// ```
/// use flowdoc::common::text::normalize_text;
///
/// assert_eq!(normalize_text("a\r\nb\tc"), "a b c");
/// assert_eq!(normalize_text("x\u{0007}y"), "x\u{FFFD}y");
/// ```
pub fn normalize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                result.push(' ');
            },
            '\n' | '\t' | '\u{2028}' | '\u{2029}' => result.push(' '),
            ch if is_allowed_char(ch) => result.push(ch),
            _ => result.push('\u{FFFD}'),
        }
    }
    result
}
