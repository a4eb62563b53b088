//! Script payloads for interactions and dynamic text.
//!
//! A script is opaque code plus a table of localizable message templates.
//! Messages use a constrained ICU-like grammar, see [`message`].

pub mod message;

pub use message::{
    MessageFormat, MessageNode, PluralCase, PluralMode, SelectCase, is_supported_message_format,
};

use std::collections::BTreeMap;

/// Script code with its localizable messages.
///
/// # Examples
///
/// ```
/// use flowdoc::script::Script;
///
/// let script = Script::new("return count;")
///     .with_message("items", "{count, plural, one {# item} other {# items}}");
/// assert_eq!(script.messages.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Script {
    pub code: String,
    /// Message templates by key, iterated in key order
    pub messages: BTreeMap<String, String>,
}

impl Script {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            messages: BTreeMap::new(),
        }
    }

    /// Add (or replace) a message template.
    pub fn with_message(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(key.into(), message.into());
        self
    }

    /// Check that every message is in the supported grammar.
    pub fn has_supported_messages(&self) -> bool {
        self.messages.values().all(|m| is_supported_message_format(m))
    }
}
