//! Click handlers attached to links, boxes and tables.

use crate::script::Script;

/// What happens when the user activates an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Interaction {
    /// Navigate to a URL
    OpenUrl { href: String },
    /// Run a script
    RunScript { script: Script },
    /// Application-defined interaction, identified by name.
    ///
    /// Flowdoc has no representation for these, so serializing one fails.
    Custom(String),
}

impl Interaction {
    #[inline]
    pub fn open_url(href: impl Into<String>) -> Self {
        Interaction::OpenUrl { href: href.into() }
    }

    #[inline]
    pub fn run_script(script: Script) -> Self {
        Interaction::RunScript { script }
    }
}
