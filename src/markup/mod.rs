/// Markup rewriting over flow content.
///
/// Markup nodes delimit regions of a flat node sequence: a `StartMarkup`
/// paired with the `EndMarkup` of the same tag at the same nesting depth, or
/// a single `EmptyMarkup`. This module finds those regions and lets
/// application code decide what becomes of them.
///
/// - [`process_markup`]: async rewrite pass driven by a [`MarkupHandler`]
/// - [`extract_markup`]: synchronous split into remainder and matched regions
/// - [`ReplacementRegistry`]: side table for values handlers want to keep
///   outside the content, located later through placeholder nodes
pub mod extract;
pub mod process;
pub mod types;

pub use extract::{ExtractedMarkup, MarkupMatch, extract_markup};
pub use process::{process_markup, process_markup_blocking};
pub use types::{
    MarkupAction, MarkupContext, MarkupHandler, REPLACEMENT_REF_ATTR, REPLACEMENT_TAG_PREFIX,
    ReplacementRegistry, placeholder_index,
};
