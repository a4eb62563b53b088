//! Position arithmetic over flow content.
//!
//! A [`FlowCursor`] addresses a position in `[0, size]` of a borrowed
//! [`FlowContent`] and caches which node the position falls in. Positions are
//! canonical: a position on a node boundary belongs to the node that starts
//! there, except the end of the content, which sits on the trailing edge of
//! the last node. Empty content has a single cursor at `(0, 0)` pointing at
//! no node.

use crate::common::style::{ParagraphStyle, TextStyle};
use crate::common::{Error, Result};
use crate::flow::content::FlowContent;
use crate::flow::node::FlowNode;
use smallvec::SmallVec;

/// Immutable cursor; every navigation returns a new cursor.
#[derive(Debug, Clone, Copy)]
pub struct FlowCursor<'a> {
    content: &'a FlowContent,
    index: usize,
    offset: usize,
    position: usize,
}

impl PartialEq for FlowCursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.content, other.content) && self.position == other.position
    }
}

impl Eq for FlowCursor<'_> {}

impl<'a> FlowCursor<'a> {
    /// Cursor at the start of `content`.
    #[inline]
    pub fn new(content: &'a FlowContent) -> Self {
        Self {
            content,
            index: 0,
            offset: 0,
            position: 0,
        }
    }

    #[inline]
    pub fn content(&self) -> &'a FlowContent {
        self.content
    }

    /// Absolute position in UTF-16 code units.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Index of the current node.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Offset within the current node.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Node under the cursor. At the end this is the last node.
    #[inline]
    pub fn node(&self) -> Option<&'a FlowNode> {
        self.content.nodes().get(self.index)
    }

    #[inline]
    pub fn is_at_start(&self) -> bool {
        self.position == 0
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.position == self.content.size()
    }

    /// Move by `distance`, failing with `OutOfRange` outside `[0, size]`.
    pub fn move_by(&self, distance: isize) -> Result<Self> {
        let size = self.content.size();
        let target = (self.position as isize)
            .checked_add(distance)
            .filter(|target| *target >= 0 && *target as usize <= size)
            .ok_or_else(|| Error::OutOfRange {
                position: (self.position as isize).saturating_add(distance),
                size,
            })?;
        Ok(self.seek(target as usize))
    }

    /// Move by `distance`, clamping to the start or end.
    pub fn move_saturating(&self, distance: isize) -> Self {
        let target = (self.position as isize).saturating_add(distance);
        let target = target.clamp(0, self.content.size() as isize) as usize;
        self.seek(target)
    }

    #[inline]
    pub fn move_to_start(&self) -> Self {
        Self::new(self.content)
    }

    pub fn move_to_end(&self) -> Self {
        self.seek(self.content.size())
    }

    /// Start of the current node.
    #[inline]
    pub fn move_to_start_of_node(&self) -> Self {
        Self {
            offset: 0,
            position: self.position - self.offset,
            ..*self
        }
    }

    /// Start of the node after the current one, if any.
    pub fn move_to_start_of_next_node(&self) -> Option<Self> {
        let node = self.node()?;
        let index = self.index + 1;
        if index >= self.content.node_count() {
            return None;
        }
        Some(Self {
            content: self.content,
            index,
            offset: 0,
            position: self.position - self.offset + node.size(),
        })
    }

    /// Start of the node before the current one, if any.
    pub fn move_to_start_of_previous_node(&self) -> Option<Self> {
        let index = self.index.checked_sub(1)?;
        let previous = self.content.nodes().get(index)?;
        Some(Self {
            content: self.content,
            index,
            offset: 0,
            position: self.position - self.offset - previous.size(),
        })
    }

    /// First node at or after the cursor matching `predicate`.
    ///
    /// The current node is only considered when the cursor is at its start.
    pub fn find_node_forward<P>(&self, mut predicate: P) -> Option<Self>
    where
        P: FnMut(&'a FlowNode) -> bool,
    {
        let nodes = self.content.nodes();
        let (mut index, mut position) = if self.offset == 0 {
            (self.index, self.position)
        } else {
            let node = self.node()?;
            (self.index + 1, self.position - self.offset + node.size())
        };
        while let Some(node) = nodes.get(index) {
            if predicate(node) {
                return Some(Self {
                    content: self.content,
                    index,
                    offset: 0,
                    position,
                });
            }
            position += node.size();
            index += 1;
        }
        None
    }

    /// Last node starting before the cursor matching `predicate`.
    pub fn find_node_backward<P>(&self, mut predicate: P) -> Option<Self>
    where
        P: FnMut(&'a FlowNode) -> bool,
    {
        let nodes = self.content.nodes();
        let mut end = if self.offset > 0 { self.index + 1 } else { self.index };
        let mut position = self.position - self.offset;
        if end > self.index {
            position += self.node().map_or(0, FlowNode::size);
        }
        while end > 0 {
            end -= 1;
            let node = &nodes[end];
            position -= node.size();
            if predicate(node) {
                return Some(Self {
                    content: self.content,
                    index: end,
                    offset: 0,
                    position,
                });
            }
        }
        None
    }

    /// Nodes between this cursor and the cursor `distance` away.
    ///
    /// Text runs on either boundary are split; fails with `OutOfRange` when the
    /// other end is outside the content and `InvalidSplit` when a boundary
    /// falls inside a surrogate pair.
    pub fn range(&self, distance: isize) -> Result<FlowContent> {
        let other = self.move_by(distance)?;
        let (start, end) = if distance < 0 {
            (other, *self)
        } else {
            (*self, other)
        };
        if start.position == end.position {
            return Ok(FlowContent::empty());
        }

        let nodes = self.content.nodes();
        let mut result = Vec::with_capacity(end.index - start.index + 1);

        if start.index == end.index {
            let node = &nodes[start.index];
            if start.offset == 0 && end.offset == node.size() {
                result.push(node.clone());
            } else {
                let (_, tail) = node.split_at(start.offset)?;
                let (middle, _) = tail.split_at(end.offset - start.offset)?;
                result.push(middle);
            }
            return Ok(FlowContent::new(result));
        }

        let first = &nodes[start.index];
        if start.offset == 0 {
            result.push(first.clone());
        } else {
            result.push(first.split_at(start.offset)?.1);
        }

        result.extend(nodes[start.index + 1..end.index].iter().cloned());

        if end.offset > 0 {
            let last = &nodes[end.index];
            if end.offset == last.size() {
                result.push(last.clone());
            } else {
                result.push(last.split_at(end.offset)?.0);
            }
        }

        Ok(FlowContent::new(result))
    }

    /// Matching end markup for the start markup at the cursor.
    ///
    /// Start and end markup pair by tag with stack discipline, so
    /// `[S x, S x, E x, E x]` matches the first start with the last end.
    pub fn find_markup_end(&self) -> Option<Self> {
        let FlowNode::StartMarkup(start) = self.node()? else {
            return None;
        };
        if self.offset > 0 {
            return None;
        }

        let mut stack: SmallVec<[&'a str; 8]> = SmallVec::new();
        stack.push(start.tag.as_str());
        let next = self.move_to_start_of_next_node()?;
        next.find_node_forward(|node| match node {
            FlowNode::StartMarkup(inner) => {
                stack.push(inner.tag.as_str());
                false
            },
            FlowNode::EndMarkup(end) if stack.last() == Some(&end.tag.as_str()) => {
                stack.pop();
                stack.is_empty()
            },
            _ => false,
        })
    }

    /// Matching start markup for the end markup at the cursor.
    pub fn find_markup_start(&self) -> Option<Self> {
        let FlowNode::EndMarkup(end) = self.node()? else {
            return None;
        };
        if self.offset > 0 {
            return None;
        }

        let mut stack: SmallVec<[&'a str; 8]> = SmallVec::new();
        stack.push(end.tag.as_str());
        self.find_node_backward(|node| match node {
            FlowNode::EndMarkup(inner) => {
                stack.push(inner.tag.as_str());
                false
            },
            FlowNode::StartMarkup(start) if stack.last() == Some(&start.tag.as_str()) => {
                stack.pop();
                stack.is_empty()
            },
            _ => false,
        })
    }

    /// Text style in effect at the cursor.
    ///
    /// Inside a node this is the node's own style; on a boundary it is the
    /// style of the closest inline node before the cursor in the same
    /// paragraph.
    pub fn get_text_style(&self) -> Option<&'a TextStyle> {
        if self.offset > 0 {
            if let Some(style) = self.node().and_then(FlowNode::text_style) {
                return Some(style);
            }
        }
        let found = self.find_node_backward(|node| {
            node.is_paragraph_break() || node.text_style().is_some()
        })?;
        found.node()?.text_style()
    }

    /// Style of the paragraph containing the cursor.
    ///
    /// Paragraph style is carried by the break that ends the paragraph, so
    /// this looks forward. Trailing content without a break has no style.
    pub fn get_paragraph_style(&self) -> Option<&'a ParagraphStyle> {
        let found = self.find_node_forward(FlowNode::is_paragraph_break)?;
        found.node()?.as_paragraph_break().map(|node| &node.style)
    }

    fn seek(&self, target: usize) -> Self {
        let nodes = self.content.nodes();
        let mut index = self.index;
        let mut start = self.position - self.offset;

        if target < start {
            while target < start {
                index -= 1;
                start -= nodes[index].size();
            }
        } else {
            while let Some(node) = nodes.get(index) {
                let size = node.size();
                if target < start + size || index + 1 == nodes.len() {
                    break;
                }
                start += size;
                index += 1;
            }
        }

        Self {
            content: self.content,
            index,
            offset: target - start,
            position: target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::node::MarkupAttrs;
    use proptest::prelude::*;

    fn text(value: &str) -> FlowNode {
        FlowNode::text(value, TextStyle::default()).unwrap()
    }

    fn para(level: u32) -> FlowNode {
        FlowNode::paragraph_break(ParagraphStyle {
            list_level: Some(level),
            ..ParagraphStyle::default()
        })
    }

    fn sample() -> FlowContent {
        // "abc" | para | "de" | line break
        FlowContent::new(vec![
            text("abc"),
            para(1),
            text("de"),
            FlowNode::line_break(TextStyle::default()),
        ])
    }

    #[test]
    fn test_canonical_positions() {
        let content = sample();
        let cursor = content.cursor_at_start();

        let at3 = cursor.move_by(3).unwrap();
        assert_eq!((at3.index(), at3.offset()), (1, 0));

        let end = cursor.move_to_end();
        assert_eq!(end.position(), 7);
        assert_eq!((end.index(), end.offset()), (3, 1));
        assert!(end.is_at_end());

        let empty = FlowContent::empty();
        let null = empty.cursor_at_start();
        assert!(null.node().is_none());
        assert!(null.is_at_end());
    }

    #[test]
    fn test_strict_and_saturating_moves() {
        let content = sample();
        let cursor = content.cursor_at_start().move_by(2).unwrap();
        assert!(matches!(
            cursor.move_by(6),
            Err(Error::OutOfRange { position: 8, size: 7 })
        ));
        assert!(cursor.move_by(-3).is_err());
        assert_eq!(cursor.move_saturating(100).position(), 7);
        assert_eq!(cursor.move_saturating(-100).position(), 0);
        assert_eq!(cursor.move_saturating(-100), content.cursor_at_start());
    }

    #[test]
    fn test_extreme_distances() {
        let content = sample();
        let cursor = content.cursor_at_start().move_by(1).unwrap();
        assert!(matches!(
            cursor.move_by(isize::MAX),
            Err(Error::OutOfRange { position: isize::MAX, size: 7 })
        ));
        assert!(matches!(
            cursor.move_by(isize::MIN),
            Err(Error::OutOfRange { size: 7, .. })
        ));
        assert!(cursor.range(isize::MAX).is_err());
        assert!(cursor.range(isize::MIN).is_err());
        assert_eq!(cursor.move_saturating(isize::MAX).position(), 7);
    }

    #[test]
    fn test_node_navigation() {
        let content = sample();
        let inside = content.peek(1).unwrap();
        assert_eq!(inside.move_to_start_of_node().position(), 0);

        let next = inside.move_to_start_of_next_node().unwrap();
        assert_eq!(next.position(), 3);
        assert!(next.node().unwrap().is_paragraph_break());

        let previous = next.move_to_start_of_previous_node().unwrap();
        assert_eq!(previous.position(), 0);
        assert!(previous.move_to_start_of_previous_node().is_none());
        assert!(content.cursor_at_end().move_to_start_of_next_node().is_none());
    }

    #[test]
    fn test_find_nodes() {
        let content = sample();
        let start = content.cursor_at_start();
        let found = start.find_node_forward(FlowNode::is_paragraph_break).unwrap();
        assert_eq!(found.position(), 3);
        // Current node only counts at its start
        assert_eq!(found.find_node_forward(FlowNode::is_paragraph_break), Some(found));
        assert!(content.peek(4).unwrap().find_node_forward(FlowNode::is_paragraph_break).is_none());

        let end = content.cursor_at_end();
        let back = end.find_node_backward(|n| n.as_text_run().is_some()).unwrap();
        assert_eq!(back.position(), 4);
        assert!(found.find_node_backward(FlowNode::is_paragraph_break).is_none());
    }

    #[test]
    fn test_range_splits_text() {
        let content = sample();
        let cursor = content.peek(1).unwrap();
        let slice = cursor.range(4).unwrap();
        assert_eq!(slice.nodes(), &[text("bc"), para(1), text("d")]);

        let backward = content.peek(5).unwrap().range(-4).unwrap();
        assert_eq!(backward, slice);

        let inner = cursor.range(1).unwrap();
        assert_eq!(inner.nodes(), &[text("b")]);
        assert!(cursor.range(10).is_err());
    }

    #[test]
    fn test_range_inside_surrogate_pair_fails() {
        let content = FlowContent::new(vec![text("a😀")]);
        let cursor = content.peek(2).unwrap();
        assert!(matches!(cursor.range(-1), Err(Error::InvalidSplit(_))));
    }

    #[test]
    fn test_bracket_matching() {
        let content = FlowContent::new(vec![
            FlowNode::start_markup("x", MarkupAttrs::new()),
            FlowNode::start_markup("x", MarkupAttrs::new()),
            FlowNode::end_markup("x"),
            FlowNode::end_markup("x"),
        ]);
        let start = content.cursor_at_start();
        let end = start.find_markup_end().unwrap();
        assert_eq!(end.index(), 3);
        assert_eq!(end.find_markup_start(), Some(start));

        let inner = content.peek(1).unwrap().find_markup_end().unwrap();
        assert_eq!(inner.index(), 2);
    }

    #[test]
    fn test_bracket_matching_interleaved_tags() {
        let content = FlowContent::new(vec![
            FlowNode::start_markup("a", MarkupAttrs::new()),
            FlowNode::start_markup("b", MarkupAttrs::new()),
            FlowNode::end_markup("a"),
            FlowNode::end_markup("b"),
            FlowNode::end_markup("a"),
        ]);
        // The stray end "a" inside "b" does not close the outer region
        let end = content.cursor_at_start().find_markup_end().unwrap();
        assert_eq!(end.index(), 4);

        let unmatched = FlowContent::new(vec![FlowNode::start_markup("a", MarkupAttrs::new())]);
        assert!(unmatched.cursor_at_start().find_markup_end().is_none());
    }

    #[test]
    fn test_ambient_styles() {
        let bold = TextStyle::bold();
        let content = FlowContent::new(vec![
            FlowNode::text("ab", bold.clone()).unwrap(),
            text("cd"),
            para(2),
            text("e"),
        ]);

        assert_eq!(content.peek(1).unwrap().get_text_style(), Some(&bold));
        // On a boundary the style comes from the node before
        assert_eq!(content.peek(2).unwrap().get_text_style(), Some(&bold));
        assert_eq!(content.peek(0).unwrap().get_text_style(), None);
        // Paragraph breaks stop the backward search
        assert_eq!(content.peek(5).unwrap().get_text_style(), None);

        assert_eq!(
            content.peek(1).unwrap().get_paragraph_style().and_then(|s| s.list_level),
            Some(2)
        );
        assert_eq!(content.peek(5).unwrap().get_paragraph_style(), None);
    }

    fn arb_content() -> impl Strategy<Value = FlowContent> {
        let node = prop_oneof![
            "[a-z😀]{1,6}".prop_map(|s| FlowNode::text(s, TextStyle::default()).unwrap()),
            Just(FlowNode::paragraph_break(ParagraphStyle::default())),
            Just(FlowNode::line_break(TextStyle::default())),
        ];
        prop::collection::vec(node, 0..12).prop_map(FlowContent::new)
    }

    proptest! {
        #[test]
        fn prop_size_is_sum_of_nodes(content in arb_content()) {
            let sum: usize = content.nodes().iter().map(FlowNode::size).sum();
            prop_assert_eq!(content.size(), sum);
        }

        #[test]
        fn prop_move_identity(content in arb_content(), a in 0usize..64, b in 0usize..64) {
            let size = content.size();
            let from = a % (size + 1);
            let to = b % (size + 1);
            let cursor = content.peek(from).unwrap();
            let distance = to as isize - from as isize;
            let moved = cursor.move_by(distance).unwrap();
            prop_assert!(moved.position() <= size);
            prop_assert_eq!(moved.move_by(-distance).unwrap(), cursor);
            prop_assert_eq!(content.peek(to).unwrap().index(), moved.index());
        }
    }
}
