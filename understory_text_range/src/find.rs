// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Finding the first match of a pattern in each text leaf.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use crate::span::Span;
use crate::types::{NodeRef, TextFilter, TextTree};
use crate::walk::walk;

/// Something that can locate its first occurrence in a string.
///
/// Implemented for string and `char` needles and, with the `regex` feature,
/// for [`regex::Regex`]. The returned range is in bytes and must lie on `char`
/// boundaries of `haystack`.
pub trait TextPattern {
    /// Byte range of the first match in `haystack`, if any.
    fn first_match(&self, haystack: &str) -> Option<Range<usize>>;
}

impl TextPattern for str {
    fn first_match(&self, haystack: &str) -> Option<Range<usize>> {
        let start = haystack.find(self)?;
        Some(start..start + self.len())
    }
}

impl TextPattern for String {
    fn first_match(&self, haystack: &str) -> Option<Range<usize>> {
        self.as_str().first_match(haystack)
    }
}

impl TextPattern for char {
    fn first_match(&self, haystack: &str) -> Option<Range<usize>> {
        let start = haystack.find(*self)?;
        Some(start..start + self.len_utf8())
    }
}

impl<P: TextPattern + ?Sized> TextPattern for &P {
    fn first_match(&self, haystack: &str) -> Option<Range<usize>> {
        (**self).first_match(haystack)
    }
}

#[cfg(feature = "regex")]
impl TextPattern for regex::Regex {
    fn first_match(&self, haystack: &str) -> Option<Range<usize>> {
        self.find(haystack).map(|m| m.range())
    }
}

/// Spans of the first match of `pattern` in each leaf under `root`, in document order.
///
/// Every leaf is probed on its own, so a match that would straddle two
/// adjacent leaves is not found. Leaves without a match contribute nothing.
///
/// ```rust
/// use understory_text_range::find_pattern_spans;
/// use understory_text_tree::Tree;
///
/// let (tree, p) = Tree::parse_markup("<p>cat<b>concat</b>dog</p>").unwrap();
/// let spans = find_pattern_spans(&tree, p, "cat");
/// assert_eq!(spans.len(), 2);
/// assert_eq!(spans[1].start().offset, 3);
/// assert_eq!(spans[1].end().offset, 6);
/// ```
pub fn find_pattern_spans<T, P>(tree: &T, root: T::Node, pattern: &P) -> Vec<Span<T::Node>>
where
    T: TextTree,
    P: TextPattern + ?Sized,
{
    let filter = TextFilter::new();
    walk(tree, root, &filter)
        .filter_map(|leaf| {
            let Some(NodeRef::Leaf(text)) = tree.node(leaf) else {
                return None;
            };
            let found = pattern.first_match(text)?;
            Some(Span::within_leaf(leaf, found.start, found.end))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use understory_text_tree::Tree;

    use super::*;
    use crate::testing::{fixture, leaf};

    fn ranges(spans: &[Span<understory_text_tree::NodeId>]) -> Vec<(usize, usize)> {
        spans
            .iter()
            .map(|s| (s.start().offset, s.end().offset))
            .collect()
    }

    #[test]
    fn one_span_per_matching_leaf() {
        let (tree, p) = fixture("<p>banana<i>nab</i>xyz</p>");
        let spans = find_pattern_spans(&tree, p, "na");
        assert_eq!(ranges(&spans), vec![(2, 4), (0, 2)]);
        assert_eq!(spans[0].start().node, leaf(&tree, p, "banana"));
        assert_eq!(spans[1].end().node, leaf(&tree, p, "nab"));
        assert!(spans.iter().all(|s| s.start().node == s.end().node));
    }

    #[test]
    fn matches_never_span_leaves() {
        let mut tree = Tree::new();
        let p = tree.insert_element(None, "p");
        for part in ["aa", "b", "aa"] {
            tree.insert_text(Some(p), part);
        }
        assert!(find_pattern_spans(&tree, p, "aba").is_empty());
        assert_eq!(find_pattern_spans(&tree, p, "a").len(), 2);
    }

    #[test]
    fn excluded_nothing_when_searching() {
        let (tree, p) = fixture("<p><script>needle</script><a>needle</a></p>");
        assert_eq!(find_pattern_spans(&tree, p, &String::from("needle")).len(), 2);
    }

    #[test]
    fn char_patterns_measure_utf8_length() {
        let (tree, p) = fixture("<p>caf\u{e9}!</p>");
        let spans = find_pattern_spans(&tree, p, &'\u{e9}');
        assert_eq!(ranges(&spans), vec![(3, 5)]);
    }

    #[test]
    fn found_spans_are_valid_spans() {
        let (tree, p) = fixture("<p>one<b>two</b></p>");
        for span in find_pattern_spans(&tree, p, "o") {
            let checked = Span::new(&tree, span.start(), span.end()).unwrap();
            assert_eq!(checked, span);
            assert!(span.intersects(&tree, span.start().node));
        }
    }

    #[test]
    fn leaf_root_is_probed_alone() {
        let (tree, p) = fixture("<p>abc<b>abc</b></p>");
        let first = leaf(&tree, p, "abc");
        assert_eq!(find_pattern_spans(&tree, first, "b").len(), 1);
    }

    #[cfg(feature = "regex")]
    #[test]
    fn regex_patterns_report_first_match_only() {
        let (tree, p) = fixture("<p>a1b22c333<i>none</i>x4</p>");
        let digits = regex::Regex::new(r"\d+").unwrap();
        let spans = find_pattern_spans(&tree, p, &digits);
        assert_eq!(ranges(&spans), vec![(1, 2), (1, 2)]);
    }
}
