// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wrapping part of a text leaf in a container, and undoing it.
//!
//! ## Wrapping
//!
//! [`wrap_leaf`] splits a leaf at up to two offsets and moves the middle piece
//! into a deep clone of a template container, placed where the piece was:
//!
//! ```text
//! <p>wrap me</p>  --wrap_leaf(1, 4)-->  <p>w<mark>rap</mark> me</p>
//! ```
//!
//! The leaf keeps its identity as the head piece; the pieces before and after
//! are only created when the offsets are not at the edges.
//!
//! ## Undo
//!
//! Undo is a value, not a callback: an [`Unwrap`] records the wrapper and the
//! parent it was inserted into, and [`Undo`] is an ordered list of them.
//! Undoing moves the wrapper's first child back to the wrapper's position and
//! removes the wrapper. Split pieces are not merged back together; the
//! serialized content is restored, and a host-side normalize pass restores the
//! exact node structure when needed.

use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

use crate::types::{NodeRef, TextTreeMut};

/// Errors produced by [`wrap_leaf`] and the span wrappers.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum WrapError {
    /// The caller passed a start offset greater than the end offset.
    #[error("start offset {start} is past end offset {end}")]
    OffsetsOutOfOrder {
        /// Requested start offset.
        start: usize,
        /// Requested end offset.
        end: usize,
    },
    /// An offset splits a multi-byte character.
    #[error("offset {offset} is not on a character boundary")]
    NotCharBoundary {
        /// The offending offset, after clamping.
        offset: usize,
    },
    /// The leaf has no parent, so there is nowhere to put the wrapper.
    #[error("text leaf has no parent to hold the wrapper")]
    Detached,
    /// The template is not a live container.
    #[error("wrapper template is not a live container")]
    TemplateNotContainer,
}

/// Reverses exactly one wrap.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Unwrap<N> {
    wrapper: N,
    parent: N,
}

impl<N: Copy + Eq + core::fmt::Debug> Unwrap<N> {
    /// The container inserted by the wrap.
    pub fn wrapper(&self) -> N {
        self.wrapper
    }

    /// The parent the wrapper was inserted into.
    pub fn parent(&self) -> N {
        self.parent
    }

    /// Undo the wrap. Returns false (and does nothing) if the wrapper is no
    /// longer a child of its original parent, e.g. because it was already undone.
    pub fn undo<T: TextTreeMut<Node = N>>(&self, tree: &mut T) -> bool {
        if tree.parent(self.wrapper) != Some(self.parent) {
            return false;
        }
        if let Some(content) = tree.first_child(self.wrapper) {
            tree.insert_before(self.parent, content, Some(self.wrapper));
        }
        tree.remove(self.wrapper);
        debug!(wrapper = ?self.wrapper, parent = ?self.parent, "unwrapped");
        true
    }
}

/// An ordered set of [`Unwrap`]s, undone front to back.
///
/// An empty `Undo` is inert: undoing it does nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Undo<N> {
    steps: SmallVec<[Unwrap<N>; 1]>,
}

impl<N> Default for Undo<N> {
    fn default() -> Self {
        Self {
            steps: SmallVec::new(),
        }
    }
}

impl<N: Copy + Eq + core::fmt::Debug> Undo<N> {
    /// An inert undo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of wraps this undo reverses.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true for an inert undo.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The recorded steps, in undo order.
    pub fn steps(&self) -> &[Unwrap<N>] {
        &self.steps
    }

    /// Append one step.
    pub fn push(&mut self, step: Unwrap<N>) {
        self.steps.push(step);
    }

    /// Append all steps of `other`, after the steps already recorded.
    pub fn append(&mut self, other: Self) {
        self.steps.extend(other.steps);
    }

    /// Undo every recorded wrap, in order. Returns how many were actually undone.
    ///
    /// Steps that were already undone are skipped, so calling this twice is harmless.
    pub fn undo<T: TextTreeMut<Node = N>>(&self, tree: &mut T) -> usize {
        self.steps.iter().filter(|step| step.undo(tree)).count()
    }
}

impl<N> From<Unwrap<N>> for Undo<N> {
    fn from(step: Unwrap<N>) -> Self {
        let mut steps = SmallVec::new();
        steps.push(step);
        Self { steps }
    }
}

/// Wrap `[start, end)` of `leaf` in a deep clone of `template`.
///
/// - If `leaf` is not a live leaf, nothing happens and an inert [`Undo`] is returned.
/// - `start` defaults to 0 and `end` to the content length. When both are
///   given and `start > end`, this fails with [`WrapError::OffsetsOutOfOrder`].
///   Each offset is then clamped to the content length.
/// - Empty leaves and empty ranges still get a (possibly empty) wrapper.
///
/// All checks run before the tree is touched, so an error leaves the tree unchanged.
///
/// ```rust
/// use understory_text_range::wrap_leaf;
/// use understory_text_tree::Tree;
///
/// let (mut tree, p) = Tree::parse_markup("<p>wrap me</p>").unwrap();
/// let text = tree.children_of(p)[0];
/// let mark = tree.insert_element(None, "mark");
///
/// let undo = wrap_leaf(&mut tree, text, mark, Some(1), Some(4)).unwrap();
/// assert_eq!(tree.to_markup(p), "<p>w<mark>rap</mark> me</p>");
///
/// undo.undo(&mut tree);
/// assert_eq!(tree.to_markup(p), "<p>wrap me</p>");
/// ```
pub fn wrap_leaf<T: TextTreeMut>(
    tree: &mut T,
    leaf: T::Node,
    template: T::Node,
    start: Option<usize>,
    end: Option<usize>,
) -> Result<Undo<T::Node>, WrapError> {
    let Some(NodeRef::Leaf(text)) = tree.node(leaf) else {
        return Ok(Undo::new());
    };
    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        return Err(WrapError::OffsetsOutOfOrder { start, end });
    }
    let len = text.len();
    let start = start.unwrap_or(0).min(len);
    let end = end.unwrap_or(len).min(len);
    for offset in [start, end] {
        if !text.is_char_boundary(offset) {
            return Err(WrapError::NotCharBoundary { offset });
        }
    }
    if !matches!(tree.node(template), Some(NodeRef::Container(_))) {
        return Err(WrapError::TemplateNotContainer);
    }
    let Some(parent) = tree.parent(leaf) else {
        return Err(WrapError::Detached);
    };

    let target = if start > 0 {
        tree.split_text(leaf, start)
            .ok_or(WrapError::NotCharBoundary { offset: start })?
    } else {
        leaf
    };
    if end < len {
        tree.split_text(target, end - start)
            .ok_or(WrapError::NotCharBoundary { offset: end })?;
    }
    let wrapper = tree
        .clone_subtree(template)
        .ok_or(WrapError::TemplateNotContainer)?;
    let first = tree.first_child(wrapper);
    tree.insert_before(parent, wrapper, Some(target));
    tree.insert_before(wrapper, target, first);
    debug!(?leaf, ?wrapper, start, end, "wrapped text leaf");

    Ok(Unwrap { wrapper, parent }.into())
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use proptest::prelude::*;
    use understory_text_tree::Tree;

    use super::*;
    use crate::testing::fixture;

    fn mark(tree: &mut Tree) -> understory_text_tree::NodeId {
        tree.insert_element(None, "mark")
    }

    #[test]
    fn wraps_a_strict_sub_range_into_three_siblings() {
        let (mut tree, p) = fixture("<p>wrap me</p>");
        let text = tree.children_of(p)[0];
        let template = mark(&mut tree);

        let undo = wrap_leaf(&mut tree, text, template, Some(1), Some(4)).unwrap();

        let children = tree.children_of(p).to_vec();
        assert_eq!(children.len(), 3);
        assert_eq!(tree.text_of(children[0]), Some("w"));
        assert_eq!(children[0], text, "the leaf keeps the head piece");
        assert_eq!(tree.tag_of(children[1]), Some("mark"));
        assert_eq!(tree.text_content(children[1]), "rap");
        assert_eq!(tree.text_of(children[2]), Some(" me"));
        assert_eq!(undo.len(), 1);
        assert_eq!(undo.steps()[0].wrapper(), children[1]);
        assert_eq!(undo.steps()[0].parent(), p);
    }

    #[test]
    fn full_wrap_replaces_leaf_in_place() {
        let (mut tree, p) = fixture("<p>a<b>x</b>c</p>");
        let a = tree.children_of(p)[0];
        let template = mark(&mut tree);

        wrap_leaf(&mut tree, a, template, None, None).unwrap();

        assert_eq!(tree.children_of(p).len(), 3);
        assert_eq!(tree.to_markup(p), "<p><mark>a</mark><b>x</b>c</p>");
        assert_eq!(tree.parent_of(a).and_then(|w| tree.tag_of(w)), Some("mark"));
    }

    #[test]
    fn edge_offsets_omit_empty_pieces() {
        let (mut tree, p) = fixture("<p>abcdef</p>");
        let text = tree.children_of(p)[0];
        let template = mark(&mut tree);
        wrap_leaf(&mut tree, text, template, Some(0), Some(2)).unwrap();
        assert_eq!(tree.children_of(p).len(), 2);
        assert_eq!(tree.to_markup(p), "<p><mark>ab</mark>cdef</p>");

        let tail = tree.children_of(p)[1];
        wrap_leaf(&mut tree, tail, template, Some(2), None).unwrap();
        assert_eq!(tree.children_of(p).len(), 3);
        assert_eq!(tree.to_markup(p), "<p><mark>ab</mark>cd<mark>ef</mark></p>");
    }

    #[test]
    fn empty_leaf_still_gets_a_wrapper() {
        let mut tree = Tree::new();
        let p = tree.insert_element(None, "p");
        let empty = tree.insert_text(Some(p), "");
        let template = mark(&mut tree);
        let undo = wrap_leaf(&mut tree, empty, template, None, None).unwrap();
        assert_eq!(undo.len(), 1);
        assert_eq!(tree.to_markup(p), "<p><mark></mark></p>");
    }

    #[test]
    fn non_leaf_target_is_a_no_op() {
        let (mut tree, p) = fixture("<p>x</p>");
        let template = mark(&mut tree);
        let before = tree.to_markup(p);
        let undo = wrap_leaf(&mut tree, p, template, None, None).unwrap();
        assert!(undo.is_empty());
        assert_eq!(undo.undo(&mut tree), 0);
        assert_eq!(tree.to_markup(p), before);
    }

    #[test]
    fn out_of_order_offsets_fail_before_clamping() {
        let (mut tree, p) = fixture("<p>wrap me</p>");
        let text = tree.children_of(p)[0];
        let template = mark(&mut tree);
        assert_eq!(
            wrap_leaf(&mut tree, text, template, Some(20), Some(10)),
            Err(WrapError::OffsetsOutOfOrder { start: 20, end: 10 })
        );
        assert_eq!(tree.to_markup(p), "<p>wrap me</p>");
    }

    #[test]
    fn single_sided_offsets_are_clamped() {
        let (mut tree, p) = fixture("<p>wrap me</p>");
        let text = tree.children_of(p)[0];
        let template = mark(&mut tree);
        wrap_leaf(&mut tree, text, template, Some(5), Some(99)).unwrap();
        assert_eq!(tree.to_markup(p), "<p>wrap <mark>me</mark></p>");
    }

    #[test]
    fn rejects_offsets_inside_a_character() {
        let (mut tree, p) = fixture("<p>h\u{e9}</p>");
        let text = tree.children_of(p)[0];
        let template = mark(&mut tree);
        assert_eq!(
            wrap_leaf(&mut tree, text, template, Some(2), None),
            Err(WrapError::NotCharBoundary { offset: 2 })
        );
        assert_eq!(tree.children_of(p).len(), 1);
    }

    #[test]
    fn rejects_detached_leaves_and_leaf_templates() {
        let mut tree = Tree::new();
        let loose = tree.insert_text(None, "loose");
        let template = mark(&mut tree);
        assert_eq!(
            wrap_leaf(&mut tree, loose, template, None, None),
            Err(WrapError::Detached)
        );

        let (mut tree, p) = fixture("<p>x</p>");
        let text = tree.children_of(p)[0];
        let bad_template = tree.insert_text(None, "not a container");
        assert_eq!(
            wrap_leaf(&mut tree, text, bad_template, None, None),
            Err(WrapError::TemplateNotContainer)
        );
    }

    #[test]
    fn template_is_cloned_not_moved() {
        let (mut tree, p) = fixture("<p>ab</p>");
        let text = tree.children_of(p)[0];
        let template = mark(&mut tree);
        let first = wrap_leaf(&mut tree, text, template, Some(0), Some(1)).unwrap();
        let second_leaf = tree.children_of(p)[1];
        let second = wrap_leaf(&mut tree, second_leaf, template, None, None).unwrap();
        assert_ne!(first.steps()[0].wrapper(), second.steps()[0].wrapper());
        assert_ne!(first.steps()[0].wrapper(), template);
        assert_eq!(tree.parent_of(template), None);
        assert!(tree.children_of(template).is_empty());
    }

    #[test]
    fn template_children_stay_after_wrapped_text() {
        let (mut tree, p) = fixture("<p>x</p>");
        let text = tree.children_of(p)[0];
        let template = tree.insert_element(None, "label");
        tree.insert_element(Some(template), "icon");
        let undo = wrap_leaf(&mut tree, text, template, None, None).unwrap();
        assert_eq!(tree.to_markup(p), "<p><label>x<icon></icon></label></p>");
        undo.undo(&mut tree);
        assert_eq!(tree.to_markup(p), "<p>x</p>");
    }

    #[test]
    fn undo_restores_and_double_undo_is_a_no_op() {
        let (mut tree, p) = fixture("<p>wrap me</p>");
        let text = tree.children_of(p)[0];
        let template = mark(&mut tree);
        let undo = wrap_leaf(&mut tree, text, template, Some(1), Some(4)).unwrap();
        let wrapper = undo.steps()[0].wrapper();

        assert_eq!(undo.undo(&mut tree), 1);
        assert_eq!(tree.to_markup(p), "<p>wrap me</p>");
        assert!(!tree.is_alive(wrapper), "the wrapper is removed");

        assert_eq!(undo.undo(&mut tree), 0);
        assert_eq!(tree.to_markup(p), "<p>wrap me</p>");

        tree.normalize(p);
        assert_eq!(tree.children_of(p), &[text]);
        assert_eq!(tree.text_of(text), Some("wrap me"));
    }

    #[test]
    fn independent_wraps_on_one_leaf_undo_in_any_order() {
        for reverse in [false, true] {
            let (mut tree, p) = fixture("<p>abcdef</p>");
            let text = tree.children_of(p)[0];
            let template = mark(&mut tree);
            let first = wrap_leaf(&mut tree, text, template, Some(0), Some(2)).unwrap();
            let tail = tree.children_of(p)[1];
            let second = wrap_leaf(&mut tree, tail, template, Some(2), Some(4)).unwrap();
            assert_eq!(tree.to_markup(p), "<p><mark>ab</mark>cd<mark>ef</mark></p>");

            let order = if reverse { [&second, &first] } else { [&first, &second] };
            for undo in order {
                assert_eq!(undo.undo(&mut tree), 1);
            }
            assert_eq!(tree.to_markup(p), "<p>abcdef</p>");
            tree.normalize(p);
            assert_eq!(tree.children_of(p).len(), 1);
        }
    }

    #[test]
    fn undo_after_wrapper_moved_is_a_no_op() {
        let (mut tree, p) = fixture("<p>x</p>");
        let text = tree.children_of(p)[0];
        let template = mark(&mut tree);
        let undo = wrap_leaf(&mut tree, text, template, None, None).unwrap();
        let wrapper = undo.steps()[0].wrapper();
        tree.detach(wrapper);
        assert_eq!(undo.undo(&mut tree), 0);
        assert!(tree.is_alive(wrapper));
    }

    #[test]
    fn composite_undo_appends_in_order() {
        let (mut tree, p) = fixture("<p>ab</p>");
        let template = mark(&mut tree);
        let text = tree.children_of(p)[0];
        let mut all = Undo::new();
        all.append(wrap_leaf(&mut tree, text, template, Some(1), None).unwrap());
        all.append(wrap_leaf(&mut tree, text, template, None, None).unwrap());
        assert_eq!(all.len(), 2);
        assert_eq!(tree.to_markup(p), "<p><mark>a</mark><mark>b</mark></p>");
        assert_eq!(all.undo(&mut tree), 2);
        assert_eq!(tree.to_markup(p), "<p>ab</p>");
    }

    proptest! {
        #[test]
        fn wrap_then_undo_restores_markup(
            text in "[a-z \u{e9}\u{1f600}]{0,12}",
            a in 0_usize..16,
            b in 0_usize..16,
        ) {
            let mut tree = Tree::new();
            let p = tree.insert_element(None, "p");
            tree.insert_text(Some(p), "before");
            let leaf = tree.insert_text(Some(p), text.clone());
            tree.insert_element(Some(p), "br");
            let template = tree.insert_element(None, "mark");
            let original = tree.to_markup(p);

            // Snap arbitrary numbers onto char boundaries.
            let bounds: vec::Vec<usize> = text
                .char_indices()
                .map(|(i, _)| i)
                .chain([text.len()])
                .collect();
            let (start, end) = {
                let x = bounds[a % bounds.len()];
                let y = bounds[b % bounds.len()];
                (x.min(y), x.max(y))
            };

            let undo = wrap_leaf(&mut tree, leaf, template, Some(start), Some(end)).unwrap();
            let wrapper = undo.steps()[0].wrapper();
            prop_assert_eq!(tree.text_content(wrapper), String::from(&text[start..end]));
            prop_assert_eq!(tree.text_content(p), alloc::format!("before{text}"));

            prop_assert_eq!(undo.undo(&mut tree), 1);
            prop_assert_eq!(tree.to_markup(p), original);
            // The leaf merges back into the text before it.
            tree.normalize(p);
            prop_assert_eq!(tree.children_of(p).len(), 2);
            prop_assert_eq!(tree.text_content(p), alloc::format!("before{text}"));
        }
    }
}
