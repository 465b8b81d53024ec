// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filtered pre-order traversal over the text leaves of a subtree.

use core::iter::FusedIterator;

use crate::types::{NodeRef, TextFilter, TextTree};

/// Walk the text leaves under `root` in document order.
///
/// - Containers whose tag `filter` excludes are skipped together with their
///   whole subtree. This includes `root` itself.
/// - A container `root` with an excluded ancestor yields nothing.
/// - A leaf `root` yields exactly itself, whatever its ancestors.
/// - Every other leaf is yielded, empty ones included.
/// - A stale `root` yields nothing.
///
/// The iterator is lazy and borrows the tree, so the tree cannot change while
/// a walk is in flight. Each call (or `clone`) starts a fresh traversal.
pub fn walk<'a, T: TextTree>(tree: &'a T, root: T::Node, filter: &'a TextFilter) -> TextLeaves<'a, T> {
    let cursor = match tree.node(root) {
        Some(NodeRef::Container(_)) if !filter.is_empty() && tree.has_ancestor_tag(root, filter) => {
            None
        }
        Some(_) => Some(root),
        None => None,
    };
    TextLeaves {
        tree,
        root,
        filter,
        cursor,
    }
}

/// Iterator returned by [`walk`].
pub struct TextLeaves<'a, T: TextTree> {
    tree: &'a T,
    root: T::Node,
    filter: &'a TextFilter,
    cursor: Option<T::Node>,
}

impl<T: TextTree> Clone for TextLeaves<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            root: self.root,
            filter: self.filter,
            cursor: self.cursor,
        }
    }
}

impl<T: TextTree> core::fmt::Debug for TextLeaves<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TextLeaves")
            .field("root", &self.root)
            .field("cursor", &self.cursor)
            .field("filter", self.filter)
            .finish_non_exhaustive()
    }
}

impl<T: TextTree> TextLeaves<'_, T> {
    /// Next node in pre-order after the subtree of `node`, staying inside `root`.
    fn skip_subtree(&self, mut node: T::Node) -> Option<T::Node> {
        loop {
            if node == self.root {
                return None;
            }
            if let Some(next) = self.tree.next_sibling(node) {
                return Some(next);
            }
            node = self.tree.parent(node)?;
        }
    }
}

impl<T: TextTree> Iterator for TextLeaves<'_, T> {
    type Item = T::Node;

    fn next(&mut self) -> Option<T::Node> {
        let tree = self.tree;
        while let Some(node) = self.cursor {
            match tree.node(node) {
                Some(NodeRef::Leaf(_)) => {
                    self.cursor = self.skip_subtree(node);
                    return Some(node);
                }
                Some(NodeRef::Container(tag)) if self.filter.excludes(tag) => {
                    self.cursor = self.skip_subtree(node);
                }
                Some(NodeRef::Container(_)) => {
                    self.cursor = tree
                        .first_child(node)
                        .or_else(|| self.skip_subtree(node));
                }
                None => self.cursor = None,
            }
        }
        None
    }
}

impl<T: TextTree> FusedIterator for TextLeaves<'_, T> {}
