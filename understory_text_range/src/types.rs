// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host capability traits and the tag exclusion filter.
//!
//! The engine never touches a concrete tree type. A host exposes its tree
//! through [`TextTree`] (navigation and discrimination) and, for wrapping,
//! [`TextTreeMut`] (the handful of structural edits a wrap needs).

use alloc::string::String;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashSet;

/// Read-only view of a single node, as reported by a host tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeRef<'a> {
    /// A text leaf and its character data.
    Leaf(&'a str),
    /// A container and its tag.
    Container(&'a str),
}

/// Read access to a host tree of containers and text leaves.
///
/// Offsets into a leaf are byte offsets into its UTF-8 content. Offsets into a
/// container are child indices.
///
/// Only the four required methods are needed; the provided ones derive from
/// them and may be overridden when the host has a faster answer.
pub trait TextTree {
    /// Node handle. The host owns the nodes; handles are small copyable ids.
    type Node: Copy + Eq + Hash + Debug;

    /// Discriminate a node, or `None` if the handle is stale.
    fn node(&self, node: Self::Node) -> Option<NodeRef<'_>>;

    /// Parent of a node, or `None` for roots and stale handles.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// First child of a container.
    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;

    /// Sibling directly after `node`.
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// Position of `node` among its parent's children.
    fn child_index(&self, node: Self::Node) -> Option<usize> {
        let parent = self.parent(node)?;
        let mut child = self.first_child(parent);
        let mut index = 0;
        while let Some(c) = child {
            if c == node {
                return Some(index);
            }
            index += 1;
            child = self.next_sibling(c);
        }
        None
    }

    /// Number of children of `node`.
    fn child_count(&self, node: Self::Node) -> usize {
        let mut count = 0;
        let mut child = self.first_child(node);
        while let Some(c) = child {
            count += 1;
            child = self.next_sibling(c);
        }
        count
    }

    /// Length of a node: content length in bytes for a leaf, child count for a container.
    fn node_len(&self, node: Self::Node) -> usize {
        match self.node(node) {
            Some(NodeRef::Leaf(text)) => text.len(),
            Some(NodeRef::Container(_)) => self.child_count(node),
            None => 0,
        }
    }

    /// Returns true if `node` is a live leaf.
    fn is_leaf(&self, node: Self::Node) -> bool {
        matches!(self.node(node), Some(NodeRef::Leaf(_)))
    }

    /// Returns true if any proper ancestor of `node` is a container whose tag `filter` excludes.
    fn has_ancestor_tag(&self, node: Self::Node, filter: &TextFilter) -> bool {
        let mut current = self.parent(node);
        while let Some(n) = current {
            if let Some(NodeRef::Container(tag)) = self.node(n)
                && filter.excludes(tag)
            {
                return true;
            }
            current = self.parent(n);
        }
        false
    }
}

/// The structural edits needed to wrap and unwrap text leaves.
pub trait TextTreeMut: TextTree {
    /// Split a leaf at a byte offset.
    ///
    /// The leaf keeps `[0, offset)`; a new leaf holding the rest is inserted
    /// directly after it and returned. Returns `None` if `leaf` is not a live
    /// leaf or `offset` is not a valid `char` boundary of its content.
    fn split_text(&mut self, leaf: Self::Node, offset: usize) -> Option<Self::Node>;

    /// Deep-clone the subtree rooted at `node`. The copy starts out detached.
    fn clone_subtree(&mut self, node: Self::Node) -> Option<Self::Node>;

    /// Move `node` under `parent`, directly before `reference` (or last if `None`).
    fn insert_before(&mut self, parent: Self::Node, node: Self::Node, reference: Option<Self::Node>);

    /// Remove `node` and its subtree from the tree.
    fn remove(&mut self, node: Self::Node);
}

/// Container tags whose subtrees are pruned from traversal.
///
/// The default filter excludes nothing, which behaves exactly like passing no
/// filter at all. Tags are compared verbatim (case-sensitive).
///
/// ```rust
/// use understory_text_range::TextFilter;
///
/// let filter = TextFilter::new().exclude("script").exclude("style");
/// assert!(filter.excludes("script"));
/// assert!(!filter.excludes("p"));
/// assert!(TextFilter::default().is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextFilter {
    excluded: HashSet<String>,
}

impl TextFilter {
    /// Create a filter that excludes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter from a list of tags.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Also exclude subtrees under `tag`.
    pub fn exclude(mut self, tag: impl Into<String>) -> Self {
        self.excluded.insert(tag.into());
        self
    }

    /// Returns true if containers tagged `tag` are pruned.
    pub fn excludes(&self, tag: &str) -> bool {
        self.excluded.contains(tag)
    }

    /// Returns true if the filter excludes nothing.
    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TextFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_tags(iter)
    }
}
