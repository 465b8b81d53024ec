// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host trait implementations for Understory Text Tree.
//!
//! ## Feature
//!
//! Enable with `text_tree_adapter`.
//!
//! ## Notes
//!
//! Child lists are stored as vectors in the arena, so the provided
//! [`TextTree`] methods that would otherwise walk siblings are overridden with
//! direct lookups.

use understory_text_tree::{NodeData, NodeId, Tree};

use crate::types::{NodeRef, TextTree, TextTreeMut};

impl TextTree for Tree {
    type Node = NodeId;

    fn node(&self, node: NodeId) -> Option<NodeRef<'_>> {
        Some(match self.data(node)? {
            NodeData::Element { tag } => NodeRef::Container(tag),
            NodeData::Text(text) => NodeRef::Leaf(text),
        })
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent_of(node)
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.children_of(node).first().copied()
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        Self::next_sibling(self, node)
    }

    fn child_index(&self, node: NodeId) -> Option<usize> {
        self.index_in_parent(node)
    }

    fn child_count(&self, node: NodeId) -> usize {
        self.children_of(node).len()
    }
}

impl TextTreeMut for Tree {
    fn split_text(&mut self, leaf: NodeId, offset: usize) -> Option<NodeId> {
        Self::split_text(self, leaf, offset)
    }

    fn clone_subtree(&mut self, node: NodeId) -> Option<NodeId> {
        self.deep_clone(node)
    }

    fn insert_before(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) {
        Self::insert_before(self, parent, node, reference);
    }

    fn remove(&mut self, node: NodeId) {
        Self::remove(self, node);
    }
}
