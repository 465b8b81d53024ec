// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the text tree: node identifiers and node payloads.

use alloc::string::String;

/// Identifier for a node in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Payload of a node: either a tagged container or a run of character data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeData {
    /// Container node with ordered children.
    Element {
        /// Tag name, e.g. `"p"` or `"strong"`.
        tag: String,
    },
    /// Leaf node holding UTF-8 character data. Text nodes never have children.
    Text(String),
}

impl NodeData {
    /// Convenience constructor for [`NodeData::Element`].
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element { tag: tag.into() }
    }

    /// Convenience constructor for [`NodeData::Text`].
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Returns true for text nodes.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Returns true for element nodes.
    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element { .. })
    }
}
