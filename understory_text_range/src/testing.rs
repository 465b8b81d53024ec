// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for unit tests.

use alloc::vec::Vec;

use understory_text_tree::{NodeId, Tree};

use crate::types::TextFilter;
use crate::walk::walk;

/// Parse `markup` into a fresh tree.
pub(crate) fn fixture(markup: &str) -> (Tree, NodeId) {
    Tree::parse_markup(markup).expect("fixture markup parses")
}

/// First leaf under `root` whose content is `text`.
pub(crate) fn leaf(tree: &Tree, root: NodeId, text: &str) -> NodeId {
    let filter = TextFilter::new();
    walk(tree, root, &filter)
        .find(|&n| tree.text_of(n) == Some(text))
        .expect("fixture has a leaf with this text")
}

/// Contents of `leaves`, in order.
pub(crate) fn texts(tree: &Tree, leaves: impl IntoIterator<Item = NodeId>) -> Vec<&str> {
    leaves
        .into_iter()
        .map(|n| tree.text_of(n).unwrap_or_default())
        .collect()
}
