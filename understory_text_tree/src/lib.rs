// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_text_tree --heading-base-level=0

//! Understory Text Tree: a small, generational tree of elements and text.
//!
//! Understory Text Tree is an in-memory stand-in for a document tree: elements carry a tag and
//! ordered children, text nodes carry UTF-8 character data and never have children.
//! It is the reference host for [`understory_text_range`](https://docs.rs/understory_text_range),
//! and is also handy on its own for tests and tools that need a DOM-shaped structure without a browser.
//!
//! - Nodes are addressed by generational [`NodeId`]s, so stale handles are detected instead of aliased.
//! - Structural edits (insert before, detach, remove, deep clone, split text, normalize) apply immediately.
//! - A tiny markup format ([`Tree::parse_markup`] / [`Tree::to_markup`]) makes fixtures readable.
//!
//! ## API overview
//!
//! - [`Tree`]: the arena holding all nodes.
//! - [`NodeData`]: payload of a node, [`NodeData::Element`] or [`NodeData::Text`].
//! - [`NodeId`]: generational handle of a node.
//! - [`MarkupError`]: errors from [`Tree::parse_markup`].
//!
//! Key operations:
//! - [`Tree::insert`](Tree::insert) / [`Tree::insert_element`](Tree::insert_element) /
//!   [`Tree::insert_text`](Tree::insert_text) → [`NodeId`]
//! - [`Tree::insert_before`](Tree::insert_before), [`Tree::reparent`](Tree::reparent),
//!   [`Tree::detach`](Tree::detach), [`Tree::remove`](Tree::remove)
//! - [`Tree::split_text`](Tree::split_text) and [`Tree::deep_clone`](Tree::deep_clone)
//! - [`Tree::normalize`](Tree::normalize) merges adjacent text nodes, as `Node.normalize()` does in the DOM.
//! - [`Tree::next_depth_first`](Tree::next_depth_first) provides depth-first tree traversal.
//!
//! ## Example
//!
//! ```rust
//! use understory_text_tree::Tree;
//!
//! let (mut tree, p) = Tree::parse_markup("<p>wrap me</p>").unwrap();
//! let text = tree.children_of(p)[0];
//!
//! // Split "wrap me" into "w" | "rap" | " me" and move the middle into a <b>.
//! let after = tree.split_text(text, 4).unwrap();
//! let middle = tree.split_text(text, 1).unwrap();
//! let b = tree.insert_element(None, "b");
//! tree.insert_before(p, b, Some(after));
//! tree.reparent(middle, Some(b));
//!
//! assert_eq!(tree.to_markup(p), "<p>w<b>rap</b> me</p>");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod markup;
mod tree;
mod types;

pub use markup::MarkupError;
pub use tree::Tree;
pub use types::{NodeData, NodeId};
