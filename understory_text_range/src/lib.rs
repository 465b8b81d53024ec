// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_text_range --heading-base-level=0

//! Understory Text Range: locate, wrap, and search the text leaves a span touches.
//!
//! ## Overview
//!
//! Rich text lives in trees of containers (elements) and text leaves. Highlighting a selection,
//! marking search hits, or applying inline formatting all reduce to the same steps: find the
//! leaves a span covers, cut the boundary leaves at the span's offsets, and wrap each covered
//! piece in a fresh container. This crate does those steps over any host tree, and hands back an
//! [`Undo`] value that reverses them.
//!
//! The crate does not own a tree. Hosts implement [`TextTree`] (and [`TextTreeMut`] for
//! wrapping) with their own node handles. [`understory_text_tree`] is the reference host, wired
//! up by the `text_tree_adapter` feature.
//!
//! ## Pieces
//!
//! - [`walk`]: lazy pre-order walk over the text leaves of a subtree, pruning
//!   containers whose tag is in a [`TextFilter`].
//! - [`get_leaves_in_span`] / [`get_leaves_in_selection`]: the leaves a [`Span`] (or a
//!   list of spans) intersects, in document order.
//! - [`wrap_leaf`]: wrap `[start, end)` of one leaf in a clone of a template container.
//! - [`wrap_span`] / [`wrap_selection`]: wrap every located leaf, with span offsets
//!   applied at the boundary leaves and an optional per-leaf predicate.
//! - [`find_pattern_spans`]: the first match of a [`TextPattern`] in each leaf, as spans.
//!
//! Spans are built from [`BoundaryPoint`]s, `(node, offset)` pairs where the offset is a byte
//! offset for leaves and a child index for containers, and are validated on construction.
//!
//! ## Example
//!
//! ```rust
//! use understory_text_range::{Span, TextFilter, find_pattern_spans, wrap_selection, wrap_span};
//! use understory_text_tree::Tree;
//!
//! let (mut tree, p) = Tree::parse_markup("<p>Hello <a>link</a> world</p>").unwrap();
//! let mark = tree.insert_element(None, "mark");
//!
//! // Highlight all text of the paragraph except what sits inside links.
//! let span = Span::covering(&tree, p).unwrap();
//! let filter = TextFilter::new().exclude("a");
//! let undo = wrap_span(&mut tree, span, mark, &filter, |_, _| true).unwrap();
//! assert_eq!(tree.to_markup(p), "<p><mark>Hello </mark><a>link</a><mark> world</mark></p>");
//!
//! undo.undo(&mut tree);
//! assert_eq!(tree.to_markup(p), "<p>Hello <a>link</a> world</p>");
//!
//! // Mark search hits.
//! let hits = find_pattern_spans(&tree, p, "l");
//! let undo = wrap_selection(&mut tree, &hits, mark, &TextFilter::new(), |_, _| true).unwrap();
//! assert_eq!(undo.len(), 3);
//! assert_eq!(
//!     tree.to_markup(p),
//!     "<p>He<mark>l</mark>lo <a><mark>l</mark>ink</a> wor<mark>l</mark>d</p>"
//! );
//! ```
//!
//! ## Features
//!
//! - `text_tree_adapter` (default): implements the host traits for [`understory_text_tree::Tree`].
//! - `regex` (default): [`regex::Regex`] implements [`TextPattern`].
//!
//! Wraps and undos emit `tracing` events at `debug` level; rolled back wraps emit a `warn`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod adapters;
mod find;
mod locate;
mod range_wrap;
mod span;
mod types;
mod walk;
mod wrap;

#[cfg(test)]
mod testing;

pub use find::{TextPattern, find_pattern_spans};
pub use locate::{get_leaves_in_selection, get_leaves_in_span};
pub use range_wrap::{wrap_selection, wrap_span};
pub use span::{BoundaryPoint, Span, SpanError, compare_points};
pub use types::{NodeRef, TextFilter, TextTree, TextTreeMut};
pub use walk::{TextLeaves, walk};
pub use wrap::{Undo, Unwrap, WrapError, wrap_leaf};
