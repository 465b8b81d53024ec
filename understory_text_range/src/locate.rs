// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text leaves touched by a span or a selection.

use crate::span::Span;
use crate::types::{TextFilter, TextTree};
use crate::walk::walk;

/// Iterate the text leaves that `span` intersects, in document order.
///
/// Only the subtree of the span's common ancestor is walked. When that
/// ancestor is itself a leaf it is the sole candidate and is never excluded.
/// Any other leaf with an excluded container among its ancestors is skipped,
/// including containers above the common ancestor. An empty filter excludes
/// nothing.
///
/// A collapsed span between two nodes touches no leaf and yields nothing; a
/// collapsed span inside a leaf yields that leaf.
pub fn get_leaves_in_span<'a, T: TextTree>(
    tree: &'a T,
    span: Span<T::Node>,
    filter: &'a TextFilter,
) -> impl Iterator<Item = T::Node> + 'a {
    span.common_ancestor(tree)
        .into_iter()
        .flat_map(move |ancestor| walk(tree, ancestor, filter))
        .filter(move |&leaf| span.intersects(tree, leaf))
}

/// Iterate the text leaves of every span in `spans`, span by span.
///
/// The result is the concatenation of [`get_leaves_in_span`] over the spans in
/// order. Leaves covered by more than one span are reported once per span.
pub fn get_leaves_in_selection<'a, T: TextTree>(
    tree: &'a T,
    spans: &'a [Span<T::Node>],
    filter: &'a TextFilter,
) -> impl Iterator<Item = T::Node> + 'a {
    spans
        .iter()
        .flat_map(move |&span| get_leaves_in_span(tree, span, filter))
}
