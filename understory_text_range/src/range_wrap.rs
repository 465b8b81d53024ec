// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wrapping every text leaf a span or selection touches.
//!
//! The coordinator works in two phases. First it locates the leaves and
//! decides what to wrap, while the tree is borrowed immutably. Then it applies
//! [`wrap_leaf`] to each job. The borrow checker keeps the two phases apart:
//! no located sequence can outlive the first one.

use alloc::vec::Vec;
use core::cmp::Reverse;

use hashbrown::HashMap;
use tracing::{debug, trace, warn};

use crate::locate::get_leaves_in_span;
use crate::span::Span;
use crate::types::{TextFilter, TextTreeMut};
use crate::wrap::{Undo, WrapError, wrap_leaf};

/// One planned call to [`wrap_leaf`].
#[derive(Copy, Clone, Debug)]
struct WrapJob<N> {
    leaf: N,
    start: Option<usize>,
    end: Option<usize>,
}

/// Wrap every leaf `span` touches in a clone of `template`.
///
/// Leaves are located as by [`get_leaves_in_span`](crate::get_leaves_in_span).
/// A leaf for which `should_wrap` returns false is left alone. The leaf holding
/// the span's start is wrapped from the start offset on, the leaf holding the
/// end up to the end offset, and every leaf in between is wrapped whole.
///
/// On error, wraps already made by this call are undone before returning.
pub fn wrap_span<T, P>(
    tree: &mut T,
    span: Span<T::Node>,
    template: T::Node,
    filter: &TextFilter,
    should_wrap: P,
) -> Result<Undo<T::Node>, WrapError>
where
    T: TextTreeMut,
    P: FnMut(&T, T::Node) -> bool,
{
    wrap_selection(tree, core::slice::from_ref(&span), template, filter, should_wrap)
}

/// Wrap the leaves of every span in `spans`, returning one combined [`Undo`].
///
/// Spans are handled in order. When more than one span lands in the same leaf,
/// the wraps on that leaf are made from the highest offset down so the earlier
/// pieces keep their offsets. Overlapping or nested spans are not supported.
///
/// ```rust
/// use understory_text_range::{BoundaryPoint, Span, TextFilter, wrap_selection};
/// use understory_text_tree::Tree;
///
/// let (mut tree, p) = Tree::parse_markup("<p>one two three</p>").unwrap();
/// let text = tree.children_of(p)[0];
/// let mark = tree.insert_element(None, "mark");
/// let spans = [
///     Span::new(&tree, BoundaryPoint::new(text, 0), BoundaryPoint::new(text, 3)).unwrap(),
///     Span::new(&tree, BoundaryPoint::new(text, 8), BoundaryPoint::new(text, 13)).unwrap(),
/// ];
///
/// let undo = wrap_selection(&mut tree, &spans, mark, &TextFilter::new(), |_, _| true).unwrap();
/// assert_eq!(tree.to_markup(p), "<p><mark>one</mark> two <mark>three</mark></p>");
///
/// undo.undo(&mut tree);
/// assert_eq!(tree.to_markup(p), "<p>one two three</p>");
/// ```
pub fn wrap_selection<T, P>(
    tree: &mut T,
    spans: &[Span<T::Node>],
    template: T::Node,
    filter: &TextFilter,
    mut should_wrap: P,
) -> Result<Undo<T::Node>, WrapError>
where
    T: TextTreeMut,
    P: FnMut(&T, T::Node) -> bool,
{
    let mut jobs = Vec::new();
    for span in spans {
        let (start, end) = (span.start(), span.end());
        for leaf in get_leaves_in_span(&*tree, *span, filter) {
            if !should_wrap(&*tree, leaf) {
                trace!(?leaf, "leaf skipped by predicate");
                continue;
            }
            jobs.push(WrapJob {
                leaf,
                start: (leaf == start.node).then_some(start.offset),
                end: (leaf == end.node).then_some(end.offset),
            });
        }
    }
    order_jobs(&mut jobs);

    let mut undo = Undo::new();
    for job in &jobs {
        match wrap_leaf(tree, job.leaf, template, job.start, job.end) {
            Ok(step) => undo.append(step),
            Err(err) => {
                for step in undo.steps().iter().rev() {
                    step.undo(tree);
                }
                warn!(%err, leaf = ?job.leaf, rolled_back = undo.len(), "wrap failed");
                return Err(err);
            }
        }
    }
    debug!(spans = spans.len(), wrapped = undo.len(), "wrapped selection");
    Ok(undo)
}

/// Group jobs on the same leaf at that leaf's first position, highest start first.
///
/// A wrap keeps the head of a split leaf under the original handle, so lower
/// offsets on that handle stay valid only while wraps go right to left.
fn order_jobs<N: Copy + Eq + core::hash::Hash>(jobs: &mut [WrapJob<N>]) {
    let mut first_seen: HashMap<N, usize> = HashMap::with_capacity(jobs.len());
    for (i, job) in jobs.iter().enumerate() {
        first_seen.entry(job.leaf).or_insert(i);
    }
    if first_seen.len() == jobs.len() {
        return;
    }
    jobs.sort_by_key(|job| (first_seen[&job.leaf], Reverse(job.start.unwrap_or(0))));
}
