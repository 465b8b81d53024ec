// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boundary points, spans, and document-order comparison.
//!
//! ## Boundary points
//!
//! A [`BoundaryPoint`] is a `(node, offset)` pair. Inside a leaf the offset is a
//! byte offset into its content; inside a container it is a child index, so
//! `(p, 1)` sits between the first and second child of `p`.
//!
//! ## Intersection
//!
//! [`Span::intersects`] follows the DOM `Range.intersectsNode` rule: a node
//! occupying `[(parent, i), (parent, i + 1)]` intersects a span if it starts
//! strictly before the span's end and ends strictly after the span's start.
//! Touching is not overlapping: a span ending at `(parent, i)` does not
//! intersect the node at index `i`. A collapsed span placed inside a leaf does
//! intersect that leaf.

use core::cmp::Ordering;

use smallvec::SmallVec;
use thiserror::Error;

use crate::types::{NodeRef, TextTree};

/// A position in the tree: a node and an offset inside it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoundaryPoint<N> {
    /// The node the offset is relative to.
    pub node: N,
    /// Byte offset for leaves, child index for containers.
    pub offset: usize,
}

impl<N> BoundaryPoint<N> {
    /// Create a boundary point.
    pub const fn new(node: N, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// Errors produced when constructing a [`Span`].
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum SpanError {
    /// A boundary node is not live in the tree.
    #[error("boundary node is stale")]
    Stale,
    /// An offset lies past the end of its node.
    #[error("offset {offset} is past the node length {len}")]
    OffsetOutOfBounds {
        /// The offending offset.
        offset: usize,
        /// Length of the boundary node.
        len: usize,
    },
    /// A leaf offset splits a multi-byte character.
    #[error("offset {offset} is not on a character boundary")]
    NotCharBoundary {
        /// The offending offset.
        offset: usize,
    },
    /// The two boundary points live in different trees.
    #[error("boundary points are in different trees")]
    Disconnected,
    /// The end boundary point precedes the start in document order.
    #[error("span end comes before its start")]
    EndBeforeStart,
}

/// A contiguous region of the tree between two boundary points.
///
/// Spans are plain values and do not track later edits: once a wrap splits or
/// moves a boundary node, spans taken before the edit may point elsewhere.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Span<N> {
    start: BoundaryPoint<N>,
    end: BoundaryPoint<N>,
}

impl<N: Copy + Eq> Span<N> {
    /// Create a span after validating both boundary points.
    ///
    /// Both nodes must be live and in the same tree, offsets must lie within
    /// the node (and on a `char` boundary for leaves), and `start` must not
    /// come after `end`.
    pub fn new<T: TextTree<Node = N>>(
        tree: &T,
        start: BoundaryPoint<N>,
        end: BoundaryPoint<N>,
    ) -> Result<Self, SpanError> {
        check_point(tree, start)?;
        check_point(tree, end)?;
        match compare_points(tree, start, end) {
            None => Err(SpanError::Disconnected),
            Some(Ordering::Greater) => Err(SpanError::EndBeforeStart),
            Some(_) => Ok(Self { start, end }),
        }
    }

    /// Create a collapsed span at `point`.
    pub fn collapsed<T: TextTree<Node = N>>(
        tree: &T,
        point: BoundaryPoint<N>,
    ) -> Result<Self, SpanError> {
        Self::new(tree, point, point)
    }

    /// Create a span covering the whole contents of `node`.
    pub fn covering<T: TextTree<Node = N>>(tree: &T, node: N) -> Result<Self, SpanError> {
        if tree.node(node).is_none() {
            return Err(SpanError::Stale);
        }
        Ok(Self {
            start: BoundaryPoint::new(node, 0),
            end: BoundaryPoint::new(node, tree.node_len(node)),
        })
    }

    /// A span inside a single leaf, with offsets already known to be valid.
    pub(crate) const fn within_leaf(leaf: N, start: usize, end: usize) -> Self {
        Self {
            start: BoundaryPoint::new(leaf, start),
            end: BoundaryPoint::new(leaf, end),
        }
    }

    /// Start boundary point.
    pub fn start(&self) -> BoundaryPoint<N> {
        self.start
    }

    /// End boundary point.
    pub fn end(&self) -> BoundaryPoint<N> {
        self.end
    }

    /// Returns true if start and end are the same point.
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Lowest node that contains both boundary points (inclusive).
    ///
    /// For a span inside a single leaf, this is the leaf itself.
    pub fn common_ancestor<T: TextTree<Node = N>>(&self, tree: &T) -> Option<N> {
        let start_path = inclusive_ancestors(tree, self.start.node);
        let mut current = Some(self.end.node);
        while let Some(n) = current {
            if start_path.contains(&n) {
                return Some(n);
            }
            current = tree.parent(n);
        }
        None
    }

    /// Returns true if `node` overlaps the span. See the module docs for the exact rule.
    pub fn intersects<T: TextTree<Node = N>>(&self, tree: &T, node: N) -> bool {
        if tree.node(node).is_none() || root_of(tree, node) != root_of(tree, self.start.node) {
            return false;
        }
        let Some(parent) = tree.parent(node) else {
            return true;
        };
        let Some(index) = tree.child_index(node) else {
            return false;
        };
        let node_start = BoundaryPoint::new(parent, index);
        let node_end = BoundaryPoint::new(parent, index + 1);
        compare_points(tree, node_start, self.end) == Some(Ordering::Less)
            && compare_points(tree, node_end, self.start) == Some(Ordering::Greater)
    }
}

/// Compare two boundary points in document order.
///
/// Returns `None` if the points are in different trees.
pub fn compare_points<T: TextTree>(
    tree: &T,
    a: BoundaryPoint<T::Node>,
    b: BoundaryPoint<T::Node>,
) -> Option<Ordering> {
    if a.node == b.node {
        return Some(a.offset.cmp(&b.offset));
    }
    let path_a = inclusive_ancestors(tree, a.node);
    let path_b = inclusive_ancestors(tree, b.node);
    if path_a.last() != path_b.last() {
        return None;
    }
    // Strip the shared part of both root paths; what remains below the lowest
    // common ancestor is one branch per point (or none, if the point's node is
    // the common ancestor itself).
    let (mut ia, mut ib) = (path_a.len(), path_b.len());
    while ia > 0 && ib > 0 && path_a[ia - 1] == path_b[ib - 1] {
        ia -= 1;
        ib -= 1;
    }
    let branch_a = ia.checked_sub(1).map(|i| path_a[i]);
    let branch_b = ib.checked_sub(1).map(|i| path_b[i]);
    match (branch_a, branch_b) {
        // `a.node` is an ancestor of `b.node`.
        (None, Some(child)) => {
            let index = tree.child_index(child)?;
            Some(if index < a.offset {
                Ordering::Greater
            } else {
                Ordering::Less
            })
        }
        // `b.node` is an ancestor of `a.node`.
        (Some(child), None) => {
            let index = tree.child_index(child)?;
            Some(if index < b.offset {
                Ordering::Less
            } else {
                Ordering::Greater
            })
        }
        (Some(child_a), Some(child_b)) => {
            Some(tree.child_index(child_a)?.cmp(&tree.child_index(child_b)?))
        }
        (None, None) => Some(a.offset.cmp(&b.offset)),
    }
}

/// `node` followed by each of its ancestors, ending at the root.
fn inclusive_ancestors<T: TextTree>(tree: &T, node: T::Node) -> SmallVec<[T::Node; 16]> {
    let mut path = SmallVec::new();
    let mut current = Some(node);
    while let Some(n) = current {
        path.push(n);
        current = tree.parent(n);
    }
    path
}

fn root_of<T: TextTree>(tree: &T, node: T::Node) -> T::Node {
    let mut root = node;
    while let Some(parent) = tree.parent(root) {
        root = parent;
    }
    root
}

fn check_point<T: TextTree>(tree: &T, point: BoundaryPoint<T::Node>) -> Result<(), SpanError> {
    match tree.node(point.node) {
        None => Err(SpanError::Stale),
        Some(NodeRef::Leaf(text)) => {
            if point.offset > text.len() {
                Err(SpanError::OffsetOutOfBounds {
                    offset: point.offset,
                    len: text.len(),
                })
            } else if !text.is_char_boundary(point.offset) {
                Err(SpanError::NotCharBoundary {
                    offset: point.offset,
                })
            } else {
                Ok(())
            }
        }
        Some(NodeRef::Container(_)) => {
            let len = tree.child_count(point.node);
            if point.offset > len {
                Err(SpanError::OffsetOutOfBounds {
                    offset: point.offset,
                    len,
                })
            } else {
                Ok(())
            }
        }
    }
}
