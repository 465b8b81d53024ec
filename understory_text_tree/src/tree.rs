// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, edits, queries.

use alloc::{string::String, vec::Vec};

use crate::types::{NodeData, NodeId};

/// Ordered tree of element and text nodes.
///
/// Nodes live in a slot arena addressed by generational [`NodeId`]s. Removing
/// a node frees its slot; a later insert may reuse the slot with a bumped
/// generation, so a stale identifier is detected instead of silently aliasing
/// the new node. Queries on stale identifiers return `None` (or an empty
/// result) and edits on them are no-ops.
///
/// Edits take effect immediately. A tree may hold several detached roots at
/// once; freshly cloned subtrees start out detached.
///
/// ## Example
///
/// ```rust
/// use understory_text_tree::Tree;
///
/// let mut tree = Tree::new();
/// let p = tree.insert_element(None, "p");
/// let text = tree.insert_text(Some(p), "hello world");
///
/// let tail = tree.split_text(text, 5).unwrap();
/// assert_eq!(tree.text_of(text), Some("hello"));
/// assert_eq!(tree.text_of(tail), Some(" world"));
/// assert_eq!(tree.children_of(p), &[text, tail]);
/// assert_eq!(tree.to_markup(p), "<p>hello world</p>");
/// ```
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

impl Node {
    fn new(generation: u32, data: NodeData) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            data,
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Insert a new node as the last child of `parent` (or as a detached root if `None`).
    ///
    /// Only elements can hold children: if `parent` is stale or is a text node,
    /// the new node is created detached.
    pub fn insert(&mut self, parent: Option<NodeId>, data: NodeData) -> NodeId {
        let id = self.alloc(data);
        if let Some(p) = parent
            && self.is_element(p)
        {
            self.link_parent(id, p, None);
        }
        id
    }

    /// Insert a new element with the given tag. See [`Tree::insert`].
    pub fn insert_element(&mut self, parent: Option<NodeId>, tag: impl Into<String>) -> NodeId {
        self.insert(parent, NodeData::element(tag))
    }

    /// Insert a new text node with the given content. See [`Tree::insert`].
    pub fn insert_text(&mut self, parent: Option<NodeId>, text: impl Into<String>) -> NodeId {
        self.insert(parent, NodeData::text(text))
    }

    /// Move `id` under `parent`, directly before `reference`.
    ///
    /// When `reference` is `None` (or is not a child of `parent`), `id` is
    /// appended as the last child. `id` is first detached from its current
    /// parent, if any.
    ///
    /// This is a no-op when `id` is stale, when `parent` is not a live element,
    /// or when `parent` lies inside the subtree of `id` (which would create a cycle).
    pub fn insert_before(&mut self, parent: NodeId, id: NodeId, reference: Option<NodeId>) {
        if !self.is_alive(id) || !self.is_element(parent) || self.is_inclusive_ancestor(id, parent)
        {
            return;
        }
        // Inserting a node before itself keeps its position.
        let reference = match reference {
            Some(r) if r == id => self.next_sibling(id),
            other => other,
        };
        if let Some(old) = self.node(id).parent {
            self.unlink_parent(id, old);
        }
        self.link_parent(id, parent, reference);
    }

    /// Reparent `id` as the last child of `new_parent`, or detach it if `None`.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        match new_parent {
            Some(p) => self.insert_before(p, id, None),
            None => self.detach(id),
        }
    }

    /// Unlink `id` from its parent. The node and its subtree stay alive as a detached root.
    pub fn detach(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
    }

    /// Remove a node (and its subtree) from the tree.
    ///
    /// All identifiers in the subtree become stale immediately.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.node_mut(child).parent = None;
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Clone the subtree rooted at `id`.
    ///
    /// The copy is a detached root with fresh identifiers. Returns `None` for stale ids.
    pub fn deep_clone(&mut self, id: NodeId) -> Option<NodeId> {
        let data = self.node_opt(id)?.data.clone();
        let copy = self.alloc(data);
        let children = self.node(id).children.clone();
        for child in children {
            if let Some(child_copy) = self.deep_clone(child) {
                self.link_parent(child_copy, copy, None);
            }
        }
        Some(copy)
    }

    /// Split a text node at the byte `offset`.
    ///
    /// The node keeps `[0, offset)` and a new text node holding the rest is
    /// inserted directly after it (or left detached if the node has no parent).
    /// Returns the new node, or `None` if `id` is not a live text node or
    /// `offset` is past the end or not on a `char` boundary.
    ///
    /// Splitting at `0` or at the end is allowed and produces an empty node.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Option<NodeId> {
        let node = self.node_opt_mut(id)?;
        let NodeData::Text(text) = &mut node.data else {
            return None;
        };
        if !text.is_char_boundary(offset) {
            return None;
        }
        let tail = text.split_off(offset);
        let parent = node.parent;
        let next = self.next_sibling(id);
        let new = self.alloc(NodeData::Text(tail));
        if let Some(p) = parent {
            self.link_parent(new, p, next);
        }
        Some(new)
    }

    /// Replace the content of a text node. No-op for elements and stale ids.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(n) = self.node_opt_mut(id)
            && let NodeData::Text(t) = &mut n.data
        {
            *t = text.into();
        }
    }

    /// Merge adjacent text nodes and drop empty text nodes in the subtree of `id`.
    ///
    /// Surviving text nodes keep their identifiers; merged-away and dropped
    /// nodes become stale.
    pub fn normalize(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        let children = self.node(id).children.clone();
        let mut run: Option<NodeId> = None;
        for child in children {
            let text_len = match &self.node(child).data {
                NodeData::Text(t) => Some(t.len()),
                NodeData::Element { .. } => None,
            };
            match (text_len, run) {
                (Some(0), _) => self.remove(child),
                (Some(_), Some(head)) => {
                    let moved = self.take_text(child);
                    if let NodeData::Text(t) = &mut self.node_mut(head).data {
                        t.push_str(&moved);
                    }
                    self.remove(child);
                }
                (Some(_), None) => run = Some(child),
                (None, _) => {
                    run = None;
                    self.normalize(child);
                }
            }
        }
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Returns the payload of a live node.
    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.node_opt(id).map(|n| &n.data)
    }

    /// Returns the tag of a live element, or `None` for text nodes and stale ids.
    pub fn tag_of(&self, id: NodeId) -> Option<&str> {
        match self.data(id)? {
            NodeData::Element { tag } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    /// Returns the content of a live text node, or `None` for elements and stale ids.
    pub fn text_of(&self, id: NodeId) -> Option<&str> {
        match self.data(id)? {
            NodeData::Text(text) => Some(text),
            NodeData::Element { .. } => None,
        }
    }

    /// Returns true if `id` is a live element.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.data(id).is_some_and(NodeData::is_element)
    }

    /// Returns true if `id` is a live text node.
    pub fn is_text(&self, id: NodeId) -> bool {
        self.data(id).is_some_and(NodeData::is_text)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Get the children of a node, or empty slice if node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match self.node_opt(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// Returns the position of `id` among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent_of(id)?;
        self.node(parent).children.iter().position(|&c| c == id)
    }

    /// Returns the sibling directly after `id`.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent_of(id)?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    /// Get the next node in depth-first traversal order.
    ///
    /// Returns `None` if no next node exists or if the current node is stale.
    /// This is a standard tree traversal that does not wrap around.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }

        if let Some(&first_child) = self.node(current).children.first() {
            return Some(first_child);
        }

        let mut node = current;
        while let Some(parent) = self.parent_of(node) {
            if let Some(next_sibling) = self.next_sibling(node) {
                return Some(next_sibling);
            }
            node = parent;
        }
        None
    }

    /// Concatenate the content of every text node in the subtree of `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node_opt(id) else {
            return;
        };
        match &node.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element { .. } => {
                for &child in &node.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    // --- internals ---

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, data));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, data)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Access a live node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.node_opt(id).expect("dangling NodeId")
    }

    /// Access a live node mutably; panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.node_opt_mut(id).expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent_of(n);
        }
        false
    }

    fn take_text(&mut self, id: NodeId) -> String {
        match &mut self.node_mut(id).data {
            NodeData::Text(t) => core::mem::take(t),
            NodeData::Element { .. } => String::new(),
        }
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId, before: Option<NodeId>) {
        let parent_node = self.node_mut(parent);
        let pos = before
            .and_then(|r| parent_node.children.iter().position(|&c| c == r))
            .unwrap_or(parent_node.children.len());
        parent_node.children.insert(pos, id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}
