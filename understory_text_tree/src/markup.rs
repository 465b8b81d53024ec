// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tiny tag-and-text markup format for building and inspecting trees.
//!
//! The grammar is deliberately small: `<tag>…</tag>`, `<tag/>`, and text with
//! the `&lt;`, `&gt;`, `&amp;` and `&quot;` character references. There are no
//! attributes, comments, or doctypes.

use alloc::{string::String, vec::Vec};

use thiserror::Error;

use crate::tree::Tree;
use crate::types::{NodeData, NodeId};

/// Errors produced by [`Tree::parse_markup`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MarkupError {
    /// Input ended inside a tag.
    #[error("unexpected end of input inside a tag")]
    UnexpectedEof,
    /// A closing tag did not match the innermost open element.
    #[error("closing tag `</{found}>` does not match the open element")]
    MismatchedClose {
        /// Name found in the closing tag.
        found: String,
    },
    /// An element was still open at the end of input.
    #[error("element `<{0}>` is never closed")]
    UnclosedTag(String),
    /// A tag name was empty or contained unsupported characters.
    #[error("invalid tag name `{0}`")]
    InvalidTagName(String),
    /// A character reference other than the supported four.
    #[error("unknown character reference `&{0};`")]
    UnknownEntity(String),
    /// Input held no node at the top level.
    #[error("input contains no node")]
    NoRoot,
    /// Input held more than one node at the top level.
    #[error("input contains more than one top-level node")]
    MultipleRoots,
}

impl Tree {
    /// Parse markup into a fresh tree, returning the tree and its root.
    ///
    /// Whitespace-only text at the top level is ignored; text inside elements
    /// is kept verbatim, including whitespace.
    ///
    /// ```rust
    /// use understory_text_tree::Tree;
    ///
    /// let (tree, root) = Tree::parse_markup("<p>text1<a><strong>text2</strong>text3</a></p>").unwrap();
    /// assert_eq!(tree.tag_of(root), Some("p"));
    /// assert_eq!(tree.text_content(root), "text1text2text3");
    /// ```
    pub fn parse_markup(src: &str) -> Result<(Self, NodeId), MarkupError> {
        let mut tree = Self::new();
        let mut roots: Vec<NodeId> = Vec::new();
        let mut open: Vec<NodeId> = Vec::new();
        let mut rest = src;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix("</") {
                let end = after.find('>').ok_or(MarkupError::UnexpectedEof)?;
                let name = after[..end].trim();
                match open.pop() {
                    Some(top) if tree.tag_of(top) == Some(name) => {}
                    _ => {
                        return Err(MarkupError::MismatchedClose { found: name.into() });
                    }
                }
                rest = &after[end + 1..];
            } else if let Some(after) = rest.strip_prefix('<') {
                let end = after.find('>').ok_or(MarkupError::UnexpectedEof)?;
                let (name, self_closing) = match after[..end].strip_suffix('/') {
                    Some(name) => (name.trim(), true),
                    None => (after[..end].trim(), false),
                };
                if !is_valid_tag(name) {
                    return Err(MarkupError::InvalidTagName(name.into()));
                }
                let id = tree.insert_element(open.last().copied(), name);
                if open.is_empty() {
                    roots.push(id);
                }
                if !self_closing {
                    open.push(id);
                }
                rest = &after[end + 1..];
            } else {
                let end = rest.find('<').unwrap_or(rest.len());
                let raw = &rest[..end];
                let text = unescape(raw)?;
                match open.last() {
                    Some(&parent) => {
                        tree.insert_text(Some(parent), text);
                    }
                    None if raw.trim().is_empty() => {}
                    None => roots.push(tree.insert_text(None, text)),
                }
                rest = &rest[end..];
            }
        }

        if let Some(&top) = open.last() {
            let tag: String = tree.tag_of(top).unwrap_or_default().into();
            return Err(MarkupError::UnclosedTag(tag));
        }
        match roots.as_slice() {
            [] => Err(MarkupError::NoRoot),
            [root] => Ok((tree, *root)),
            _ => Err(MarkupError::MultipleRoots),
        }
    }

    /// Serialize the subtree of `id` to markup. Stale ids serialize to an empty string.
    ///
    /// Text is escaped with the same four references [`Tree::parse_markup`] decodes.
    /// Adjacent text nodes serialize exactly like a single merged node.
    pub fn to_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            None => {}
            Some(NodeData::Text(text)) => escape_into(text, out),
            Some(NodeData::Element { tag }) => {
                out.push('<');
                out.push_str(tag);
                out.push('>');
                for &child in self.children_of(id) {
                    self.write_markup(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn is_valid_tag(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn unescape(raw: &str) -> Result<String, MarkupError> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let Some(semi) = after.find(';') else {
            return Err(MarkupError::UnknownEntity(after.into()));
        };
        let ch = match &after[..semi] {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            other => return Err(MarkupError::UnknownEntity(other.into())),
        };
        out.push(ch);
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
