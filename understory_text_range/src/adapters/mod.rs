// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Understory crates.
//!
//! ## Available Adapters
//!
//! - [`text_tree`] (`text_tree_adapter` feature): implements [`TextTree`](crate::TextTree)
//!   and [`TextTreeMut`](crate::TextTreeMut) for [`understory_text_tree::Tree`].

#[cfg(any(test, feature = "text_tree_adapter"))]
pub mod text_tree;
