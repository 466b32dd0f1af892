//! Allocator-aware ordered map, growable array and stack for `no_std` Rust.
//!
//! This crate provides three collections:
//!
//! - [`AvlMap`]: an ordered map backed by a height-balanced (AVL) binary search
//!   tree, with stable [`Position`]s, bidirectional [`Cursor`](avl_map::Cursor)s,
//!   bound queries and pluggable key ordering through [`Compare`].
//! - [`Vector`]: a contiguous growable array whose cloning operations are strongly
//!   exception safe and whose allocation failures can be handled as values.
//! - [`Stack`]: a LIFO adapter over any [`BackSequence`], a [`Vector`] by default.
//!
//! Both storage-owning collections draw their memory from an [`Allocator`], the
//! platform allocator ([`Global`]) unless another one is supplied.
//!
//! # Example
//!
//! ```
//! use avl_collections::{AvlMap, Stack, Vector};
//!
//! let mut scores = AvlMap::new();
//! scores.insert("Carol", 92);
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//!
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.first_key_value(), Some((&"Alice", &100)));
//!
//! // Every entry from "B" onwards.
//! let mut cursor = scores.cursor_at(scores.lower_bound(&"B"));
//! let mut names = Vector::new();
//! while let Some(name) = cursor.key() {
//!     names.push_back(*name);
//!     cursor.move_next();
//! }
//! assert_eq!(names.as_slice(), ["Bob", "Carol"]);
//!
//! let mut stack: Stack<_> = names.into_iter().collect();
//! assert_eq!(stack.pop(), Some("Carol"));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Stable positions** - Erasing an entry never moves another one
//! - **Fallible allocation** - `try_*` methods report [`Error::AllocFailed`] and leave
//!   the collection untouched
//!
//! # Implementation
//!
//! Tree nodes live in an arena and link to their children and parent through
//! compact handles, with handle 0 standing in for the sentinel that marks both a
//! missing child and the end of iteration. Insertion and removal rebalance bottom
//! up along the parent links.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: Unsafe code is needed for the array buffer and for mutable tree iteration.
// #![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod raw;

pub mod allocator;
pub mod avl_map;
pub mod compare;
pub mod error;
pub mod stack;
pub mod vector;

pub use allocator::{Allocator, Global};
pub use avl_map::{AvlMap, Position};
pub use compare::{Compare, Natural, Reverse};
pub use error::{Error, Result};
pub use stack::{BackSequence, Stack};
pub use vector::Vector;
