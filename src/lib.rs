//! # ordered-tree
//!
//! A self-balancing ordered key-value container for Rust.
//!
//! ## Overview
//!
//! [`OrderedTree`](ordered::OrderedTree) is an AVL tree: a binary search tree
//! whose sibling subtrees never differ in height by more than one. Every
//! mutation rebalances the path it touched with single or double rotations,
//! which keeps lookup, insertion, and removal at O(log N) regardless of the
//! order keys arrive in.
//!
//! The container is meant to be embedded by higher-level structures (ordered
//! maps, indexes, schedulers) that need deterministic logarithmic access.
//!
//! ## Feature Flags
//!
//! - `tracing`: emit `TRACE` level events for rotations and mutations
//!   (enabled by default)
//!
//! ## Example
//!
//! ```rust
//! use ordered_tree::prelude::*;
//!
//! let mut tree = OrderedTree::new();
//! for key in 1..=7 {
//!     tree.insert(key, key * 10);
//! }
//!
//! // Ascending inserts still produce a perfectly balanced tree
//! assert_eq!(tree.height(), Some(2));
//! assert!(tree.contains(&4));
//! assert!(tree.remove(&4));
//! assert_eq!(tree.size(), 6);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Emits a `TRACE` level event when the `tracing` feature is enabled.
///
/// Expands to nothing otherwise, so call sites need no `cfg` of their own.
macro_rules! trace_event {
    ($($argument:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            tracing::trace!($($argument)*);
        }
    };
}

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use ordered_tree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::ordered::*;
}

pub mod ordered;
