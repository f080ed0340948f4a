//! AVL-balanced ordered key-value tree.
//!
//! This module provides [`OrderedTree`], a mutable ordered container whose
//! height never exceeds about `1.44 * log2(N)`, and [`InvariantViolation`],
//! the report produced by [`OrderedTree::validate`].
//!
//! # Overview
//!
//! - O(log N) `insert`, `remove`, `contains`, `get`
//! - O(1) `size`, `is_empty`, `height`
//! - Insert-if-absent: inserting an existing key keeps the stored value
//!
//! # Examples
//!
//! ```rust
//! use ordered_tree::ordered::OrderedTree;
//!
//! let mut tree = OrderedTree::new();
//! tree.insert(5, "five");
//! tree.insert(3, "three");
//! tree.insert(8, "eight");
//!
//! // Removing a node with two children promotes its in-order predecessor
//! assert!(tree.remove(&5));
//! assert_eq!(tree.root(), Some((&3, &"three")));
//! assert_eq!(tree.validate(), Ok(()));
//! ```
//!
//! # Internal Structure
//!
//! Each node owns its children through `Option<Box<_>>` and caches its
//! subtree height and balance factor (`height(right) - height(left)`). After
//! every insert or remove the nodes on the mutation path are refreshed from
//! the bottom up, and any node whose factor reaches +/-2 is fixed with one of
//! four rotation cases:
//!
//! 1. Left-left: single right rotation
//! 2. Left-right: left rotation of the left child, then right rotation
//! 3. Right-right: single left rotation
//! 4. Right-left: right rotation of the right child, then left rotation

mod invariant;
mod node;
mod tree;

pub use invariant::InvariantViolation;
pub use tree::OrderedTree;
