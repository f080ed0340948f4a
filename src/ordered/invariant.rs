//! Full-tree invariant checking.
//!
//! [`OrderedTree::validate`] walks every node once and reports the first
//! broken invariant it finds. Key order is checked on the way down; cached
//! metadata and balance are checked on the way back up.

use std::fmt;

use super::node::Node;
use super::tree::OrderedTree;

/// Describes which structural invariant of an [`OrderedTree`] does not hold.
///
/// `depth` is the offending node's distance from the root (the root has
/// depth 0). Keys are deliberately not carried, so no `Debug` bound is
/// placed on the key type.
///
/// # Examples
///
/// ```rust
/// use ordered_tree::ordered::InvariantViolation;
///
/// let violation = InvariantViolation::CountMismatch {
///     recorded: 3,
///     reachable: 2,
/// };
/// assert_eq!(
///     format!("{violation}"),
///     "recorded size 3 does not match 2 reachable nodes"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A key is not strictly between the bounds set by its ancestors.
    OrderViolated {
        /// Depth of the misplaced node.
        depth: usize,
    },
    /// A node's balance factor is outside `-1..=1`.
    Unbalanced {
        /// Depth of the node.
        depth: usize,
        /// The out-of-range balance factor.
        balance_factor: i32,
    },
    /// A node's cached height disagrees with its children.
    StaleHeight {
        /// Depth of the node.
        depth: usize,
        /// Cached height.
        recorded: i32,
        /// Height recomputed from the children.
        actual: i32,
    },
    /// A node's cached balance factor disagrees with its children.
    StaleBalanceFactor {
        /// Depth of the node.
        depth: usize,
        /// Cached balance factor.
        recorded: i32,
        /// Balance factor recomputed from the children.
        actual: i32,
    },
    /// The stored size differs from the number of reachable nodes.
    CountMismatch {
        /// Size recorded by the tree.
        recorded: usize,
        /// Number of nodes reachable from the root.
        reachable: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrderViolated { depth } => {
                write!(formatter, "key order violated at depth {depth}")
            }
            Self::Unbalanced {
                depth,
                balance_factor,
            } => write!(
                formatter,
                "balance factor {balance_factor} out of range at depth {depth}"
            ),
            Self::StaleHeight {
                depth,
                recorded,
                actual,
            } => write!(
                formatter,
                "cached height {recorded} at depth {depth}, expected {actual}"
            ),
            Self::StaleBalanceFactor {
                depth,
                recorded,
                actual,
            } => write!(
                formatter,
                "cached balance factor {recorded} at depth {depth}, expected {actual}"
            ),
            Self::CountMismatch {
                recorded,
                reachable,
            } => write!(
                formatter,
                "recorded size {recorded} does not match {reachable} reachable nodes"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Height and node count of a subtree that passed every check.
struct SubtreeSummary {
    height: i32,
    count: usize,
}

impl<K: Ord, V> OrderedTree<K, V> {
    /// Checks every structural invariant of the tree.
    ///
    /// Verifies key ordering, the AVL balance bound, the cached height and
    /// balance factor of each node, and the recorded size. A tree built only
    /// through the public API always passes.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] encountered.
    ///
    /// # Complexity
    ///
    /// O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::ordered::OrderedTree;
    ///
    /// let tree: OrderedTree<i32, ()> = (0..100).map(|key| (key, ())).collect();
    /// assert_eq!(tree.validate(), Ok(()));
    /// ```
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let summary = check_subtree(self.root.as_deref(), None, None, 0)?;
        if summary.count == self.length {
            Ok(())
        } else {
            Err(InvariantViolation::CountMismatch {
                recorded: self.length,
                reachable: summary.count,
            })
        }
    }
}

/// Recursive helper for validate. `lower` and `upper` are exclusive bounds.
fn check_subtree<K: Ord, V>(
    node: Option<&Node<K, V>>,
    lower: Option<&K>,
    upper: Option<&K>,
    depth: usize,
) -> Result<SubtreeSummary, InvariantViolation> {
    let Some(node) = node else {
        return Ok(SubtreeSummary {
            height: -1,
            count: 0,
        });
    };

    let below_lower = lower.is_some_and(|lower| node.key <= *lower);
    let above_upper = upper.is_some_and(|upper| node.key >= *upper);
    if below_lower || above_upper {
        return Err(InvariantViolation::OrderViolated { depth });
    }

    let left = check_subtree(node.left.as_deref(), lower, Some(&node.key), depth + 1)?;
    let right = check_subtree(node.right.as_deref(), Some(&node.key), upper, depth + 1)?;

    let height = 1 + left.height.max(right.height);
    if node.height != height {
        return Err(InvariantViolation::StaleHeight {
            depth,
            recorded: node.height,
            actual: height,
        });
    }

    let balance_factor = right.height - left.height;
    if node.balance_factor != balance_factor {
        return Err(InvariantViolation::StaleBalanceFactor {
            depth,
            recorded: node.balance_factor,
            actual: balance_factor,
        });
    }
    if !(-1..=1).contains(&balance_factor) {
        return Err(InvariantViolation::Unbalanced {
            depth,
            balance_factor,
        });
    }

    Ok(SubtreeSummary {
        height,
        count: left.count + right.count + 1,
    })
}
