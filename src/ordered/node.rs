//! AVL node storage and rebalancing primitives.
//!
//! Every function here takes ownership of a boxed subtree and hands back the
//! (possibly different) box that now roots it. Rotations move boxes between
//! nodes; they never allocate or free one.

// =============================================================================
// Node Definition
// =============================================================================

/// An owned, possibly absent subtree.
pub(super) type Link<K, V> = Option<Box<Node<K, V>>>;

/// Internal node structure for the AVL tree.
#[derive(Clone)]
pub(super) struct Node<K, V> {
    pub(super) key: K,
    pub(super) value: V,
    pub(super) left: Link<K, V>,
    pub(super) right: Link<K, V>,
    /// Height of the subtree rooted here. A leaf has height 0.
    pub(super) height: i32,
    /// `height(right) - height(left)`.
    pub(super) balance_factor: i32,
}

impl<K, V> Node<K, V> {
    /// Creates a childless node.
    pub(super) const fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            height: 0,
            balance_factor: 0,
        }
    }

    /// Recomputes `height` and `balance_factor` from the current children.
    pub(super) fn update(&mut self) {
        let left_height = height_of(self.left.as_deref());
        let right_height = height_of(self.right.as_deref());
        self.height = 1 + left_height.max(right_height);
        self.balance_factor = right_height - left_height;
    }
}

/// Height of an optional subtree; an absent subtree counts as -1.
pub(super) fn height_of<K, V>(node: Option<&Node<K, V>>) -> i32 {
    node.map_or(-1, |node| node.height)
}

// =============================================================================
// Rotations
// =============================================================================

/// Rotates the subtree to the left around `node`.
///
/// The right child is promoted and `node` becomes its left child; the
/// promoted node's former left subtree moves under `node` on the right.
pub(super) fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut new_parent) = node.right.take() else {
        return node;
    };
    node.right = new_parent.left.take();
    node.update();
    new_parent.left = Some(node);
    new_parent.update();
    trace_event!(
        direction = "left",
        height = new_parent.height,
        "rotated subtree"
    );
    new_parent
}

/// Rotates the subtree to the right around `node`. Mirror of [`rotate_left`].
pub(super) fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut new_parent) = node.left.take() else {
        return node;
    };
    node.left = new_parent.right.take();
    node.update();
    new_parent.right = Some(node);
    new_parent.update();
    trace_event!(
        direction = "right",
        height = new_parent.height,
        "rotated subtree"
    );
    new_parent
}

// =============================================================================
// Rebalancing
// =============================================================================

/// Refreshes the cached metadata of `node` and restores the AVL invariant at
/// it, returning the new subtree root.
///
/// Children must already be balanced, so the factor is within -2..=2 and
/// one of the four classic cases applies:
///
/// | factor | heavy child factor | fix                          |
/// |--------|--------------------|------------------------------|
/// | -2     | <= 0               | rotate right (left-left)     |
/// | -2     | > 0                | left child left, then right  |
/// | +2     | >= 0               | rotate left (right-right)    |
/// | +2     | < 0                | right child right, then left |
pub(super) fn rebalance<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    node.update();
    match node.balance_factor {
        -2 => {
            if node
                .left
                .as_ref()
                .is_some_and(|left| left.balance_factor > 0)
            {
                trace_event!(case = "left-right", "double rotation");
                node.left = node.left.take().map(rotate_left);
            }
            rotate_right(node)
        }
        2 => {
            if node
                .right
                .as_ref()
                .is_some_and(|right| right.balance_factor < 0)
            {
                trace_event!(case = "right-left", "double rotation");
                node.right = node.right.take().map(rotate_right);
            }
            rotate_left(node)
        }
        _ => node,
    }
}

/// Detaches the maximum node of the subtree rooted at `node`.
///
/// Returns the rebalanced remainder and the detached node. The detached node
/// has no right child and its left child has been handed to the remainder.
pub(super) fn detach_max<K, V>(mut node: Box<Node<K, V>>) -> (Link<K, V>, Box<Node<K, V>>) {
    match node.right.take() {
        None => {
            let remainder = node.left.take();
            (remainder, node)
        }
        Some(right) => {
            let (remainder, max) = detach_max(right);
            node.right = remainder;
            (Some(rebalance(node)), max)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
