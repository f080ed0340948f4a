//! The public AVL container.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;

use super::node::{Link, Node, detach_max, rebalance};

// =============================================================================
// OrderedTree Definition
// =============================================================================

/// A mutable ordered key-value container kept height-balanced as an AVL tree.
///
/// Keys must implement `Ord` and are unique. Values are opaque payloads with
/// no trait requirements.
///
/// # Insert-if-absent semantics
///
/// [`insert`](Self::insert) never overwrites. Inserting a key that is already
/// present returns `false` and keeps the stored value; the rejected key and
/// value are dropped. Callers wanting upsert behavior should use
/// [`get_mut`](Self::get_mut) for the update path.
///
/// # Time Complexity
///
/// | Operation             | Complexity |
/// |-----------------------|------------|
/// | `new`                 | O(1)       |
/// | `insert`              | O(log N)   |
/// | `remove`              | O(log N)   |
/// | `contains`            | O(log N)   |
/// | `get` / `get_mut`     | O(log N)   |
/// | `min` / `max`         | O(log N)   |
/// | `size` / `is_empty`   | O(1)       |
/// | `height` / `root`     | O(1)       |
/// | `validate`            | O(N)       |
///
/// # Thread Safety
///
/// There is no internal synchronization. Mutation requires `&mut self`, so
/// sharing a tree between threads means wrapping it in a lock.
///
/// # Examples
///
/// ```rust
/// use ordered_tree::ordered::OrderedTree;
///
/// let mut tree = OrderedTree::new();
/// assert!(tree.insert(3, "three"));
/// assert!(tree.insert(1, "one"));
/// assert!(!tree.insert(3, "THREE")); // already present, value kept
///
/// assert_eq!(tree.get(&3), Some(&"three"));
/// assert_eq!(tree.size(), 2);
/// ```
#[derive(Clone)]
pub struct OrderedTree<K, V> {
    /// Root node of the tree
    pub(super) root: Link<K, V>,
    /// Number of entries
    pub(super) length: usize,
}

static_assertions::assert_impl_all!(OrderedTree<i32, String>: Send, Sync);
static_assertions::assert_not_impl_any!(OrderedTree<std::rc::Rc<i32>, ()>: Send, Sync);

impl<K, V> OrderedTree<K, V> {
    /// Creates a new empty tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::ordered::OrderedTree;
    ///
    /// let tree: OrderedTree<i32, String> = OrderedTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            length: 0,
        }
    }

    /// Returns the number of entries in the tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::ordered::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert(1, "one");
    /// tree.insert(2, "two");
    /// assert_eq!(tree.size(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.root = None;
        self.length = 0;
    }

    /// Returns the height of the tree, or `None` when it is empty.
    ///
    /// A single entry has height 0. For `n` entries the AVL invariant bounds
    /// the height by roughly `1.44 * log2(n + 2)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::ordered::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// assert_eq!(tree.height(), None);
    ///
    /// for key in 1..=7 {
    ///     tree.insert(key, ());
    /// }
    /// assert_eq!(tree.height(), Some(2));
    /// ```
    #[must_use]
    pub fn height(&self) -> Option<usize> {
        self.root
            .as_deref()
            .and_then(|root| usize::try_from(root.height).ok())
    }

    /// Returns the entry stored at the root.
    ///
    /// Which entry sits at the root depends on the rotations performed so
    /// far; it is exposed for callers that inspect tree shape.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::ordered::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert(1, "one");
    /// tree.insert(2, "two");
    /// tree.insert(3, "three");
    ///
    /// // The ascending chain was rotated around the middle key
    /// assert_eq!(tree.root(), Some((&2, &"two")));
    /// ```
    #[must_use]
    pub fn root(&self) -> Option<(&K, &V)> {
        self.root.as_deref().map(|root| (&root.key, &root.value))
    }

    /// Returns the entry with the minimum key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        self.root
            .as_deref()
            .map(Self::leftmost)
            .map(|node| (&node.key, &node.value))
    }

    /// Returns the entry with the maximum key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        self.root
            .as_deref()
            .map(Self::rightmost)
            .map(|node| (&node.key, &node.value))
    }

    fn leftmost(node: &Node<K, V>) -> &Node<K, V> {
        node.left.as_deref().map_or(node, Self::leftmost)
    }

    fn rightmost(node: &Node<K, V>) -> &Node<K, V> {
        node.right.as_deref().map_or(node, Self::rightmost)
    }

    /// Collects all entries in sorted order (in-order traversal).
    fn collect_entries_in_order<'a>(
        node: Option<&'a Node<K, V>>,
        entries: &mut Vec<(&'a K, &'a V)>,
    ) {
        if let Some(node) = node {
            Self::collect_entries_in_order(node.left.as_deref(), entries);
            entries.push((&node.key, &node.value));
            Self::collect_entries_in_order(node.right.as_deref(), entries);
        }
    }
}

impl<K: Ord, V> OrderedTree<K, V> {
    /// Returns `true` if the tree contains an entry for `key`.
    ///
    /// The key may be any borrowed form of the tree's key type, but the
    /// ordering on the borrowed form must match the ordering on the key type.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::ordered::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert("key".to_string(), 42);
    ///
    /// assert!(tree.contains("key"));
    /// assert!(!tree.contains("other"));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Self::find_node(self.root.as_deref(), key).is_some()
    }

    /// Returns a reference to the value stored for `key`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::ordered::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(tree.get("hello"), Some(&42));
    /// assert_eq!(tree.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Self::find_node(self.root.as_deref(), key).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value stored for `key`.
    ///
    /// Only the payload is reachable, so the tree's shape cannot change.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::ordered::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert(1, 10);
    /// if let Some(value) = tree.get_mut(&1) {
    ///     *value += 1;
    /// }
    /// assert_eq!(tree.get(&1), Some(&11));
    /// ```
    #[must_use]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Self::find_node_mut(self.root.as_deref_mut(), key).map(|node| &mut node.value)
    }

    /// Recursive helper for lookups.
    fn find_node<'a, Q>(node: Option<&'a Node<K, V>>, key: &Q) -> Option<&'a Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        node.and_then(|node| match key.cmp(node.key.borrow()) {
            Ordering::Less => Self::find_node(node.left.as_deref(), key),
            Ordering::Greater => Self::find_node(node.right.as_deref(), key),
            Ordering::Equal => Some(node),
        })
    }

    fn find_node_mut<'a, Q>(
        node: Option<&'a mut Node<K, V>>,
        key: &Q,
    ) -> Option<&'a mut Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        node.and_then(|node| match key.cmp(node.key.borrow()) {
            Ordering::Less => Self::find_node_mut(node.left.as_deref_mut(), key),
            Ordering::Greater => Self::find_node_mut(node.right.as_deref_mut(), key),
            Ordering::Equal => Some(node),
        })
    }

    /// Inserts `key` with `value` if the key is not already present.
    ///
    /// Returns `true` when a new entry was added. When the key already
    /// exists nothing changes (the stored value is kept) and `false` is
    /// returned.
    ///
    /// Every ancestor of the new leaf is rebalanced on the way back up.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::ordered::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// assert!(tree.insert(1, "one"));
    /// assert!(!tree.insert(1, "ONE"));
    /// assert_eq!(tree.get(&1), Some(&"one"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.contains(&key) {
            trace_event!(inserted = false, length = self.length, "key already present");
            return false;
        }

        self.root = Some(Self::insert_into_node(self.root.take(), key, value));
        self.length += 1;
        trace_event!(inserted = true, length = self.length, "inserted entry");
        true
    }

    /// Recursive helper for insert. Returns the rebalanced subtree root.
    fn insert_into_node(node: Link<K, V>, key: K, value: V) -> Box<Node<K, V>> {
        let Some(mut node) = node else {
            return Box::new(Node::leaf(key, value));
        };

        match key.cmp(&node.key) {
            Ordering::Less => {
                node.left = Some(Self::insert_into_node(node.left.take(), key, value));
            }
            Ordering::Greater => {
                node.right = Some(Self::insert_into_node(node.right.take(), key, value));
            }
            // `insert` has already ruled this out.
            Ordering::Equal => return node,
        }

        rebalance(node)
    }

    /// Removes the entry for `key`.
    ///
    /// Returns `true` when an entry was removed. Removing an absent key
    /// returns `false` and leaves the tree untouched.
    ///
    /// A node with two children takes over the key and value of its in-order
    /// predecessor (the maximum of its left subtree), and the predecessor's
    /// node is unlinked instead.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordered_tree::ordered::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert(5, ());
    /// tree.insert(3, ());
    /// tree.insert(8, ());
    ///
    /// assert!(tree.remove(&5));
    /// assert!(!tree.remove(&5));
    /// assert_eq!(tree.root(), Some((&3, &())));
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if !self.contains(key) {
            trace_event!(removed = false, length = self.length, "key not present");
            return false;
        }

        self.root = self
            .root
            .take()
            .and_then(|root| Self::remove_from_node(root, key));
        self.length = self.length.saturating_sub(1);
        trace_event!(removed = true, length = self.length, "removed entry");
        true
    }

    /// Recursive helper for remove. Returns the rebalanced subtree root, or
    /// `None` when the subtree became empty.
    fn remove_from_node<Q>(mut node: Box<Node<K, V>>, key: &Q) -> Link<K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match key.cmp(node.key.borrow()) {
            Ordering::Less => {
                node.left = node
                    .left
                    .take()
                    .and_then(|left| Self::remove_from_node(left, key));
            }
            Ordering::Greater => {
                node.right = node
                    .right
                    .take()
                    .and_then(|right| Self::remove_from_node(right, key));
            }
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                (None, None) => return None,
                (Some(child), None) | (None, Some(child)) => return Some(child),
                (Some(left), Some(right)) => {
                    let (remainder, predecessor) = detach_max(left);
                    let Node {
                        key: predecessor_key,
                        value: predecessor_value,
                        ..
                    } = *predecessor;
                    node.key = predecessor_key;
                    node.value = predecessor_value;
                    node.left = remainder;
                    node.right = Some(right);
                }
            },
        }

        Some(rebalance(node))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<K, V> Default for OrderedTree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Entries are inserted in iteration order, so for duplicate keys the first
/// occurrence wins.
impl<K: Ord, V> FromIterator<(K, V)> for OrderedTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrderedTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedTree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries = Vec::with_capacity(self.length);
        Self::collect_entries_in_order(self.root.as_deref(), &mut entries);
        formatter.debug_map().entries(entries).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn keys_in_order<K: Clone, V>(tree: &OrderedTree<K, V>) -> Vec<K> {
        let mut entries = Vec::new();
        OrderedTree::collect_entries_in_order(tree.root.as_deref(), &mut entries);
        entries.into_iter().map(|(key, _)| key.clone()).collect()
    }

    fn tree_of(keys: &[i32]) -> OrderedTree<i32, i32> {
        keys.iter().map(|&key| (key, key * 10)).collect()
    }

    // =========================================================================
    // Construction Tests
    // =========================================================================

    #[rstest]
    fn test_new_tree_is_empty() {
        let tree: OrderedTree<i32, String> = OrderedTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.size(), 0);
        assert_eq!(tree.height(), None);
        assert_eq!(tree.root(), None);
    }

    #[rstest]
    fn test_default_matches_new() {
        let tree: OrderedTree<i32, String> = OrderedTree::default();
        assert!(tree.is_empty());
    }

    // =========================================================================
    // Insert Tests
    // =========================================================================

    #[rstest]
    fn test_insert_single_entry() {
        let mut tree = OrderedTree::new();
        assert!(tree.insert(1, "one"));
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.height(), Some(0));
        assert_eq!(tree.root(), Some((&1, &"one")));
    }

    #[rstest]
    fn test_insert_duplicate_keeps_original_value() {
        let mut tree = OrderedTree::new();
        assert!(tree.insert(1, "one"));
        assert!(!tree.insert(1, "ONE"));
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.get(&1), Some(&"one"));
    }

    #[rstest]
    fn test_insert_ascending_keys_stays_balanced() {
        let tree = tree_of(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(tree.height(), Some(2));
        assert_eq!(tree.root(), Some((&4, &40)));
        assert_eq!(keys_in_order(&tree), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(tree.validate(), Ok(()));
    }

    #[rstest]
    fn test_insert_descending_keys_stays_balanced() {
        let tree = tree_of(&[7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(tree.height(), Some(2));
        assert_eq!(keys_in_order(&tree), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[rstest]
    #[case::left_right(&[3, 1, 2])]
    #[case::right_left(&[1, 3, 2])]
    fn test_insert_double_rotation_cases(#[case] keys: &[i32]) {
        let tree = tree_of(keys);
        assert_eq!(tree.root(), Some((&2, &20)));
        assert_eq!(tree.height(), Some(1));
    }

    #[rstest]
    fn test_insert_fifty_ascending_keys_respects_height_bound() {
        let tree = tree_of(&(0..50).collect::<Vec<_>>());
        assert_eq!(tree.size(), 50);
        assert!(tree.height().is_some_and(|height| height <= 8));
        assert_eq!(tree.validate(), Ok(()));
    }

    // =========================================================================
    // Remove Tests
    // =========================================================================

    #[rstest]
    fn test_remove_only_entry_empties_tree() {
        let mut tree = tree_of(&[10]);
        assert!(tree.remove(&10));
        assert_eq!(tree.size(), 0);
        assert!(!tree.contains(&10));
        assert!(tree.root.is_none());
    }

    #[rstest]
    fn test_remove_two_children_promotes_predecessor() {
        let mut tree = tree_of(&[5, 3, 8]);
        assert!(tree.remove(&5));
        assert_eq!(tree.root(), Some((&3, &30)));
        assert_eq!(keys_in_order(&tree), vec![3, 8]);
        assert_eq!(tree.validate(), Ok(()));
    }

    #[rstest]
    fn test_remove_single_child_splices_subtree() {
        let mut tree = tree_of(&[2, 1, 3, 4]);
        assert!(tree.remove(&3));
        assert_eq!(keys_in_order(&tree), vec![1, 2, 4]);
        assert_eq!(tree.get(&4), Some(&40));
        assert_eq!(tree.validate(), Ok(()));
    }

    #[rstest]
    fn test_remove_absent_key_is_noop() {
        let mut tree = tree_of(&[1, 2, 3]);
        assert!(!tree.remove(&42));
        assert_eq!(tree.size(), 3);
        assert_eq!(tree.root(), Some((&2, &20)));
    }

    #[rstest]
    fn test_remove_triggers_rebalance() {
        // Removing 1 leaves 2 with a right-heavy subtree of height 1.
        let mut tree = tree_of(&[2, 1, 3, 4]);
        assert!(tree.remove(&1));
        assert_eq!(tree.root(), Some((&3, &30)));
        assert_eq!(tree.height(), Some(1));
        assert_eq!(tree.validate(), Ok(()));
    }

    #[rstest]
    fn test_remove_from_empty_tree() {
        let mut tree: OrderedTree<i32, ()> = OrderedTree::new();
        assert!(!tree.remove(&1));
        assert!(tree.is_empty());
    }

    // =========================================================================
    // Lookup Tests
    // =========================================================================

    #[rstest]
    fn test_get_mut_updates_value_only() {
        let mut tree = tree_of(&[1, 2, 3]);
        if let Some(value) = tree.get_mut(&2) {
            *value = 99;
        }
        assert_eq!(tree.get(&2), Some(&99));
        assert_eq!(tree.get_mut(&4), None);
        assert_eq!(keys_in_order(&tree), vec![1, 2, 3]);
    }

    #[rstest]
    fn test_min_and_max() {
        let tree = tree_of(&[5, 2, 9, 1, 7]);
        assert_eq!(tree.min(), Some((&1, &10)));
        assert_eq!(tree.max(), Some((&9, &90)));

        let empty: OrderedTree<i32, i32> = OrderedTree::new();
        assert_eq!(empty.min(), None);
        assert_eq!(empty.max(), None);
    }

    #[rstest]
    fn test_borrowed_key_lookup() {
        let mut tree = OrderedTree::new();
        tree.insert("apple".to_string(), 1);
        tree.insert("banana".to_string(), 2);

        assert!(tree.contains("apple"));
        assert_eq!(tree.get("banana"), Some(&2));
        assert!(tree.remove("apple"));
        assert!(!tree.contains("apple"));
    }

    // =========================================================================
    // Misc Tests
    // =========================================================================

    #[rstest]
    fn test_clear_removes_everything() {
        let mut tree = tree_of(&[1, 2, 3]);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), None);
        assert!(tree.insert(1, 1));
    }

    #[rstest]
    fn test_from_iterator_keeps_first_duplicate() {
        let tree: OrderedTree<i32, &str> =
            vec![(1, "first"), (1, "second")].into_iter().collect();
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.get(&1), Some(&"first"));
    }

    #[rstest]
    fn test_extend_adds_entries() {
        let mut tree = tree_of(&[1]);
        tree.extend(vec![(2, 20), (3, 30), (1, 0)]);
        assert_eq!(tree.size(), 3);
        assert_eq!(tree.get(&1), Some(&10));
    }

    #[rstest]
    fn test_debug_lists_entries_in_key_order() {
        let tree = tree_of(&[3, 1, 2]);
        assert_eq!(format!("{tree:?}"), "{1: 10, 2: 20, 3: 30}");
    }

    #[rstest]
    fn test_clone_is_independent() {
        let original = tree_of(&[1, 2, 3]);
        let mut cloned = original.clone();
        cloned.remove(&2);
        assert!(original.contains(&2));
        assert!(!cloned.contains(&2));
    }
}
