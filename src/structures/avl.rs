//! Self-balancing AVL tree.

use std::cell::Cell;
use std::cmp::Ordering;

use crate::core::{Comparator, Metrics};
use crate::structures::arena::{Arena, NodeId, TreeNode};
use crate::structures::counted_compare;

/// AVL tree: after every insert and delete, each node on the path back to
/// the root has its height recomputed and `|height(left) - height(right)|`
/// restored to at most 1 by single or double rotations.
///
/// ```
/// use ordkit::structures::AvlTree;
///
/// let mut tree = AvlTree::new();
/// for k in [10, 20, 30, 40, 50, 25] {
///     tree.insert(k, ());
/// }
/// assert!(tree.height() <= 3);
/// assert!(tree.contains(&25));
/// ```
#[derive(Clone, Debug)]
pub struct AvlTree<K, V> {
    arena: Arena<K, V>,
    root: Option<NodeId>,
    len: usize,
    comparator: Comparator<K>,
    comparisons: Cell<u64>,
    rotations: u64,
}

impl<K: Ord + 'static, V> AvlTree<K, V> {
    pub fn new() -> Self {
        Self::with_comparator(Comparator::natural())
    }
}

impl<K: Ord + 'static, V> Default for AvlTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> AvlTree<K, V> {
    pub fn with_comparator(comparator: Comparator<K>) -> Self {
        Self {
            arena: Arena::default(),
            root: None,
            len: 0,
            comparator,
            comparisons: Cell::new(0),
            rotations: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }

    /// Levels in the tree; 0 when empty.
    pub fn height(&self) -> u32 {
        self.arena.height(self.root)
    }

    /// Inserts `key`, or replaces its value and returns the old one.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut replaced = None;
        let root = self.insert_at(self.root, None, key, value, &mut replaced);
        self.root = Some(root);
        replaced
    }

    /// Removes `key` and returns its value, rebalancing every ancestor.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let mut removed = None;
        self.root = self.delete_at(self.root, key, &mut removed);
        if let Some(r) = self.root {
            self.arena.node_mut(r).parent = None;
        }
        removed
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.arena
            .find(self.root, key, &self.comparator, &self.comparisons)
            .map(|id| &self.arena.node(id).value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn min(&self) -> Option<(&K, &V)> {
        self.root.map(|r| self.entry(self.arena.leftmost(r)))
    }

    pub fn max(&self) -> Option<(&K, &V)> {
        self.root.map(|r| self.entry(self.arena.rightmost(r)))
    }

    pub fn in_order(&self) -> Vec<(&K, &V)> {
        self.arena
            .in_order(self.root)
            .into_iter()
            .map(|id| self.entry(id))
            .collect()
    }

    pub fn pre_order(&self) -> Vec<(&K, &V)> {
        self.arena
            .pre_order(self.root)
            .into_iter()
            .map(|id| self.entry(id))
            .collect()
    }

    pub fn post_order(&self) -> Vec<(&K, &V)> {
        self.arena
            .post_order(self.root)
            .into_iter()
            .map(|id| self.entry(id))
            .collect()
    }

    /// `comparisons` counts key comparisons, `swaps` counts rotations.
    pub fn metrics(&self) -> Metrics {
        Metrics {
            comparisons: self.comparisons.get(),
            swaps: self.rotations,
            ..Metrics::default()
        }
    }

    pub fn reset_metrics(&mut self) {
        self.comparisons.set(0);
        self.rotations = 0;
    }

    /// Verifies links, ordering, stored heights and the balance bound.
    pub fn assert_valid(&self) -> Result<(), String> {
        self.arena.check_links_and_order(self.root, &self.comparator)?;
        let ids = self.arena.in_order(self.root);
        if ids.len() != self.len {
            return Err(format!("len is {} but {} nodes are reachable", self.len, ids.len()));
        }
        for id in ids {
            let node = self.arena.node(id);
            let (lh, rh) = (self.arena.height(node.left), self.arena.height(node.right));
            if node.height != 1 + lh.max(rh) {
                return Err(format!("node {id} stores height {} but measures {}", node.height, 1 + lh.max(rh)));
            }
            if lh.abs_diff(rh) > 1 {
                return Err(format!("node {id} is unbalanced: left {lh}, right {rh}"));
            }
        }
        Ok(())
    }

    fn entry(&self, id: NodeId) -> (&K, &V) {
        let node = self.arena.node(id);
        (&node.key, &node.value)
    }

    fn insert_at(
        &mut self,
        node: Option<NodeId>,
        parent: Option<NodeId>,
        key: K,
        value: V,
        replaced: &mut Option<V>,
    ) -> NodeId {
        let Some(id) = node else {
            self.len += 1;
            return self.arena.alloc(TreeNode::new(key, value, parent));
        };
        match counted_compare(&self.comparator, &self.comparisons, &key, &self.arena.node(id).key) {
            Ordering::Equal => {
                let slot = &mut self.arena.node_mut(id).value;
                *replaced = Some(std::mem::replace(slot, value));
                return id;
            }
            Ordering::Less => {
                let left = self.arena.node(id).left;
                let child = self.insert_at(left, Some(id), key, value, replaced);
                self.arena.node_mut(id).left = Some(child);
            }
            Ordering::Greater => {
                let right = self.arena.node(id).right;
                let child = self.insert_at(right, Some(id), key, value, replaced);
                self.arena.node_mut(id).right = Some(child);
            }
        }
        self.rebalance(id)
    }

    fn delete_at(&mut self, node: Option<NodeId>, key: &K, removed: &mut Option<V>) -> Option<NodeId> {
        let id = node?;
        let n = self.arena.node(id);
        match counted_compare(&self.comparator, &self.comparisons, key, &n.key) {
            Ordering::Less => {
                let left = n.left;
                let child = self.delete_at(left, key, removed);
                self.set_left(id, child);
            }
            Ordering::Greater => {
                let right = n.right;
                let child = self.delete_at(right, key, removed);
                self.set_right(id, child);
            }
            Ordering::Equal => match (n.left, n.right) {
                (Some(_), Some(right)) => {
                    let (child, succ_key, succ_value) = self.take_min(right);
                    self.set_right(id, child);
                    let node = self.arena.node_mut(id);
                    node.key = succ_key;
                    *removed = Some(std::mem::replace(&mut node.value, succ_value));
                }
                (left, right) => {
                    let child = left.or(right);
                    let gone = self.arena.release(id);
                    self.len -= 1;
                    if let Some(c) = child {
                        self.arena.node_mut(c).parent = gone.parent;
                    }
                    *removed = Some(gone.value);
                    return child;
                }
            },
        }
        Some(self.rebalance(id))
    }

    /// Detaches the minimum of the subtree at `id`; returns the rebalanced
    /// subtree root and the detached key and value.
    fn take_min(&mut self, id: NodeId) -> (Option<NodeId>, K, V) {
        match self.arena.node(id).left {
            Some(left) => {
                let (child, k, v) = self.take_min(left);
                self.set_left(id, child);
                (Some(self.rebalance(id)), k, v)
            }
            None => {
                let gone = self.arena.release(id);
                self.len -= 1;
                if let Some(r) = gone.right {
                    self.arena.node_mut(r).parent = gone.parent;
                }
                (gone.right, gone.key, gone.value)
            }
        }
    }

    fn set_left(&mut self, id: NodeId, child: Option<NodeId>) {
        self.arena.node_mut(id).left = child;
        if let Some(c) = child {
            self.arena.node_mut(c).parent = Some(id);
        }
    }

    fn set_right(&mut self, id: NodeId, child: Option<NodeId>) {
        self.arena.node_mut(id).right = child;
        if let Some(c) = child {
            self.arena.node_mut(c).parent = Some(id);
        }
    }

    fn update_height(&mut self, id: NodeId) {
        let node = self.arena.node(id);
        let h = 1 + self.arena.height(node.left).max(self.arena.height(node.right));
        self.arena.node_mut(id).height = h;
    }

    /// `height(left) - height(right)`.
    fn balance(&self, id: NodeId) -> i64 {
        let node = self.arena.node(id);
        self.arena.height(node.left) as i64 - self.arena.height(node.right) as i64
    }

    /// Refreshes the height of `id` and rotates when its balance factor
    /// leaves [-1, 1]. A child leaning the other way is rotated first
    /// (left-right / right-left). Returns the subtree's new root, whose
    /// parent link already points at the old root's parent.
    fn rebalance(&mut self, id: NodeId) -> NodeId {
        self.update_height(id);
        let bf = self.balance(id);
        if bf > 1 {
            if let Some(left) = self.arena.node(id).left {
                if self.balance(left) < 0 {
                    let pivot = self.rotate_left(left);
                    self.arena.node_mut(id).left = Some(pivot);
                }
            }
            return self.rotate_right(id);
        }
        if bf < -1 {
            if let Some(right) = self.arena.node(id).right {
                if self.balance(right) > 0 {
                    let pivot = self.rotate_right(right);
                    self.arena.node_mut(id).right = Some(pivot);
                }
            }
            return self.rotate_left(id);
        }
        id
    }

    /// Lifts the right child of `x` into its place. The caller relinks the
    /// returned node into `x`'s former parent.
    fn rotate_left(&mut self, x: NodeId) -> NodeId {
        let Some(y) = self.arena.node(x).right else {
            return x;
        };
        let inner = self.arena.node(y).left;
        let parent = self.arena.node(x).parent;

        self.arena.node_mut(x).right = inner;
        if let Some(i) = inner {
            self.arena.node_mut(i).parent = Some(x);
        }
        self.arena.node_mut(y).left = Some(x);
        self.arena.node_mut(x).parent = Some(y);
        self.arena.node_mut(y).parent = parent;

        self.update_height(x);
        self.update_height(y);
        self.rotations += 1;
        y
    }

    /// Mirror of [`AvlTree::rotate_left`].
    fn rotate_right(&mut self, y: NodeId) -> NodeId {
        let Some(x) = self.arena.node(y).left else {
            return y;
        };
        let inner = self.arena.node(x).right;
        let parent = self.arena.node(y).parent;

        self.arena.node_mut(y).left = inner;
        if let Some(i) = inner {
            self.arena.node_mut(i).parent = Some(y);
        }
        self.arena.node_mut(x).right = Some(y);
        self.arena.node_mut(y).parent = Some(x);
        self.arena.node_mut(x).parent = parent;

        self.update_height(y);
        self.update_height(x);
        self.rotations += 1;
        x
    }
}
