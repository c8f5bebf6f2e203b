//! Unbalanced binary search tree.

use std::cell::Cell;
use std::cmp::Ordering;

use crate::core::{Comparator, Metrics};
use crate::structures::arena::{Arena, NodeId, TreeNode};
use crate::structures::counted_compare;

/// Binary search tree without rebalancing; sorted input degenerates it into
/// a list. Every node keeps a parent index that mirrors its owner's child link.
///
/// ```
/// use ordkit::structures::BinarySearchTree;
///
/// let mut tree = BinarySearchTree::new();
/// for k in [50, 30, 70, 20, 40] {
///     tree.insert(k, k * 10);
/// }
/// tree.delete(&30);
/// let keys: Vec<i32> = tree.in_order().into_iter().map(|(k, _)| *k).collect();
/// assert_eq!(keys, vec![20, 40, 50, 70]);
/// ```
#[derive(Clone, Debug)]
pub struct BinarySearchTree<K, V> {
    arena: Arena<K, V>,
    root: Option<NodeId>,
    len: usize,
    comparator: Comparator<K>,
    comparisons: Cell<u64>,
}

impl<K: Ord + 'static, V> BinarySearchTree<K, V> {
    pub fn new() -> Self {
        Self::with_comparator(Comparator::natural())
    }
}

impl<K: Ord + 'static, V> Default for BinarySearchTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> BinarySearchTree<K, V> {
    pub fn with_comparator(comparator: Comparator<K>) -> Self {
        Self {
            arena: Arena::default(),
            root: None,
            len: 0,
            comparator,
            comparisons: Cell::new(0),
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

    /// Walks to an empty child slot and links a new node there. An existing
    /// key keeps its node and gets the new value; the old one is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let Some(mut curr) = self.root else {
            self.root = Some(self.arena.alloc(TreeNode::new(key, value, None)));
            self.len += 1;
            return None;
        };
        loop {
            let node = self.arena.node(curr);
            let (next, goes_left) = match self.compare(&key, &node.key) {
                Ordering::Equal => {
                    let node = self.arena.node_mut(curr);
                    return Some(std::mem::replace(&mut node.value, value));
                }
                Ordering::Less => (node.left, true),
                Ordering::Greater => (node.right, false),
            };
            if let Some(child) = next {
                curr = child;
                continue;
            }
            let id = self.arena.alloc(TreeNode::new(key, value, Some(curr)));
            let parent = self.arena.node_mut(curr);
            if goes_left {
                parent.left = Some(id);
            } else {
                parent.right = Some(id);
            }
            self.len += 1;
            return None;
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|id| &self.arena.node(id).value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Removes `key` and returns its value.
    ///
    /// A node with two children takes over its in-order successor's key and
    /// value, and the successor (which has at most one child) is spliced out.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let id = self.find(key)?;
        let node = self.arena.node(id);
        let target = match (node.left, node.right) {
            (Some(_), Some(r)) => self.arena.leftmost(r),
            _ => id,
        };

        let spliced = self.arena.node(target);
        let child = spliced.left.or(spliced.right);
        let parent = spliced.parent;
        if let Some(c) = child {
            self.arena.node_mut(c).parent = parent;
        }
        match parent {
            None => self.root = child,
            Some(p) => {
                let p = self.arena.node_mut(p);
                if p.left == Some(target) {
                    p.left = child;
                } else {
                    p.right = child;
                }
            }
        }
        let removed = self.arena.release(target);
        self.len -= 1;

        if target == id {
            return Some(removed.value);
        }
        let node = self.arena.node_mut(id);
        node.key = removed.key;
        Some(std::mem::replace(&mut node.value, removed.value))
    }

    pub fn min(&self) -> Option<(&K, &V)> {
        self.root.map(|r| self.entry(self.arena.leftmost(r)))
    }

    pub fn max(&self) -> Option<(&K, &V)> {
        self.root.map(|r| self.entry(self.arena.rightmost(r)))
    }

    /// Levels in the tree; 0 when empty.
    pub fn height(&self) -> u32 {
        self.arena.depth(self.root)
    }

    pub fn in_order(&self) -> Vec<(&K, &V)> {
        self.entries(self.arena.in_order(self.root))
    }

    pub fn pre_order(&self) -> Vec<(&K, &V)> {
        self.entries(self.arena.pre_order(self.root))
    }

    pub fn post_order(&self) -> Vec<(&K, &V)> {
        self.entries(self.arena.post_order(self.root))
    }

    /// Key comparisons made so far.
    pub fn metrics(&self) -> Metrics {
        Metrics {
            comparisons: self.comparisons.get(),
            ..Metrics::default()
        }
    }

    pub fn reset_metrics(&self) {
        self.comparisons.set(0);
    }

    pub fn assert_valid(&self) -> Result<(), String> {
        self.arena.check_links_and_order(self.root, &self.comparator)?;
        let counted = self.arena.in_order(self.root).len();
        if counted != self.len {
            return Err(format!("len is {} but {counted} nodes are reachable", self.len));
        }
        Ok(())
    }

    fn find(&self, key: &K) -> Option<NodeId> {
        self.arena.find(self.root, key, &self.comparator, &self.comparisons)
    }

    fn compare(&self, a: &K, b: &K) -> Ordering {
        counted_compare(&self.comparator, &self.comparisons, a, b)
    }

    fn entry(&self, id: NodeId) -> (&K, &V) {
        let node = self.arena.node(id);
        (&node.key, &node.value)
    }

    fn entries(&self, ids: Vec<NodeId>) -> Vec<(&K, &V)> {
        ids.into_iter().map(|id| self.entry(id)).collect()
    }
}
