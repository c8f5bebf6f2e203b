//! B-tree of minimum degree `t`.
//!
//! Every node except the root holds between `t - 1` and `2t - 1` keys, an
//! internal node with `k` keys has `k + 1` children, and all leaves sit at
//! the same depth. Inserts split full nodes on the way down, so the tree
//! only grows at the root.

use std::cell::Cell;
use std::cmp::Ordering;

use crate::core::{Comparator, Metrics};
use crate::error::{Error, Result};
use crate::structures::counted_compare;

pub const DEFAULT_MIN_DEGREE: usize = 3;

#[derive(Clone, Debug)]
struct BTreeNode<K, V> {
    keys: Vec<K>,
    values: Vec<V>,
    children: Vec<BTreeNode<K, V>>,
}

impl<K, V> BTreeNode<K, V> {
    fn leaf() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            children: Vec::new(),
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// ```
/// use ordkit::structures::BTree;
///
/// let mut tree = BTree::new();
/// for k in [10, 20, 5, 6, 12, 30, 7, 17] {
///     tree.insert(k, k.to_string());
/// }
/// assert_eq!(tree.search(&6).map(String::as_str), Some("6"));
/// assert!(tree.search(&60).is_none());
/// assert!(tree.assert_valid().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct BTree<K, V> {
    root: BTreeNode<K, V>,
    t: usize,
    len: usize,
    comparator: Comparator<K>,
    comparisons: Cell<u64>,
    splits: u64,
}

impl<K: Ord + 'static, V> BTree<K, V> {
    pub fn new() -> Self {
        Self::build(Comparator::natural(), DEFAULT_MIN_DEGREE)
    }

    /// Fails with [`Error::InvalidInput`] when `t < 2`.
    pub fn with_min_degree(t: usize) -> Result<Self> {
        Self::with_comparator(Comparator::natural(), t)
    }
}

impl<K: Ord + 'static, V> Default for BTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> BTree<K, V> {
    pub fn with_comparator(comparator: Comparator<K>, t: usize) -> Result<Self> {
        if t < 2 {
            return Err(Error::InvalidInput(format!("B-tree minimum degree must be at least 2, got {t}")));
        }
        Ok(Self::build(comparator, t))
    }

    fn build(comparator: Comparator<K>, t: usize) -> Self {
        Self {
            root: BTreeNode::leaf(),
            t,
            len: 0,
            comparator,
            comparisons: Cell::new(0),
            splits: 0,
        }
    }

    pub fn min_degree(&self) -> usize {
        self.t
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.root = BTreeNode::leaf();
        self.len = 0;
    }

    /// Levels in the tree; an empty tree still has its root leaf.
    pub fn height(&self) -> usize {
        let mut node = &self.root;
        let mut h = 1;
        while let Some(child) = node.children.first() {
            node = child;
            h += 1;
        }
        h
    }

    /// Value stored under `key`.
    pub fn search(&self, key: &K) -> Option<&V> {
        let mut node = &self.root;
        loop {
            match self.locate(node, key) {
                Ok(i) => return Some(&node.values[i]),
                Err(_) if node.is_leaf() => return None,
                Err(i) => node = &node.children[i],
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.search(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let comparator = &self.comparator;
        let counter = &self.comparisons;
        let mut node = &mut self.root;
        loop {
            match locate_in(comparator, counter, &node.keys, key) {
                Ok(i) => return Some(&mut node.values[i]),
                Err(_) if node.is_leaf() => return None,
                Err(i) => node = &mut node.children[i],
            }
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Inserts `key`, or replaces the value of an existing key and returns
    /// the old one.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.get_mut(&key) {
            return Some(std::mem::replace(slot, value));
        }
        if self.root.keys.len() == 2 * self.t - 1 {
            let old = std::mem::replace(&mut self.root, BTreeNode::leaf());
            self.root.children.push(old);
            self.split_child_of_root();
        }
        let (t, comparator, counter) = (self.t, &self.comparator, &self.comparisons);
        let mut splits = 0;
        insert_non_full(&mut self.root, key, value, t, comparator, counter, &mut splits);
        self.splits += splits;
        self.len += 1;
        None
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> Vec<&K> {
        let mut out = Vec::with_capacity(self.len);
        collect_keys(&self.root, &mut out);
        out
    }

    /// `comparisons` counts key comparisons, `swaps` counts node splits.
    pub fn metrics(&self) -> Metrics {
        Metrics {
            comparisons: self.comparisons.get(),
            swaps: self.splits,
            ..Metrics::default()
        }
    }

    pub fn reset_metrics(&mut self) {
        self.comparisons.set(0);
        self.splits = 0;
    }

    /// Checks key counts per node, child counts, uniform leaf depth and key order.
    pub fn assert_valid(&self) -> std::result::Result<(), String> {
        let mut leaf_depth = None;
        let counted = self.check_node(&self.root, true, 1, &mut leaf_depth)?;
        if counted != self.len {
            return Err(format!("len is {} but {counted} keys are stored", self.len));
        }
        for pair in self.keys().windows(2) {
            if self.comparator.compare(pair[0], pair[1]) >= 0.0 {
                return Err("keys are not strictly increasing".to_string());
            }
        }
        Ok(())
    }

    fn check_node(
        &self,
        node: &BTreeNode<K, V>,
        is_root: bool,
        depth: usize,
        leaf_depth: &mut Option<usize>,
    ) -> std::result::Result<usize, String> {
        let n = node.keys.len();
        if n > 2 * self.t - 1 {
            return Err(format!("node at depth {depth} holds {n} keys, above {}", 2 * self.t - 1));
        }
        if !is_root && n < self.t - 1 {
            return Err(format!("node at depth {depth} holds {n} keys, below {}", self.t - 1));
        }
        if node.values.len() != n {
            return Err(format!("node at depth {depth} has {n} keys but {} values", node.values.len()));
        }
        if node.is_leaf() {
            return match *leaf_depth {
                Some(d) if d != depth => Err(format!("leaves at depths {d} and {depth}")),
                _ => {
                    *leaf_depth = Some(depth);
                    Ok(n)
                }
            };
        }
        if node.children.len() != n + 1 {
            return Err(format!(
                "node at depth {depth} has {n} keys but {} children",
                node.children.len()
            ));
        }
        let mut total = n;
        for child in &node.children {
            total += self.check_node(child, false, depth + 1, leaf_depth)?;
        }
        Ok(total)
    }

    fn locate(&self, node: &BTreeNode<K, V>, key: &K) -> std::result::Result<usize, usize> {
        locate_in(&self.comparator, &self.comparisons, &node.keys, key)
    }

    fn split_child_of_root(&mut self) {
        split_child(&mut self.root, 0, self.t);
        self.splits += 1;
    }
}

/// Linear scan for `key` among a node's sorted keys: `Ok(i)` on a match,
/// otherwise `Err(i)` with the child index to descend into.
fn locate_in<K>(
    comparator: &Comparator<K>,
    counter: &Cell<u64>,
    keys: &[K],
    key: &K,
) -> std::result::Result<usize, usize> {
    for (i, k) in keys.iter().enumerate() {
        match counted_compare(comparator, counter, key, k) {
            Ordering::Equal => return Ok(i),
            Ordering::Less => return Err(i),
            Ordering::Greater => {}
        }
    }
    Err(keys.len())
}

/// Splits the full child `i` of `parent`: its upper `t - 1` keys move to a
/// new right sibling and the median key moves up into `parent`.
fn split_child<K, V>(parent: &mut BTreeNode<K, V>, i: usize, t: usize) {
    let child = &mut parent.children[i];
    let mut upper_keys = child.keys.split_off(t - 1);
    let mut upper_values = child.values.split_off(t - 1);
    let median_key = upper_keys.remove(0);
    let median_value = upper_values.remove(0);
    let sibling = BTreeNode {
        keys: upper_keys,
        values: upper_values,
        children: if child.is_leaf() { Vec::new() } else { child.children.split_off(t) },
    };
    parent.keys.insert(i, median_key);
    parent.values.insert(i, median_value);
    parent.children.insert(i + 1, sibling);
}

fn insert_non_full<K, V>(
    node: &mut BTreeNode<K, V>,
    key: K,
    value: V,
    t: usize,
    comparator: &Comparator<K>,
    counter: &Cell<u64>,
    splits: &mut u64,
) {
    let mut node = node;
    loop {
        let mut i = match locate_in(comparator, counter, &node.keys, &key) {
            Ok(i) | Err(i) => i,
        };
        if node.is_leaf() {
            node.keys.insert(i, key);
            node.values.insert(i, value);
            return;
        }
        if node.children[i].keys.len() == 2 * t - 1 {
            split_child(node, i, t);
            *splits += 1;
            if counted_compare(comparator, counter, &key, &node.keys[i]) == Ordering::Greater {
                i += 1;
            }
        }
        node = &mut node.children[i];
    }
}

fn collect_keys<'a, K, V>(node: &'a BTreeNode<K, V>, out: &mut Vec<&'a K>) {
    for (i, key) in node.keys.iter().enumerate() {
        if let Some(child) = node.children.get(i) {
            collect_keys(child, out);
        }
        out.push(key);
    }
    if let Some(last) = node.children.get(node.keys.len()) {
        collect_keys(last, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_split_promotes_median() {
        let mut tree = BTree::with_min_degree(2).unwrap();
        for k in [1, 2, 3] {
            tree.insert(k, ());
        }
        assert_eq!(tree.height(), 1);
        tree.insert(4, ());
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.root.keys, vec![2]);
        assert_eq!(tree.metrics().swaps, 1);
        assert!(tree.assert_valid().is_ok());
    }

    #[test]
    fn min_degree_below_two_is_rejected() {
        assert!(matches!(BTree::<i32, ()>::with_min_degree(1), Err(Error::InvalidInput(_))));
    }
}
