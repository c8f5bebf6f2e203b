//! Lookup structures: open-addressing hash table, binary search tree,
//! AVL tree and B-tree.
//!
//! The trees keep their nodes in an index arena: child links own nothing,
//! parent links are plain indices, and callers only ever see keys and values.

use std::cell::Cell;
use std::cmp::Ordering;

use crate::core::Comparator;

pub(crate) mod arena;
pub mod avl;
pub mod bst;
pub mod btree;
pub mod hash_table;

pub use arena::NodeId;
pub use avl::AvlTree;
pub use bst::BinarySearchTree;
pub use btree::BTree;
pub use hash_table::{HashEntry, HashMap, HashSet, HashTable};

/// Compares through `comparator`, bumping `counter`. NaN compares equal.
#[inline]
pub(crate) fn counted_compare<K>(
    comparator: &Comparator<K>,
    counter: &Cell<u64>,
    a: &K,
    b: &K,
) -> Ordering {
    counter.set(counter.get() + 1);
    comparator
        .compare(a, b)
        .partial_cmp(&0.0)
        .unwrap_or(Ordering::Equal)
}
