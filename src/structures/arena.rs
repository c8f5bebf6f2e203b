//! Index arena shared by the binary trees.

use std::cell::Cell;
use std::cmp::Ordering;

use crate::core::Comparator;
use crate::structures::counted_compare;

/// Stable index of a node inside its tree's arena.
pub type NodeId = u32;

#[derive(Clone, Debug)]
pub(crate) struct TreeNode<K, V> {
    pub key: K,
    pub value: V,
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    /// Levels in the subtree rooted here; a leaf has height 1.
    pub height: u32,
}

impl<K, V> TreeNode<K, V> {
    pub fn new(key: K, value: V, parent: Option<NodeId>) -> Self {
        Self {
            key,
            value,
            parent,
            left: None,
            right: None,
            height: 1,
        }
    }
}

/// Slots freed by deletion are reused by later inserts, so live ids stay put.
#[derive(Clone, Debug)]
pub(crate) struct Arena<K, V> {
    slots: Vec<Option<TreeNode<K, V>>>,
    free: Vec<NodeId>,
}

impl<K, V> Default for Arena<K, V> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<K, V> Arena<K, V> {
    pub fn alloc(&mut self, node: TreeNode<K, V>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id as usize] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                (self.slots.len() - 1) as NodeId
            }
        }
    }

    /// Removes the node and hands its contents back. Links pointing at it
    /// must already have been rewired by the caller.
    pub fn release(&mut self, id: NodeId) -> TreeNode<K, V> {
        self.free.push(id);
        self.slots[id as usize]
            .take()
            .expect("released node must be live")
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &TreeNode<K, V> {
        self.slots[id as usize]
            .as_ref()
            .expect("tree links only reference live nodes")
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut TreeNode<K, V> {
        self.slots[id as usize]
            .as_mut()
            .expect("tree links only reference live nodes")
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    /// Stored height of an optional subtree.
    #[inline]
    pub fn height(&self, id: Option<NodeId>) -> u32 {
        id.map_or(0, |i| self.node(i).height)
    }

    pub fn find(
        &self,
        root: Option<NodeId>,
        key: &K,
        comparator: &Comparator<K>,
        counter: &Cell<u64>,
    ) -> Option<NodeId> {
        let mut curr = root;
        while let Some(id) = curr {
            let node = self.node(id);
            curr = match counted_compare(comparator, counter, key, &node.key) {
                Ordering::Equal => return Some(id),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    pub fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(l) = self.node(id).left {
            id = l;
        }
        id
    }

    pub fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(r) = self.node(id).right {
            id = r;
        }
        id
    }

    /// Left, node, right. Iterative so degenerate trees cannot overflow the stack.
    pub fn in_order(&self, root: Option<NodeId>) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        let mut curr = root;
        while curr.is_some() || !stack.is_empty() {
            while let Some(id) = curr {
                stack.push(id);
                curr = self.node(id).left;
            }
            if let Some(id) = stack.pop() {
                out.push(id);
                curr = self.node(id).right;
            }
        }
        out
    }

    /// Node, left, right.
    pub fn pre_order(&self, root: Option<NodeId>) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = root.into_iter().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            let node = self.node(id);
            stack.extend(node.right);
            stack.extend(node.left);
        }
        out
    }

    /// Left, right, node.
    pub fn post_order(&self, root: Option<NodeId>) -> Vec<NodeId> {
        // Reverse of a node-right-left walk.
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = root.into_iter().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            let node = self.node(id);
            stack.extend(node.left);
            stack.extend(node.right);
        }
        out.reverse();
        out
    }

    /// Number of levels, measured by walking the tree.
    pub fn depth(&self, root: Option<NodeId>) -> u32 {
        let mut level: Vec<NodeId> = root.into_iter().collect();
        let mut depth = 0;
        while !level.is_empty() {
            depth += 1;
            level = level
                .iter()
                .flat_map(|&id| {
                    let node = self.node(id);
                    node.left.into_iter().chain(node.right)
                })
                .collect();
        }
        depth
    }

    /// Checks that every child's parent link points back at its owner and
    /// that keys strictly increase in order.
    pub fn check_links_and_order(
        &self,
        root: Option<NodeId>,
        comparator: &Comparator<K>,
    ) -> Result<(), String> {
        if let Some(r) = root {
            if self.node(r).parent.is_some() {
                return Err(format!("root {r} has a parent link"));
            }
        }
        let order = self.in_order(root);
        for &id in &order {
            let node = self.node(id);
            for child in [node.left, node.right].into_iter().flatten() {
                if self.node(child).parent != Some(id) {
                    return Err(format!("node {child} does not point back at parent {id}"));
                }
            }
        }
        for pair in order.windows(2) {
            let (a, b) = (&self.node(pair[0]).key, &self.node(pair[1]).key);
            if comparator.compare(a, b) >= 0.0 {
                return Err(format!("in-order keys out of order at nodes {} and {}", pair[0], pair[1]));
            }
        }
        Ok(())
    }
}
