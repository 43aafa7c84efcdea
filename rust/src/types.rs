//! Core types and data structures for BTree.
//!
//! This module contains the tree and node definitions and the constants shared by
//! the rest of the implementation.

use crate::compact_arena::NodeArena;
use crate::get_operations::SearchStrategy;
use crate::record::{NaturalOrder, RecordOps};

pub use crate::compact_arena::{NodeId, NULL_NODE};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Smallest minimum degree a tree accepts.
pub const MIN_DEGREE: usize = 2;

/// Deepest tree a cursor can walk. With a minimum degree of 2 a tree of this
/// height holds more records than fit in memory.
pub const MAX_DEPTH: usize = 64;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// In-memory B-tree over same-size records.
///
/// Records live in every node, leaves and internal nodes alike. Each node holds
/// at most `2t - 1` records and every node except the root at least `t - 1`,
/// where `t` is the minimum degree fixed at construction. All leaves sit at the
/// same depth.
///
/// Ordering, key projection and disposal come from the [`RecordOps`] strategy.
///
/// # Examples
///
/// ```
/// use btree_engine::BTree;
///
/// let mut tree = BTree::with_natural_order(2).unwrap();
/// for key in [10, 20, 5, 6, 12, 30, 7, 17] {
///     tree.insert(key).unwrap();
/// }
///
/// assert_eq!(tree.search(&12), Some(&12));
/// assert!(tree.insert(12).is_err());
///
/// let scan: Vec<_> = tree.range(6..=17).copied().collect();
/// assert_eq!(scan, [6, 7, 10, 12, 17]);
/// ```
#[derive(Debug)]
pub struct BTree<R, O: RecordOps<R> = NaturalOrder> {
    /// Minimum degree `t`.
    pub(crate) min_degree: usize,
    /// Ordering, key and disposal callbacks.
    pub(crate) ops: O,
    /// Scan used by `find_key`, picked once at construction.
    pub(crate) search: SearchStrategy,
    /// Root node, `NULL_NODE` while the tree is empty.
    pub(crate) root: NodeId,
    /// Owns every node reachable from `root`.
    pub(crate) arena: NodeArena<Node<R>>,
}

/// A tree node: ordered records plus, for internal nodes, `records.len() + 1`
/// children.
#[derive(Debug, Clone)]
pub struct Node<R> {
    pub(crate) records: Vec<R>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) leaf: bool,
}

impl<R> Node<R> {
    /// Create an empty node sized for a tree of minimum degree `min_degree`.
    pub fn new(leaf: bool, min_degree: usize) -> Self {
        let max_records = max_records(min_degree);
        Self {
            records: Vec::with_capacity(max_records),
            children: if leaf {
                Vec::new()
            } else {
                Vec::with_capacity(max_records + 1)
            },
            leaf,
        }
    }

    /// Number of records stored in this node.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    #[inline]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// A full node must be split before anything is inserted below it.
    #[inline]
    pub fn is_full(&self, min_degree: usize) -> bool {
        self.records.len() >= max_records(min_degree)
    }

    /// A node at the minimum cannot give a record away.
    #[inline]
    pub fn is_minimal(&self, min_degree: usize) -> bool {
        self.records.len() < min_degree
    }
}

impl<R> Default for Node<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            children: Vec::new(),
            leaf: true,
        }
    }
}

/// Maximum records per node for minimum degree `t`.
#[inline]
pub const fn max_records(min_degree: usize) -> usize {
    2 * min_degree - 1
}

/// Minimum records per non-root node for minimum degree `t`.
#[inline]
pub const fn min_records(min_degree: usize) -> usize {
    min_degree - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_bounds() {
        assert_eq!(max_records(2), 3);
        assert_eq!(min_records(2), 1);
        assert_eq!(max_records(48), 95);

        let mut node: Node<u32> = Node::new(true, 2);
        assert!(node.is_empty());
        node.records.extend([1, 2, 3]);
        assert!(node.is_full(2));
        assert!(!node.is_minimal(2));
        node.records.truncate(1);
        assert!(node.is_minimal(2));
    }

    #[test]
    fn test_internal_node_reserves_children() {
        let node: Node<u32> = Node::new(false, 4);
        assert!(!node.is_leaf());
        assert!(node.children.capacity() >= 8);
    }
}
