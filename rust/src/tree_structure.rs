//! Tree structure management operations for BTree.
//!
//! Size and shape queries, clearing, and teardown.

use crate::compact_arena::ArenaStats;
use crate::record::RecordOps;
use crate::types::{BTree, NodeId, NULL_NODE};

// ============================================================================
// TREE STRUCTURE OPERATIONS
// ============================================================================

impl<R, O: RecordOps<R>> BTree<R, O> {
    /// Returns the number of records in the tree.
    pub fn len(&self) -> usize {
        self.len_recursive(self.root)
    }

    fn len_recursive(&self, node_id: NodeId) -> usize {
        self.arena
            .get(node_id)
            .map(|node| {
                node.records.len()
                    + node
                        .children
                        .iter()
                        .map(|&child| self.len_recursive(child))
                        .sum::<usize>()
            })
            .unwrap_or(0)
    }

    /// Returns true if the tree holds no records.
    pub fn is_empty(&self) -> bool {
        self.root == NULL_NODE
    }

    /// Number of levels; 0 for an empty tree, 1 for a lone leaf.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(node) = self.arena.get(current) {
            height += 1;
            current = node.children.first().copied().unwrap_or(NULL_NODE);
        }
        height
    }

    /// Number of nodes currently allocated to the tree.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count_recursive(self.root)
    }

    fn leaf_count_recursive(&self, node_id: NodeId) -> usize {
        match self.arena.get(node_id) {
            Some(node) if node.leaf => 1,
            Some(node) => node
                .children
                .iter()
                .map(|&child| self.leaf_count_recursive(child))
                .sum(),
            None => 0,
        }
    }

    /// Minimum degree `t` the tree was configured with.
    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Width in bytes of one stored record.
    pub fn record_size(&self) -> usize {
        std::mem::size_of::<R>()
    }

    /// The ordering and disposal strategy.
    pub fn ops(&self) -> &O {
        &self.ops
    }

    /// Get statistics for the node arena.
    pub fn arena_stats(&self) -> ArenaStats {
        self.arena.stats()
    }

    /// Returns the smallest record.
    pub fn first(&self) -> Option<&R> {
        let mut node = self.arena.get(self.root)?;
        while !node.leaf {
            node = self.arena.get(*node.children.first()?)?;
        }
        node.records.first()
    }

    /// Returns the largest record.
    pub fn last(&self) -> Option<&R> {
        let mut node = self.arena.get(self.root)?;
        while !node.leaf {
            node = self.arena.get(*node.children.last()?)?;
        }
        node.records.last()
    }

    /// Remove every record, handing each to the disposer exactly once.
    pub fn clear(&mut self) {
        let root = std::mem::replace(&mut self.root, NULL_NODE);
        self.dispose_subtree(root);
        self.arena.clear();
    }

    fn dispose_subtree(&mut self, node_id: NodeId) {
        let Some(node) = self.arena.deallocate(node_id) else {
            return;
        };
        for child in node.children {
            self.dispose_subtree(child);
        }
        for record in node.records {
            self.ops.dispose(record);
        }
    }
}

impl<R, O: RecordOps<R>> Drop for BTree<R, O> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_queries_on_empty_tree() {
        let tree = BTree::<u16>::with_natural_order(2).unwrap();
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.leaf_count(), 0);
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        assert_eq!(tree.record_size(), 2);
    }

    #[test]
    fn test_structure_queries() {
        let mut tree = BTree::with_natural_order(2).unwrap();
        for key in [10, 20, 5, 6, 12, 30, 7, 17] {
            tree.insert(key).unwrap();
        }
        assert_eq!(tree.len(), 8);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.first(), Some(&5));
        assert_eq!(tree.last(), Some(&30));
        assert_eq!(tree.arena_stats().allocated_count, 4);
    }

    #[test]
    fn test_clear_then_reuse() {
        let mut tree = BTree::with_natural_order(3).unwrap();
        tree.bulk_load(0..100u64).unwrap();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);
        tree.insert(5).unwrap();
        assert_eq!(tree.len(), 1);
    }
}
