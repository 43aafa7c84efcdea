//! GET operations for BTree.
//!
//! This module contains the key-search primitive every other operation is built
//! on, point lookups, and helpers for reaching nodes in the arena.

use crate::error::{BTreeError, KeyResult, TreeResult};
use crate::record::RecordOps;
use crate::types::{max_records, BTree, Node, NodeId};

/// Largest node (in records) still scanned linearly when the strategy is picked
/// automatically.
pub const LINEAR_SCAN_LIMIT: usize = 16;

/// How `find_key` scans the records of one node.
///
/// Both strategies return the same `(index, matched)` pair for every input; they
/// differ only in cost. Small nodes are cheaper to scan front to back, large
/// nodes to bisect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStrategy {
    Linear,
    Binary,
}

impl SearchStrategy {
    /// Pick the cheaper scan for nodes of a tree with this minimum degree.
    pub fn for_min_degree(min_degree: usize) -> Self {
        if max_records(min_degree) <= LINEAR_SCAN_LIMIT {
            SearchStrategy::Linear
        } else {
            SearchStrategy::Binary
        }
    }

    /// Find the first index `i` with `key <= records[i]`, and whether
    /// `records[i]` matches `key` exactly. Returns `records.len()` when every
    /// record is smaller than `key`.
    #[inline]
    pub fn find_key<R, O>(self, ops: &O, records: &[R], key: &O::Key) -> (usize, bool)
    where
        O: RecordOps<R>,
    {
        match self {
            SearchStrategy::Linear => {
                for (i, record) in records.iter().enumerate() {
                    match ops.compare_key(key, record) {
                        std::cmp::Ordering::Greater => continue,
                        std::cmp::Ordering::Equal => return (i, true),
                        std::cmp::Ordering::Less => return (i, false),
                    }
                }
                (records.len(), false)
            }
            SearchStrategy::Binary => {
                match records.binary_search_by(|record| ops.compare_key(key, record).reverse()) {
                    Ok(i) => (i, true),
                    Err(i) => (i, false),
                }
            }
        }
    }
}

impl<R, O: RecordOps<R>> BTree<R, O> {
    // ============================================================================
    // PUBLIC GET OPERATIONS
    // ============================================================================

    /// Look up the record stored under `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_engine::BTree;
    ///
    /// let mut tree = BTree::with_natural_order(3).unwrap();
    /// tree.insert(1).unwrap();
    /// assert_eq!(tree.search(&1), Some(&1));
    /// assert_eq!(tree.search(&2), None);
    /// ```
    pub fn search(&self, key: &O::Key) -> Option<&R> {
        self.search_from(self.root, key)
    }

    /// Look up `key` in the subtree rooted at `node_id`.
    pub fn search_from(&self, node_id: NodeId, key: &O::Key) -> Option<&R> {
        let node = self.arena.get(node_id)?;
        let (index, matched) = self.find_key(node, key);

        if matched {
            node.records.get(index)
        } else if node.leaf {
            None
        } else {
            self.search_from(*node.children.get(index)?, key)
        }
    }

    /// Look up `key`, reporting a miss as `BTreeError::KeyNotFound`.
    pub fn get_item(&self, key: &O::Key) -> KeyResult<&R> {
        self.search(key).ok_or(BTreeError::KeyNotFound)
    }

    /// Check if a record with this key is stored.
    pub fn contains_key(&self, key: &O::Key) -> bool {
        self.search(key).is_some()
    }

    /// The key-search primitive: first index in `node` whose record is not
    /// below `key`, and whether that record matches exactly.
    #[inline]
    pub fn find_key(&self, node: &Node<R>, key: &O::Key) -> (usize, bool) {
        self.search.find_key(&self.ops, &node.records, key)
    }

    /// The strategy `find_key` uses for this tree.
    pub fn search_strategy(&self) -> SearchStrategy {
        self.search
    }

    // ============================================================================
    // ARENA ACCESS HELPERS
    // ============================================================================

    /// Root node id, `NULL_NODE` when the tree is empty.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Get a node by id.
    pub fn get_node(&self, id: NodeId) -> Option<&Node<R>> {
        self.arena.get(id)
    }

    pub(crate) fn node(&self, id: NodeId) -> TreeResult<&Node<R>> {
        self.arena
            .get(id)
            .ok_or_else(|| BTreeError::corrupted_tree("Arena", &format!("missing node {}", id)))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut Node<R>> {
        self.arena
            .get_mut(id)
            .ok_or_else(|| BTreeError::corrupted_tree("Arena", &format!("missing node {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NaturalOrder;

    fn both(records: &[i32], key: i32) -> (usize, bool) {
        let linear = SearchStrategy::Linear.find_key(&NaturalOrder, records, &key);
        let binary = SearchStrategy::Binary.find_key(&NaturalOrder, records, &key);
        assert_eq!(linear, binary, "strategies disagree for key {}", key);
        linear
    }

    #[test]
    fn test_find_key_positions() {
        let records = [10, 20, 30];
        assert_eq!(both(&records, 5), (0, false));
        assert_eq!(both(&records, 10), (0, true));
        assert_eq!(both(&records, 15), (1, false));
        assert_eq!(both(&records, 30), (2, true));
        assert_eq!(both(&records, 31), (3, false));
        assert_eq!(both(&[], 1), (0, false));
    }

    #[test]
    fn test_strategies_agree_on_every_key() {
        let records: Vec<i32> = (0..200).map(|i| i * 3).collect();
        for key in -3..=600 {
            let (index, matched) = both(&records, key);
            assert_eq!(matched, key >= 0 && key % 3 == 0 && key < 600);
            assert!(index == records.len() || key <= records[index]);
            assert!(index == 0 || records[index - 1] < key);
        }
    }

    #[test]
    fn test_strategy_selection() {
        assert_eq!(SearchStrategy::for_min_degree(2), SearchStrategy::Linear);
        assert_eq!(SearchStrategy::for_min_degree(8), SearchStrategy::Linear);
        assert_eq!(SearchStrategy::for_min_degree(9), SearchStrategy::Binary);
        assert_eq!(SearchStrategy::for_min_degree(48), SearchStrategy::Binary);
    }

    #[test]
    fn test_get_item_on_empty_tree() {
        let tree = BTree::<i32>::with_natural_order(2).unwrap();
        assert_eq!(tree.search(&1), None);
        assert_eq!(tree.get_item(&1), Err(BTreeError::KeyNotFound));
        assert!(!tree.contains_key(&1));
    }
}
