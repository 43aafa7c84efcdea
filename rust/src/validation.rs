//! Validation and debugging utilities for BTree.
//!
//! Checks the structural invariants: node occupancy, child fan-out, uniform leaf
//! depth, strictly ordered records, key bracketing between a parent's records
//! and its children, and agreement between the arena and the reachable nodes.

use std::cmp::Ordering;

use crate::error::{BTreeError, BTreeResult, TreeResult};
use crate::record::RecordOps;
use crate::types::{max_records, min_records, BTree, NodeId, NULL_NODE};

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl<R, O: RecordOps<R>> BTree<R, O> {
    /// Check if the tree maintains its invariants.
    pub fn check_invariants(&self) -> bool {
        self.check_invariants_detailed().is_ok()
    }

    /// Check invariants, describing the first violation found as
    /// `BTreeError::CorruptedTree`.
    pub fn check_invariants_detailed(&self) -> BTreeResult<()> {
        if self.root == NULL_NODE {
            if !self.arena.is_empty() {
                return Err(BTreeError::corrupted_tree(
                    "Arena",
                    &format!("empty tree still owns {} nodes", self.arena.len()),
                ));
            }
            return Ok(());
        }

        let mut leaf_depth = None;
        let mut reachable = 0;
        self.check_node_invariants(self.root, 0, None, None, &mut leaf_depth, &mut reachable)?;

        if reachable != self.arena.len() {
            return Err(BTreeError::corrupted_tree(
                "Arena",
                &format!("{} nodes in tree vs {} in arena", reachable, self.arena.len()),
            ));
        }
        Ok(())
    }

    /// Recursively check a node and its subtree. `lower` and `upper` are the
    /// parent records bracketing this subtree, if any.
    fn check_node_invariants(
        &self,
        node_id: NodeId,
        depth: usize,
        lower: Option<&R>,
        upper: Option<&R>,
        leaf_depth: &mut Option<usize>,
        reachable: &mut usize,
    ) -> TreeResult<()> {
        let node = self.node(node_id)?;
        *reachable += 1;

        let is_root = node_id == self.root;
        let len = node.records.len();
        let fail = |details: String| Err(BTreeError::corrupted_tree(&format!("Node {}", node_id), &details));

        if len > max_records(self.min_degree) {
            return fail(format!("{} records exceed the maximum {}", len, max_records(self.min_degree)));
        }
        if is_root && len == 0 {
            return fail("root holds no records".to_string());
        }
        if !is_root && len < min_records(self.min_degree) {
            return fail(format!("{} records below the minimum {}", len, min_records(self.min_degree)));
        }

        for pair in node.records.windows(2) {
            if self.ops.compare(&pair[0], &pair[1]) != Ordering::Less {
                return fail("records out of order".to_string());
            }
        }

        for record in &node.records {
            let key = self.ops.key(record);
            if lower.is_some_and(|bound| self.ops.compare_key(key, bound) != Ordering::Greater) {
                return fail("record not above its left separator".to_string());
            }
            if upper.is_some_and(|bound| self.ops.compare_key(key, bound) != Ordering::Less) {
                return fail("record not below its right separator".to_string());
            }
        }

        if node.leaf {
            if !node.children.is_empty() {
                return fail("leaf owns children".to_string());
            }
            match *leaf_depth {
                None => *leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return fail(format!("leaf at depth {} but others at depth {}", depth, expected));
                }
                Some(_) => {}
            }
            return Ok(());
        }

        if node.children.len() != len + 1 {
            return fail(format!("{} records but {} children", len, node.children.len()));
        }

        for (i, &child) in node.children.iter().enumerate() {
            let child_lower = if i == 0 { lower } else { node.records.get(i - 1) };
            let child_upper = if i == len { upper } else { node.records.get(i) };
            self.check_node_invariants(child, depth + 1, child_lower, child_upper, leaf_depth, reachable)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree_is_valid() {
        let tree = BTree::<i32>::with_natural_order(2).unwrap();
        assert!(tree.check_invariants());
    }

    #[test]
    fn test_detects_unordered_records() {
        let mut tree = BTree::with_natural_order(2).unwrap();
        for key in [1, 2, 3] {
            tree.insert(key).unwrap();
        }
        let root = tree.root;
        tree.arena.get_mut(root).unwrap().records.swap(0, 2);
        assert!(matches!(tree.check_invariants_detailed(), Err(BTreeError::CorruptedTree(_))));
    }

    #[test]
    fn test_detects_underfull_node() {
        let mut tree = BTree::with_natural_order(3).unwrap();
        for key in 0..20 {
            tree.insert(key).unwrap();
        }
        assert!(tree.check_invariants());
        let leaf = tree.root_id();
        let leaf = tree.get_node(leaf).unwrap().children()[0];
        tree.arena.get_mut(leaf).unwrap().records.truncate(1);
        assert!(!tree.check_invariants());
    }

    #[test]
    fn test_detects_bulk_load_of_unsorted_input() {
        let mut tree = BTree::with_natural_order(2).unwrap();
        tree.bulk_load([5, 4, 3, 2, 1, 0]).unwrap();
        assert_eq!(tree.len(), 6);
        assert!(!tree.check_invariants());
    }

    #[test]
    fn test_detects_leaked_nodes() {
        let mut tree = BTree::with_natural_order(2).unwrap();
        tree.insert(1).unwrap();
        tree.arena.allocate(crate::types::Node::new(true, 2)).unwrap();
        assert!(!tree.check_invariants());
    }
}
