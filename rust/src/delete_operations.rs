//! DELETE operations for BTree.
//!
//! Top-down deletion. Before the descent enters a child holding only `t - 1`
//! records, the child is topped up by borrowing through the parent from a
//! sibling with spare records, or merged with a sibling. The node the key is
//! finally removed from therefore never underflows.

use crate::error::{BTreeError, ModifyResult, TreeResult};
use crate::record::RecordOps;
use crate::types::{BTree, NodeId, NULL_NODE};

impl<R, O: RecordOps<R>> BTree<R, O> {
    /// Remove the record stored under `key` and hand it to the disposer.
    ///
    /// Returns `Err(BTreeError::KeyNotFound)` and leaves the tree untouched when
    /// no such record exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_engine::{BTree, BTreeError};
    ///
    /// let mut tree = BTree::with_natural_order(2).unwrap();
    /// tree.insert(1).unwrap();
    /// assert!(tree.remove(&1).is_ok());
    /// assert_eq!(tree.remove(&1), Err(BTreeError::KeyNotFound));
    /// assert!(tree.is_empty());
    /// ```
    pub fn remove(&mut self, key: &O::Key) -> ModifyResult<()> {
        let removed = self.remove_item(key)?;
        self.ops.dispose(removed);
        Ok(())
    }

    /// Detach the record stored under `key` from the tree and rebalance.
    /// The caller decides what happens to the record.
    fn remove_item(&mut self, key: &O::Key) -> ModifyResult<R> {
        // Rebalancing on the way down would reshape the tree even for a miss.
        if !self.contains_key(key) {
            return Err(BTreeError::KeyNotFound);
        }

        let removed = self.remove_recursive(self.root, key)?;
        self.collapse_root_if_needed()?;
        Ok(removed)
    }

    fn remove_recursive(&mut self, node_id: NodeId, key: &O::Key) -> TreeResult<R> {
        let (index, matched, leaf) = {
            let node = self.node(node_id)?;
            let (index, matched) = self.find_key(node, key);
            (index, matched, node.leaf)
        };

        if leaf {
            if !matched {
                return Err(BTreeError::KeyNotFound);
            }
            return Ok(self.node_mut(node_id)?.records.remove(index));
        }

        if !matched {
            let child_id = self.fill_child(node_id, index)?;
            return self.remove_recursive(child_id, key);
        }

        let left_id = self.child_at(node_id, index)?;
        let right_id = self.child_at(node_id, index + 1)?;

        if !self.node(left_id)?.is_minimal(self.min_degree) {
            let predecessor = self.remove_max(left_id)?;
            self.replace_record(node_id, index, predecessor)
        } else if !self.node(right_id)?.is_minimal(self.min_degree) {
            let successor = self.remove_min(right_id)?;
            self.replace_record(node_id, index, successor)
        } else {
            // Both neighbours are minimal: pull the key down into their merge.
            self.merge_children(node_id, index)?;
            self.remove_recursive(left_id, key)
        }
    }

    fn replace_record(&mut self, node_id: NodeId, index: usize, record: R) -> TreeResult<R> {
        let slot = self
            .node_mut(node_id)?
            .records
            .get_mut(index)
            .ok_or_else(|| BTreeError::corrupted_tree("Node", "record index out of range"))?;
        Ok(std::mem::replace(slot, record))
    }

    /// Detach the largest record of the subtree rooted at `node_id`, which must
    /// hold at least `t` records.
    fn remove_max(&mut self, node_id: NodeId) -> TreeResult<R> {
        let mut node_id = node_id;
        loop {
            let node = self.node(node_id)?;
            if node.leaf {
                break;
            }
            let last = node.records.len();
            node_id = self.fill_child(node_id, last)?;
        }
        self.node_mut(node_id)?
            .records
            .pop()
            .ok_or_else(|| BTreeError::corrupted_tree("Leaf", "empty leaf below internal node"))
    }

    /// Detach the smallest record of the subtree rooted at `node_id`, which
    /// must hold at least `t` records.
    fn remove_min(&mut self, node_id: NodeId) -> TreeResult<R> {
        let mut node_id = node_id;
        loop {
            let node = self.node(node_id)?;
            if node.leaf {
                break;
            }
            node_id = self.fill_child(node_id, 0)?;
        }
        let leaf = self.node_mut(node_id)?;
        if leaf.records.is_empty() {
            return Err(BTreeError::corrupted_tree("Leaf", "empty leaf below internal node"));
        }
        Ok(leaf.records.remove(0))
    }

    // ============================================================================
    // REBALANCING
    // ============================================================================

    /// Make sure the child at `index` can lose a record, and return the id of
    /// the node the descent should continue into (a merge with the left
    /// sibling moves the records there).
    fn fill_child(&mut self, parent_id: NodeId, index: usize) -> TreeResult<NodeId> {
        let t = self.min_degree;
        let child_id = self.child_at(parent_id, index)?;
        if !self.node(child_id)?.is_minimal(t) {
            return Ok(child_id);
        }

        let parent_len = self.node(parent_id)?.records.len();

        if index > 0 && !self.node(self.child_at(parent_id, index - 1)?)?.is_minimal(t) {
            self.borrow_from_prev(parent_id, index)?;
            Ok(child_id)
        } else if index < parent_len
            && !self.node(self.child_at(parent_id, index + 1)?)?.is_minimal(t)
        {
            self.borrow_from_next(parent_id, index)?;
            Ok(child_id)
        } else if index < parent_len {
            self.merge_children(parent_id, index)?;
            Ok(child_id)
        } else {
            let left_id = self.child_at(parent_id, index - 1)?;
            self.merge_children(parent_id, index - 1)?;
            Ok(left_id)
        }
    }

    /// Rotate right: the left sibling's last record moves up into the parent,
    /// the separator moves down to the front of the child at `index`, and
    /// for internal nodes the sibling's last child follows it.
    pub(crate) fn borrow_from_prev(&mut self, parent_id: NodeId, index: usize) -> TreeResult<()> {
        let child_id = self.child_at(parent_id, index)?;
        let sibling_id = self.child_at(parent_id, index - 1)?;

        let (record, grandchild) = {
            let sibling = self.node_mut(sibling_id)?;
            let record = sibling
                .records
                .pop()
                .ok_or_else(|| BTreeError::corrupted_tree("Borrow", "left sibling is empty"))?;
            let grandchild = if sibling.leaf { None } else { sibling.children.pop() };
            (record, grandchild)
        };

        let separator = self.replace_record(parent_id, index - 1, record)?;

        let child = self.node_mut(child_id)?;
        child.records.insert(0, separator);
        if let Some(grandchild) = grandchild {
            child.children.insert(0, grandchild);
        }
        Ok(())
    }

    /// Rotate left: mirror image of [`borrow_from_prev`](Self::borrow_from_prev)
    /// using the right sibling.
    fn borrow_from_next(&mut self, parent_id: NodeId, index: usize) -> TreeResult<()> {
        let child_id = self.child_at(parent_id, index)?;
        let sibling_id = self.child_at(parent_id, index + 1)?;

        let (record, grandchild) = {
            let sibling = self.node_mut(sibling_id)?;
            if sibling.records.is_empty() {
                return Err(BTreeError::corrupted_tree("Borrow", "right sibling is empty"));
            }
            let record = sibling.records.remove(0);
            let grandchild = if sibling.leaf || sibling.children.is_empty() {
                None
            } else {
                Some(sibling.children.remove(0))
            };
            (record, grandchild)
        };

        let separator = self.replace_record(parent_id, index, record)?;

        let child = self.node_mut(child_id)?;
        child.records.push(separator);
        if let Some(grandchild) = grandchild {
            child.children.push(grandchild);
        }
        Ok(())
    }

    /// Merge the children at `index` and `index + 1` around the separator
    /// between them. The right child's slot is released.
    fn merge_children(&mut self, parent_id: NodeId, index: usize) -> TreeResult<()> {
        let left_id = self.child_at(parent_id, index)?;
        let right_id = self.child_at(parent_id, index + 1)?;

        let separator = {
            let parent = self.node_mut(parent_id)?;
            parent.children.remove(index + 1);
            parent.records.remove(index)
        };

        let right = self.arena.deallocate(right_id).ok_or_else(|| {
            BTreeError::corrupted_tree("Merge", &format!("missing right sibling {}", right_id))
        })?;

        let left = self.node_mut(left_id)?;
        left.records.push(separator);
        left.records.extend(right.records);
        left.children.extend(right.children);
        Ok(())
    }

    /// An emptied root is replaced by its only child, or the tree becomes empty
    /// when the root was a leaf.
    fn collapse_root_if_needed(&mut self) -> TreeResult<()> {
        if self.root == NULL_NODE {
            return Ok(());
        }

        let (empty, leaf, first_child) = {
            let root = self.node(self.root)?;
            (root.records.is_empty(), root.leaf, root.children.first().copied())
        };
        if !empty {
            return Ok(());
        }

        let old_root = self.root;
        self.root = if leaf {
            NULL_NODE
        } else {
            first_child
                .ok_or_else(|| BTreeError::corrupted_tree("Root", "internal root without children"))?
        };
        self.arena.deallocate(old_root);
        Ok(())
    }
}
