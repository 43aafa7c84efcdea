//! INSERT operations for BTree.
//!
//! Single-pass top-down insertion: every full node met on the way down is split
//! before the descent enters it, so the leaf that receives the record always has
//! room and no split ever has to travel back up.

use std::cmp::Ordering;

use crate::error::{BTreeError, ModifyResult, TreeResult};
use crate::record::RecordOps;
use crate::types::{max_records, BTree, Node, NodeId, NULL_NODE};

impl<R, O: RecordOps<R>> BTree<R, O> {
    /// Insert a record.
    ///
    /// Returns `Err(BTreeError::DuplicateKey)` and leaves the tree untouched when
    /// a record with an equal key is already stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_engine::{BTree, BTreeError};
    ///
    /// let mut tree = BTree::with_natural_order(2).unwrap();
    /// assert!(tree.insert(7).is_ok());
    /// assert_eq!(tree.insert(7), Err(BTreeError::DuplicateKey));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, record: R) -> ModifyResult<()> {
        if self.contains_key(self.ops.key(&record)) {
            return Err(BTreeError::DuplicateKey);
        }

        // One split per level plus a new root is the most an insert can allocate.
        self.arena.reserve(self.height() + 1)?;

        if self.root == NULL_NODE {
            let mut leaf = Node::new(true, self.min_degree);
            leaf.records.push(record);
            self.root = self.arena.allocate(leaf)?;
            return Ok(());
        }

        if self.node(self.root)?.is_full(self.min_degree) {
            self.grow_root()?;
        }

        self.insert_non_full(self.root, record)
    }

    /// Put a new empty root above the full one and split the old root under it.
    fn grow_root(&mut self) -> TreeResult<()> {
        let mut new_root = Node::new(false, self.min_degree);
        new_root.children.push(self.root);
        let new_root_id = self.arena.allocate(new_root)?;
        self.root = new_root_id;
        self.split_child(new_root_id, 0)
    }

    /// Descend from a node known not to be full down to the leaf that takes
    /// `record`, splitting full children on the way.
    fn insert_non_full(&mut self, node_id: NodeId, record: R) -> TreeResult<()> {
        let mut node_id = node_id;

        loop {
            let (index, leaf) = {
                let node = self.node(node_id)?;
                let (index, _) = self.find_key(node, self.ops.key(&record));
                (index, node.leaf)
            };

            if leaf {
                self.node_mut(node_id)?.records.insert(index, record);
                return Ok(());
            }

            let mut child_index = index;
            let child_id = self.child_at(node_id, index)?;
            if self.node(child_id)?.is_full(self.min_degree) {
                self.split_child(node_id, index)?;
                let node = self.node(node_id)?;
                let median = node.records.get(index).ok_or_else(|| {
                    BTreeError::corrupted_tree("Split", "median missing from parent")
                })?;
                if self.ops.compare_key(self.ops.key(&record), median) == Ordering::Greater {
                    child_index += 1;
                }
            }

            node_id = self.child_at(node_id, child_index)?;
        }
    }

    /// Split the full child at `index` of `parent_id`.
    ///
    /// The child keeps its lower `t - 1` records (and `t` children), the median
    /// moves up into the parent at `index`, and a new right sibling at
    /// `index + 1` takes the upper `t - 1` records (and `t` children).
    pub(crate) fn split_child(&mut self, parent_id: NodeId, index: usize) -> TreeResult<()> {
        let t = self.min_degree;
        let child_id = self.child_at(parent_id, index)?;
        let (leaf, len) = {
            let child = self.node(child_id)?;
            (child.leaf, child.records.len())
        };
        if len != max_records(t) {
            return Err(BTreeError::corrupted_tree(
                "Split",
                &format!("node {} holds {} records, expected {}", child_id, len, max_records(t)),
            ));
        }

        let sibling_id = self.arena.allocate(Node::new(leaf, t))?;

        let (median, upper_records, upper_children) = {
            let child = self.node_mut(child_id)?;
            let upper_records = child.records.split_off(t);
            let upper_children = if leaf { Vec::new() } else { child.children.split_off(t) };
            let median = child.records.pop();
            (median, upper_records, upper_children)
        };
        let median = median.ok_or_else(|| BTreeError::corrupted_tree("Split", "empty node"))?;

        let sibling = self.node_mut(sibling_id)?;
        sibling.records.extend(upper_records);
        sibling.children.extend(upper_children);

        let parent = self.node_mut(parent_id)?;
        parent.records.insert(index, median);
        parent.children.insert(index + 1, sibling_id);
        Ok(())
    }

    /// Id of the child at `index` of an internal node.
    pub(crate) fn child_at(&self, node_id: NodeId, index: usize) -> TreeResult<NodeId> {
        self.node(node_id)?.children.get(index).copied().ok_or_else(|| {
            BTreeError::corrupted_tree("Node", &format!("node {} has no child {}", node_id, index))
        })
    }
}
