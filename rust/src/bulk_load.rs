//! Bottom-up bulk loading for BTree.
//!
//! Sorted records are packed into full leaves, then parents are built level by
//! level until a single node is left. Separators are the last records of the
//! children they follow, so every level is built from the one below without
//! re-reading the input.

use tracing::{debug, error};

use crate::error::{BTreeError, ModifyResult, TreeResult};
use crate::record::RecordOps;
use crate::types::{max_records, min_records, BTree, Node, NodeId, NULL_NODE};

/// Initial size of the per-level node lists.
const NODE_BATCH: usize = 512;

impl<R, O: RecordOps<R>> BTree<R, O> {
    /// Build the tree from records that arrive in strictly ascending key order.
    ///
    /// The ordering is a precondition, not a check: unsorted input yields a
    /// structurally valid tree whose records are out of order. The tree must be
    /// empty; loading into a populated tree fails with
    /// `BTreeError::InvalidState`. If node storage cannot be allocated, nothing
    /// built so far is kept and the tree stays empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_engine::BTree;
    ///
    /// let mut tree = BTree::with_natural_order(4).unwrap();
    /// tree.bulk_load(1..=1000).unwrap();
    /// assert_eq!(tree.len(), 1000);
    /// assert!(tree.check_invariants());
    /// ```
    pub fn bulk_load<I>(&mut self, records: I) -> ModifyResult<()>
    where
        I: IntoIterator<Item = R>,
    {
        if self.root != NULL_NODE {
            return Err(BTreeError::invalid_state("bulk load", "tree is not empty"));
        }

        let mut built = Vec::new();
        match self.build_levels(records, &mut built) {
            Ok(root) => {
                self.root = root;
                self.redistribute_right_spine()?;
                debug!(height = self.height(), nodes = built.len(), "bulk load complete");
                Ok(())
            }
            Err(e) => {
                for id in built {
                    self.arena.deallocate(id);
                }
                Err(e)
            }
        }
    }

    /// Run the leaf pass and the internal passes. Every node allocated is
    /// recorded in `built` so a failed load can release it.
    fn build_levels<I>(&mut self, records: I, built: &mut Vec<NodeId>) -> TreeResult<NodeId>
    where
        I: IntoIterator<Item = R>,
    {
        let t = self.min_degree;
        let capacity = max_records(t);

        let mut children: Vec<NodeId> = Vec::with_capacity(NODE_BATCH);
        let mut leaf = Node::new(true, t);
        let mut record_count = 0usize;

        for record in records {
            if leaf.records.len() >= capacity {
                let full = std::mem::replace(&mut leaf, Node::new(true, t));
                children.push(self.allocate_tracked(full, built)?);
            }
            leaf.records.push(record);
            record_count += 1;
        }

        if record_count == 0 {
            debug!("bulk load received no records");
            return Ok(NULL_NODE);
        }
        children.push(self.allocate_tracked(leaf, built)?);
        debug!(records = record_count, leaves = children.len(), "leaf level done");

        let mut level = 0usize;
        while children.len() > 1 {
            let mut parents: Vec<NodeId> = Vec::with_capacity(children.len() / capacity + 1);
            let mut i = 0;

            while i < children.len() {
                let mut parent = Node::new(false, t);
                parent.children.push(children[i]);
                i += 1;

                while i < children.len() && parent.records.len() < capacity {
                    parent.records.push(self.promote_last(children[i - 1])?);
                    parent.children.push(children[i]);
                    i += 1;
                }

                // A full parent leaves children behind: its last child also
                // starts the next parent. The next level promotes this
                // parent's last record and drops that shared child from it.
                if i < children.len() {
                    i -= 1;
                }

                parents.push(self.allocate_tracked(parent, built)?);
            }

            level += 1;
            debug!(level, children = children.len(), parents = parents.len(), "internal level done");
            children = parents;
        }

        match children.as_slice() {
            [] => Ok(NULL_NODE),
            [root] => Ok(*root),
            nodes => {
                error!(nodes = nodes.len(), "bulk load finished with more than one root");
                Err(BTreeError::corrupted_tree(
                    "Bulk load",
                    &format!("final level has {} nodes (expected 1)", nodes.len()),
                ))
            }
        }
    }

    /// Take the last record out of a finished child to serve as the separator
    /// after it. An internal child gives up its last child reference too.
    fn promote_last(&mut self, child_id: NodeId) -> TreeResult<R> {
        let child = self.node_mut(child_id)?;
        let record = child
            .records
            .pop()
            .ok_or_else(|| BTreeError::corrupted_tree("Bulk load", "promoting from an empty node"))?;
        if !child.leaf {
            child.children.pop();
        }
        Ok(record)
    }

    fn allocate_tracked(&mut self, node: Node<R>, built: &mut Vec<NodeId>) -> TreeResult<NodeId> {
        self.arena.reserve(1)?;
        built
            .try_reserve(1)
            .map_err(|e| BTreeError::allocation_error("bulk load node list", &e.to_string()))?;
        let id = self.arena.allocate(node)?;
        built.push(id);
        Ok(id)
    }

    /// Only the last node of each level can come out of the passes short of
    /// `t - 1` records. Walk the right spine from the root and top each such
    /// node up from its left sibling, which holds `2t - 2` records.
    fn redistribute_right_spine(&mut self) -> TreeResult<()> {
        let floor = min_records(self.min_degree);
        let mut parent_id = self.root;

        while parent_id != NULL_NODE {
            let (leaf, last) = {
                let parent = self.node(parent_id)?;
                (parent.leaf, parent.records.len())
            };
            if leaf {
                break;
            }

            let child_id = self.child_at(parent_id, last)?;
            while self.node(child_id)?.records.len() < floor {
                if last == 0 {
                    return Err(BTreeError::corrupted_tree(
                        "Bulk load",
                        "right spine node has no left sibling",
                    ));
                }
                self.borrow_from_prev(parent_id, last)?;
            }

            parent_id = child_id;
        }
        Ok(())
    }
}
