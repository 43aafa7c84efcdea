//! Cursor and iterator implementations for BTree.
//!
//! A [`Cursor`] is a stack of `(node, index)` frames from the root down to the
//! node holding the current record. In the top frame `index` is the current
//! record; in every frame below it `index` is the child the cursor descended
//! into, which is also the separator to visit once that child is exhausted.
//! Stepping forward alternates between visiting a separator in an internal
//! frame and descending to the leftmost leaf of the subtree after it.

use std::ops::{Bound, RangeBounds};

use crate::record::RecordOps;
use crate::types::{BTree, NodeId, MAX_DEPTH, NULL_NODE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    node: NodeId,
    index: usize,
}

const EMPTY_FRAME: Frame = Frame {
    node: NULL_NODE,
    index: 0,
};

// ============================================================================
// CURSOR
// ============================================================================

/// Position in a tree's in-order sequence, or the end sentinel.
///
/// The cursor borrows the tree, so the tree cannot be mutated while any cursor
/// into it is alive.
pub struct Cursor<'a, R, O: RecordOps<R>> {
    tree: &'a BTree<R, O>,
    stack: [Frame; MAX_DEPTH],
    depth: usize,
    current: Option<&'a R>,
}

impl<'a, R, O: RecordOps<R>> Cursor<'a, R, O> {
    fn at_end(tree: &'a BTree<R, O>) -> Self {
        Self {
            tree,
            stack: [EMPTY_FRAME; MAX_DEPTH],
            depth: 0,
            current: None,
        }
    }

    fn first(tree: &'a BTree<R, O>) -> Self {
        let mut cursor = Self::at_end(tree);
        if tree.root != NULL_NODE {
            cursor.descend_leftmost(tree.root);
            cursor.settle();
        }
        cursor
    }

    /// Descend to the first record `>= key`, or one past the record equal to
    /// `key` when `past_equal` is set.
    fn seek(tree: &'a BTree<R, O>, key: &O::Key, past_equal: bool) -> Self {
        let mut cursor = Self::at_end(tree);
        let mut node_id = tree.root;

        while let Some(node) = tree.arena.get(node_id) {
            let (index, matched) = tree.find_key(node, key);
            if !cursor.push(node_id, index) {
                return cursor;
            }

            if matched {
                cursor.current = node.records.get(index);
                if past_equal {
                    cursor.advance();
                }
                return cursor;
            }

            if node.leaf {
                cursor.settle();
                return cursor;
            }

            match node.children.get(index) {
                Some(&child) => node_id = child,
                None => {
                    cursor.set_end();
                    return cursor;
                }
            }
        }
        cursor
    }

    /// The record under the cursor, `None` at the end.
    #[inline]
    pub fn get(&self) -> Option<&'a R> {
        self.current
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Number of frames on the stack; 0 at the end.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Step to the next record in key order. Does nothing at the end.
    pub fn advance(&mut self) {
        if self.depth == 0 {
            return;
        }
        let tree = self.tree;
        let top = &mut self.stack[self.depth - 1];
        let Some(node) = tree.arena.get(top.node) else {
            self.set_end();
            return;
        };

        top.index += 1;
        if node.leaf {
            self.settle();
            return;
        }

        // Just visited separator `index - 1`; the subtree after it comes next.
        match node.children.get(top.index) {
            Some(&child) => {
                if self.descend_leftmost(child) {
                    self.settle();
                }
            }
            None => self.set_end(),
        }
    }

    fn push(&mut self, node: NodeId, index: usize) -> bool {
        if self.depth == MAX_DEPTH {
            self.set_end();
            return false;
        }
        self.stack[self.depth] = Frame { node, index };
        self.depth += 1;
        true
    }

    /// Push frames along the leftmost path from `node_id` down to a leaf.
    fn descend_leftmost(&mut self, node_id: NodeId) -> bool {
        let tree = self.tree;
        let mut node_id = node_id;
        loop {
            if !self.push(node_id, 0) {
                return false;
            }
            match tree.arena.get(node_id) {
                Some(node) if !node.leaf => match node.children.first() {
                    Some(&child) => node_id = child,
                    None => {
                        self.set_end();
                        return false;
                    }
                },
                Some(_) => return true,
                None => {
                    self.set_end();
                    return false;
                }
            }
        }
    }

    /// Pop exhausted frames until the top frame points at a record; that record
    /// becomes current. Popping every frame reaches the end.
    fn settle(&mut self) {
        let tree = self.tree;
        while self.depth > 0 {
            let top = self.stack[self.depth - 1];
            if let Some(record) = tree.arena.get(top.node).and_then(|node| node.records.get(top.index)) {
                self.current = Some(record);
                return;
            }
            self.depth -= 1;
        }
        self.current = None;
    }

    fn set_end(&mut self) {
        self.depth = 0;
        self.current = None;
    }
}

impl<R, O: RecordOps<R>> Clone for Cursor<'_, R, O> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack,
            depth: self.depth,
            current: self.current,
        }
    }
}

/// Two cursors are equal when both are at the end, or when they point into the
/// same tree along identical frame stacks.
impl<R, O: RecordOps<R>> PartialEq for Cursor<'_, R, O> {
    fn eq(&self, other: &Self) -> bool {
        if self.is_end() || other.is_end() {
            return self.is_end() && other.is_end();
        }
        std::ptr::eq(self.tree, other.tree)
            && self.stack[..self.depth] == other.stack[..other.depth]
    }
}

impl<R, O: RecordOps<R>> Eq for Cursor<'_, R, O> {}

impl<R, O: RecordOps<R>> std::fmt::Debug for Cursor<'_, R, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("frames", &&self.stack[..self.depth])
            .finish()
    }
}

// ============================================================================
// ITERATOR STRUCTS
// ============================================================================

/// Iterator over every record in ascending key order.
pub struct Iter<'a, R, O: RecordOps<R>> {
    cursor: Cursor<'a, R, O>,
}

/// Iterator over the records from one cursor up to (excluding) another.
pub struct Range<'a, R, O: RecordOps<R>> {
    front: Cursor<'a, R, O>,
    back: Cursor<'a, R, O>,
}

impl<'a, R, O: RecordOps<R>> Iterator for Iter<'a, R, O> {
    type Item = &'a R;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.cursor.get()?;
        self.cursor.advance();
        Some(record)
    }
}

impl<'a, R, O: RecordOps<R>> Iterator for Range<'a, R, O> {
    type Item = &'a R;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let record = self.front.get()?;
        self.front.advance();
        Some(record)
    }
}

// ============================================================================
// BTREE ITERATOR METHODS
// ============================================================================

impl<R, O: RecordOps<R>> BTree<R, O> {
    /// Cursor on the smallest record (the end cursor for an empty tree).
    pub fn begin(&self) -> Cursor<'_, R, O> {
        Cursor::first(self)
    }

    /// The end sentinel. It never holds a record; compare against it to detect
    /// the end of a traversal.
    pub fn end(&self) -> Cursor<'_, R, O> {
        Cursor::at_end(self)
    }

    /// Cursor on the first record whose key is `>= key`.
    pub fn lower_bound(&self, key: &O::Key) -> Cursor<'_, R, O> {
        Cursor::seek(self, key, false)
    }

    /// Cursor on the first record whose key is `> key`.
    pub fn upper_bound(&self, key: &O::Key) -> Cursor<'_, R, O> {
        Cursor::seek(self, key, true)
    }

    /// Iterate over all records in ascending key order.
    pub fn iter(&self) -> Iter<'_, R, O> {
        Iter {
            cursor: self.begin(),
        }
    }

    /// Iterate from `front` up to but excluding `back`.
    ///
    /// `back` must not come before `front`; otherwise iteration runs on to the
    /// end of the tree.
    pub fn range_between<'a>(&'a self, front: Cursor<'a, R, O>, back: Cursor<'a, R, O>) -> Range<'a, R, O> {
        Range { front, back }
    }

    /// Iterate over the records whose keys fall in `range`.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_engine::BTree;
    ///
    /// let mut tree = BTree::with_natural_order(2).unwrap();
    /// for key in [10, 15, 20, 25, 30] {
    ///     tree.insert(key).unwrap();
    /// }
    ///
    /// let inclusive: Vec<_> = tree.range(15..=25).copied().collect();
    /// assert_eq!(inclusive, [15, 20, 25]);
    ///
    /// let exclusive: Vec<_> = tree.range(15..25).copied().collect();
    /// assert_eq!(exclusive, [15, 20]);
    ///
    /// let open: Vec<_> = tree.range(21..).copied().collect();
    /// assert_eq!(open, [25, 30]);
    /// ```
    pub fn range<B>(&self, range: B) -> Range<'_, R, O>
    where
        B: RangeBounds<O::Key>,
    {
        let front = match range.start_bound() {
            Bound::Included(key) => self.lower_bound(key),
            Bound::Excluded(key) => self.upper_bound(key),
            Bound::Unbounded => self.begin(),
        };
        let back = match range.end_bound() {
            Bound::Included(key) => self.upper_bound(key),
            Bound::Excluded(key) => self.lower_bound(key),
            Bound::Unbounded => self.end(),
        };

        // An inverted range is empty rather than running to the end.
        let inverted = match (front.get(), back.get()) {
            (Some(first), Some(stop)) => self.ops.compare(first, stop) == std::cmp::Ordering::Greater,
            _ => false,
        };
        if inverted {
            return Range {
                front: self.end(),
                back: self.end(),
            };
        }

        Range { front, back }
    }

    /// Visit every record in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_engine::BTree;
    ///
    /// let mut tree = BTree::with_natural_order(2).unwrap();
    /// for key in [3, 1, 2] {
    ///     tree.insert(key).unwrap();
    /// }
    /// let mut seen = Vec::new();
    /// tree.walk(|record| seen.push(*record));
    /// assert_eq!(seen, [1, 2, 3]);
    /// ```
    pub fn walk<F>(&self, mut visitor: F)
    where
        F: FnMut(&R),
    {
        self.walk_node(self.root, &mut visitor);
    }

    fn walk_node<F>(&self, node_id: NodeId, visitor: &mut F)
    where
        F: FnMut(&R),
    {
        let Some(node) = self.arena.get(node_id) else {
            return;
        };

        for (i, record) in node.records.iter().enumerate() {
            if let Some(&child) = node.children.get(i) {
                self.walk_node(child, visitor);
            }
            visitor(record);
        }
        if let Some(&last) = node.children.last() {
            self.walk_node(last, visitor);
        }
    }
}

impl<'a, R, O: RecordOps<R>> IntoIterator for &'a BTree<R, O> {
    type Item = &'a R;
    type IntoIter = Iter<'a, R, O>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
