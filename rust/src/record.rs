//! Ordering, key projection and disposal strategies for stored records.

use std::cmp::Ordering;
use std::marker::PhantomData;

/// Strategy supplied once at tree construction describing how records are
/// ordered, how their keys are viewed, and how evicted records are released.
///
/// `compare_key(key(a), b)` must agree with `compare(a, b)` for every pair of
/// records. The tree relies on this but never checks it.
pub trait RecordOps<R> {
    /// Borrowed key view of a record.
    type Key: ?Sized;

    /// Project a record to its key.
    fn key<'r>(&self, record: &'r R) -> &'r Self::Key;

    /// Total order between a bare key and a full record.
    fn compare_key(&self, key: &Self::Key, record: &R) -> Ordering;

    /// Total order between two full records.
    fn compare(&self, a: &R, b: &R) -> Ordering {
        self.compare_key(self.key(a), b)
    }

    /// Called exactly once for each record that permanently leaves the tree,
    /// either through `remove` or through teardown. Never called for records
    /// that only move between nodes.
    fn dispose(&self, record: R) {
        drop(record);
    }
}

/// Orders records by their own `Ord` implementation; the record is its key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<R: Ord> RecordOps<R> for NaturalOrder {
    type Key = R;

    #[inline]
    fn key<'r>(&self, record: &'r R) -> &'r R {
        record
    }

    #[inline]
    fn compare_key(&self, key: &R, record: &R) -> Ordering {
        key.cmp(record)
    }

    #[inline]
    fn compare(&self, a: &R, b: &R) -> Ordering {
        a.cmp(b)
    }
}

/// Orders records by an `Ord` key borrowed out of each record.
///
/// ```
/// use btree_engine::{BTree, KeyFn};
///
/// let mut tree = BTree::new(2, KeyFn::new(|pair: &(u32, char)| &pair.0)).unwrap();
/// tree.insert((2, 'b')).unwrap();
/// tree.insert((1, 'a')).unwrap();
/// assert_eq!(tree.search(&2), Some(&(2, 'b')));
/// ```
pub struct KeyFn<F, K: ?Sized> {
    extract: F,
    _key: PhantomData<fn(&K)>,
}

impl<F, K: ?Sized> KeyFn<F, K> {
    /// Wrap a key projection.
    pub fn new<R>(extract: F) -> Self
    where
        F: Fn(&R) -> &K,
    {
        Self {
            extract,
            _key: PhantomData,
        }
    }
}

impl<R, F, K> RecordOps<R> for KeyFn<F, K>
where
    F: Fn(&R) -> &K,
    K: Ord + ?Sized,
{
    type Key = K;

    #[inline]
    fn key<'r>(&self, record: &'r R) -> &'r K {
        (self.extract)(record)
    }

    #[inline]
    fn compare_key(&self, key: &K, record: &R) -> Ordering {
        key.cmp((self.extract)(record))
    }
}

impl<F, K: ?Sized> std::fmt::Debug for KeyFn<F, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyFn").finish_non_exhaustive()
    }
}
