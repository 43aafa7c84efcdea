//! Generic in-memory B-tree in Rust.
//!
//! This crate provides a classic B-tree (records live in every node, not only
//! in leaves) over caller-defined records. Ordering, key extraction and record
//! disposal come from a [`RecordOps`] strategy, so the same engine can index
//! plain values with [`NaturalOrder`] or structs by a field with [`KeyFn`].
//!
//! Supported operations are point lookup, insertion, deletion, in-order
//! walks, bottom-up bulk loading from sorted input, and forward cursors with
//! lower/upper bound seeks.
//!
//! ```
//! use btree_engine::BTree;
//!
//! let mut tree = BTree::with_natural_order(2).unwrap();
//! for key in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     tree.insert(key).unwrap();
//! }
//! assert_eq!(tree.range(10..=20).copied().collect::<Vec<_>>(), [10, 12, 17, 20]);
//! ```

mod compact_arena;
mod error;
mod record;
mod types;
mod construction;
mod get_operations;
mod insert_operations;
mod delete_operations;
mod bulk_load;
mod iteration;
mod tree_structure;
mod validation;

pub use compact_arena::{ArenaStats, NodeArena};
pub use construction::validation::{recommended_min_degree, validate_min_degree};
pub use construction::{BTreeConfig, DEFAULT_MIN_DEGREE};
pub use error::{BTreeError, BTreeResult, InitResult, KeyResult, ModifyResult};
pub use get_operations::{SearchStrategy, LINEAR_SCAN_LIMIT};
pub use iteration::{Cursor, Iter, Range};
pub use record::{KeyFn, NaturalOrder, RecordOps};
pub use types::{max_records, min_records, BTree, Node, NodeId, MAX_DEPTH, MIN_DEGREE, NULL_NODE};
