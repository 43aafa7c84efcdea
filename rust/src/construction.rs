//! Construction and configuration of BTree.
//!
//! A tree is configured exactly once. The minimum degree, the record strategy and
//! the key-search strategy never change afterwards.

use crate::compact_arena::NodeArena;
use crate::error::{BTreeError, InitResult};
use crate::get_operations::SearchStrategy;
use crate::record::{NaturalOrder, RecordOps};
use crate::types::{BTree, MIN_DEGREE, NULL_NODE};

/// Default minimum degree (95 records per node).
pub const DEFAULT_MIN_DEGREE: usize = 48;

/// Tree configuration.
///
/// # Examples
///
/// ```
/// use btree_engine::{BTree, BTreeConfig, NaturalOrder, SearchStrategy};
///
/// let config = BTreeConfig::default()
///     .with_min_degree(8)
///     .with_search(SearchStrategy::Binary);
/// let tree: BTree<u64> = BTree::with_config(config, NaturalOrder).unwrap();
/// assert_eq!(tree.min_degree(), 8);
/// assert_eq!(tree.search_strategy(), SearchStrategy::Binary);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BTreeConfig {
    /// Minimum degree `t`, at least 2.
    pub min_degree: usize,
    /// Force a key-search strategy instead of picking one from the node size.
    pub search: Option<SearchStrategy>,
}

impl Default for BTreeConfig {
    fn default() -> Self {
        Self {
            min_degree: DEFAULT_MIN_DEGREE,
            search: None,
        }
    }
}

impl BTreeConfig {
    pub fn with_min_degree(mut self, min_degree: usize) -> Self {
        self.min_degree = min_degree;
        self
    }

    pub fn with_search(mut self, search: SearchStrategy) -> Self {
        self.search = Some(search);
        self
    }

    /// Check the configuration without building a tree.
    pub fn validate(&self) -> InitResult<()> {
        validation::validate_min_degree(self.min_degree)
    }
}

impl<R, O: RecordOps<R>> BTree<R, O> {
    /// Create an empty tree with the given minimum degree.
    ///
    /// Returns `Err(BTreeError::InvalidDegree)` when `min_degree < 2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree_engine::{BTree, NaturalOrder};
    ///
    /// let tree = BTree::<i64, _>::new(4, NaturalOrder).unwrap();
    /// assert!(tree.is_empty());
    /// assert!(BTree::<i64, _>::new(1, NaturalOrder).is_err());
    /// ```
    pub fn new(min_degree: usize, ops: O) -> InitResult<Self> {
        Self::with_config(BTreeConfig::default().with_min_degree(min_degree), ops)
    }

    /// Create an empty tree from a full configuration.
    pub fn with_config(config: BTreeConfig, ops: O) -> InitResult<Self> {
        config.validate()?;

        let search = config
            .search
            .unwrap_or_else(|| SearchStrategy::for_min_degree(config.min_degree));

        Ok(Self {
            min_degree: config.min_degree,
            ops,
            search,
            root: NULL_NODE,
            arena: NodeArena::new(),
        })
    }

    /// Create an empty tree with [`DEFAULT_MIN_DEGREE`].
    pub fn with_default_degree(ops: O) -> Self {
        Self {
            min_degree: DEFAULT_MIN_DEGREE,
            ops,
            search: SearchStrategy::for_min_degree(DEFAULT_MIN_DEGREE),
            root: NULL_NODE,
            arena: NodeArena::new(),
        }
    }
}

impl<R: Ord> BTree<R, NaturalOrder> {
    /// Create an empty tree ordered by the records' own `Ord`.
    pub fn with_natural_order(min_degree: usize) -> InitResult<Self> {
        Self::new(min_degree, NaturalOrder)
    }
}

impl<R: Ord> Default for BTree<R, NaturalOrder> {
    fn default() -> Self {
        Self::with_default_degree(NaturalOrder)
    }
}

/// Validation utilities for construction
pub mod validation {
    use super::*;

    /// Validate that a minimum degree is usable.
    pub fn validate_min_degree(min_degree: usize) -> InitResult<()> {
        if min_degree < MIN_DEGREE {
            Err(BTreeError::invalid_degree(min_degree, MIN_DEGREE))
        } else {
            Ok(())
        }
    }

    /// Suggest a minimum degree for a given record width in bytes, aiming at
    /// nodes of roughly 4 KiB of record storage.
    pub fn recommended_min_degree(record_size: usize) -> usize {
        const TARGET_NODE_BYTES: usize = 4096;
        let per_node = TARGET_NODE_BYTES / record_size.max(1);
        ((per_node + 1) / 2).clamp(MIN_DEGREE, 512)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_btree_construction() {
        let tree = BTree::<i32>::with_natural_order(16).unwrap();
        assert_eq!(tree.min_degree, 16);
        assert_eq!(tree.root, NULL_NODE);
    }

    #[test]
    fn test_btree_invalid_degree() {
        let result = BTree::<i32>::with_natural_order(1);
        assert!(matches!(result, Err(BTreeError::InvalidDegree(_))));
        assert!(BTree::<i32>::with_natural_order(0).is_err());
    }

    #[test]
    fn test_btree_default() {
        let tree = BTree::<i32>::default();
        assert_eq!(tree.min_degree, DEFAULT_MIN_DEGREE);
        assert_eq!(tree.search, SearchStrategy::Binary);
    }

    #[test]
    fn test_search_strategy_override() {
        let config = BTreeConfig::default()
            .with_min_degree(64)
            .with_search(SearchStrategy::Linear);
        let tree = BTree::<u8>::with_config(config, NaturalOrder).unwrap();
        assert_eq!(tree.search, SearchStrategy::Linear);
    }

    #[test]
    fn test_small_degree_scans_linearly() {
        let tree = BTree::<u8>::with_natural_order(2).unwrap();
        assert_eq!(tree.search, SearchStrategy::Linear);
    }

    #[test]
    fn test_validation() {
        assert!(validation::validate_min_degree(2).is_ok());
        assert!(validation::validate_min_degree(48).is_ok());
        assert!(validation::validate_min_degree(1).is_err());
    }

    #[test]
    fn test_recommended_min_degree() {
        assert_eq!(validation::recommended_min_degree(8), 256);
        assert_eq!(validation::recommended_min_degree(64), 32);
        assert_eq!(validation::recommended_min_degree(4096), MIN_DEGREE);
        assert_eq!(validation::recommended_min_degree(0), 512);
    }
}
