//! Error handling and result types for BTree operations.
//!
//! Ordinary outcomes (duplicate key, missing key) and configuration problems are
//! reported through [`BTreeError`]. A [`BTreeError::CorruptedTree`] means a
//! structural invariant was broken and the tree should not be trusted further.

/// Error type for B-tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BTreeError {
    /// A record with an equal key is already stored.
    DuplicateKey,
    /// Key not found in the tree.
    KeyNotFound,
    /// Invalid minimum degree specified.
    InvalidDegree(String),
    /// Operation not allowed in the tree's current state.
    InvalidState(String),
    /// Node storage could not be reserved.
    AllocationError(String),
    /// Tree corruption detected.
    CorruptedTree(String),
}

impl BTreeError {
    /// Create an InvalidDegree error with context
    pub fn invalid_degree(min_degree: usize, min_required: usize) -> Self {
        Self::InvalidDegree(format!(
            "Minimum degree {} is invalid (minimum required: {})",
            min_degree, min_required
        ))
    }

    /// Create an InvalidState error with context
    pub fn invalid_state(operation: &str, state: &str) -> Self {
        Self::InvalidState(format!("Cannot {} in state: {}", operation, state))
    }

    /// Create an AllocationError with context
    pub fn allocation_error(resource: &str, reason: &str) -> Self {
        Self::AllocationError(format!("Failed to allocate {}: {}", resource, reason))
    }

    /// Create a CorruptedTree error with context
    pub fn corrupted_tree(component: &str, details: &str) -> Self {
        Self::CorruptedTree(format!("{} corruption: {}", component, details))
    }

    /// Check if this error is an ordinary miss or duplicate rather than a fault.
    pub fn is_ordinary(&self) -> bool {
        matches!(self, Self::DuplicateKey | Self::KeyNotFound)
    }

    /// Check if this error signals a broken tree.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::CorruptedTree(_))
    }
}

impl std::fmt::Display for BTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BTreeError::DuplicateKey => write!(f, "Duplicate key rejected"),
            BTreeError::KeyNotFound => write!(f, "Key not found in tree"),
            BTreeError::InvalidDegree(msg) => write!(f, "Invalid minimum degree: {}", msg),
            BTreeError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            BTreeError::AllocationError(msg) => write!(f, "Allocation error: {}", msg),
            BTreeError::CorruptedTree(msg) => write!(f, "Corrupted tree: {}", msg),
        }
    }
}

impl std::error::Error for BTreeError {}

/// Internal result type for tree operations
pub(crate) type TreeResult<T> = Result<T, BTreeError>;

/// Public result type for tree operations that may fail
pub type BTreeResult<T> = Result<T, BTreeError>;

/// Result type for key lookup operations
pub type KeyResult<T> = Result<T, BTreeError>;

/// Result type for tree modification operations
pub type ModifyResult<T> = Result<T, BTreeError>;

/// Result type for tree construction
pub type InitResult<T> = Result<T, BTreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(BTreeError::KeyNotFound.to_string(), "Key not found in tree");
        assert_eq!(
            BTreeError::invalid_degree(1, 2).to_string(),
            "Invalid minimum degree: Minimum degree 1 is invalid (minimum required: 2)"
        );
        assert_eq!(
            BTreeError::corrupted_tree("Bulk load", "final level has 3 nodes").to_string(),
            "Corrupted tree: Bulk load corruption: final level has 3 nodes"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(BTreeError::DuplicateKey.is_ordinary());
        assert!(BTreeError::KeyNotFound.is_ordinary());
        assert!(!BTreeError::invalid_state("bulk load", "not empty").is_ordinary());
        assert!(BTreeError::corrupted_tree("x", "y").is_corruption());
        assert!(!BTreeError::KeyNotFound.is_corruption());
    }
}
