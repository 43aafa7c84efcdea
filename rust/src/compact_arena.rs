//! Slot arena that owns every node of a tree.
//!
//! Nodes refer to each other by [`NodeId`] instead of pointers. Freed slots go on
//! a free list and are handed out again by the next allocation.

use crate::error::{BTreeError, TreeResult};

/// Node ID type for arena-based allocation
pub type NodeId = u32;

/// Marks the absence of a node (an empty tree's root).
pub const NULL_NODE: NodeId = u32::MAX;

/// Statistics for a node arena
#[derive(Debug, Clone, Copy)]
pub struct ArenaStats {
    pub total_capacity: usize,
    pub allocated_count: usize,
    pub free_count: usize,
    pub utilization: f64,
}

/// Arena allocator backed by a `Vec<T>` with a separate free list.
#[derive(Debug)]
pub struct NodeArena<T> {
    storage: Vec<T>,
    /// Free slot indices for reuse
    free_list: Vec<usize>,
    /// Track which slots are actually allocated
    allocated_mask: Vec<bool>,
}

impl<T> NodeArena<T> {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
            free_list: Vec::new(),
            allocated_mask: Vec::new(),
        }
    }

    /// Make sure the next `additional` allocations cannot fail.
    ///
    /// Mutating tree operations call this before their first structural change,
    /// so an allocation failure leaves the tree exactly as it was.
    pub fn reserve(&mut self, additional: usize) -> TreeResult<()> {
        let reusable = self.free_list.len();
        if additional <= reusable {
            return Ok(());
        }
        let fresh = additional - reusable;

        if self.storage.len() + fresh > NULL_NODE as usize {
            return Err(BTreeError::allocation_error(
                "node slots",
                "node id space exhausted",
            ));
        }

        self.storage
            .try_reserve(fresh)
            .map_err(|e| BTreeError::allocation_error("node slots", &e.to_string()))?;
        self.allocated_mask
            .try_reserve(fresh)
            .map_err(|e| BTreeError::allocation_error("node slots", &e.to_string()))?;
        Ok(())
    }

    /// Allocate a new item in the arena and return its ID
    #[inline]
    pub fn allocate(&mut self, item: T) -> TreeResult<NodeId> {
        if let Some(free_index) = self.free_list.pop() {
            self.storage[free_index] = item;
            self.allocated_mask[free_index] = true;
            // Every index on the free list was handed out as a NodeId before.
            return Ok(free_index as NodeId);
        }

        let index = self.storage.len();
        let id = NodeId::try_from(index)
            .ok()
            .filter(|&id| id != NULL_NODE)
            .ok_or_else(|| BTreeError::allocation_error("node slot", "node id space exhausted"))?;
        self.storage.push(item);
        self.allocated_mask.push(true);
        Ok(id)
    }

    /// Deallocate an item from the arena and return it
    #[inline]
    pub fn deallocate(&mut self, id: NodeId) -> Option<T>
    where
        T: Default,
    {
        let index = self.allocated_index(id)?;

        self.allocated_mask[index] = false;
        self.free_list.push(index);

        Some(std::mem::take(&mut self.storage[index]))
    }

    /// Get a reference to an item in the arena
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        let index = self.allocated_index(id)?;
        Some(&self.storage[index])
    }

    /// Get a mutable reference to an item in the arena
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        let index = self.allocated_index(id)?;
        Some(&mut self.storage[index])
    }

    /// Check if an ID is valid and allocated
    pub fn contains(&self, id: NodeId) -> bool {
        self.allocated_index(id).is_some()
    }

    #[inline]
    fn allocated_index(&self, id: NodeId) -> Option<usize> {
        if id == NULL_NODE {
            return None;
        }
        let index = usize::try_from(id).ok()?;
        if self.allocated_mask.get(index).copied().unwrap_or(false) {
            Some(index)
        } else {
            None
        }
    }

    /// Get arena statistics
    pub fn stats(&self) -> ArenaStats {
        let total_capacity = self.storage.capacity();
        let allocated_count = self.len();
        let free_count = self.free_list.len();
        let utilization = if total_capacity > 0 {
            allocated_count as f64 / total_capacity as f64
        } else {
            0.0
        };

        ArenaStats {
            total_capacity,
            allocated_count,
            free_count,
            utilization,
        }
    }

    /// Get the number of allocated items
    pub fn len(&self) -> usize {
        self.storage.len() - self.free_list.len()
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the number of free slots
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Drop every slot, allocated or free.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.allocated_mask.clear();
        self.free_list.clear();
    }
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
