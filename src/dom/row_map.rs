use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute carrying a row's handle once it has been indexed
pub const ROW_ATTRIBUTE: &str = "data-case-finder-row";

/// Opaque reference to a table row
///
/// A handle is stamped on its row and stays with it when other rows are
/// inserted or removed. New rows get the next unused number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowHandle(pub usize);

impl fmt::Display for RowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row#{}", self.0)
    }
}

/// Map of row handles to their location in the element tree
/// Uses IndexMap to preserve document order
#[derive(Debug, Clone, Default)]
pub struct RowMap {
    /// Map from handle to the child-index path leading to the row
    map: IndexMap<RowHandle, Vec<usize>>,

    /// Next available handle
    next_handle: usize,
}

impl RowMap {
    /// Create a new empty RowMap
    pub fn new() -> Self {
        Self {
            map: IndexMap::new(),
            next_handle: 0,
        }
    }

    /// Register a new row by its tree path and return its handle
    pub fn register(&mut self, path: Vec<usize>) -> RowHandle {
        let handle = RowHandle(self.next_handle);
        self.map.insert(handle, path);
        self.next_handle += 1;
        handle
    }

    /// Record the current path of a row that already has a handle
    ///
    /// Returns false when the handle is taken in this map.
    pub fn relocate(&mut self, handle: RowHandle, path: Vec<usize>) -> bool {
        if self.map.contains_key(&handle) {
            return false;
        }
        self.map.insert(handle, path);
        self.next_handle = self.next_handle.max(handle.0 + 1);
        true
    }

    /// Get the tree path of a row
    pub fn path(&self, handle: RowHandle) -> Option<&[usize]> {
        self.map.get(&handle).map(Vec::as_slice)
    }

    /// Check if handle exists
    pub fn contains(&self, handle: RowHandle) -> bool {
        self.map.contains_key(&handle)
    }

    /// Get the number of registered rows
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Forget every row location; handles already given out are not reused
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// All handles in document order
    pub fn handles(&self) -> impl Iterator<Item = RowHandle> + '_ {
        self.map.keys().copied()
    }
}
