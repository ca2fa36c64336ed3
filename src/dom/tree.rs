use crate::dom::element::ElementNode;
use crate::dom::row_map::{ROW_ATTRIBUTE, RowHandle, RowMap};
use crate::error::{CaseFinderError, Result};
use serde::{Deserialize, Serialize};

/// Rendered text of one table row at scan time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowText {
    /// Handle of the row within the scan
    pub handle: RowHandle,

    /// Rendered text of the whole row
    pub text: String,

    /// Rendered text of each cell, in order
    #[serde(default)]
    pub cells: Vec<String>,
}

/// Represents the DOM tree of a web page
#[derive(Debug, Clone)]
pub struct DomTree {
    /// Root element of the DOM tree
    pub root: ElementNode,

    /// Map of row handles to tree paths
    pub row_map: RowMap,
}

impl DomTree {
    /// Create a new DomTree with its rows indexed
    pub fn new(root: ElementNode) -> Self {
        let mut tree = Self {
            root,
            row_map: RowMap::new(),
        };
        tree.index_rows();
        tree
    }

    /// Build a DOM tree from the JSON form of an element tree
    pub fn from_json(json: &str) -> Result<Self> {
        let root: ElementNode = serde_json::from_str(json)
            .map_err(|e| CaseFinderError::DomParseFailed(format!("Failed to parse DOM JSON: {}", e)))?;
        Ok(Self::new(root))
    }

    /// Convert the DOM tree to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.root)
            .map_err(|e| CaseFinderError::DomParseFailed(format!("Failed to serialize DOM to JSON: {}", e)))
    }

    /// Rebuild the row map by traversing the tree in document order
    ///
    /// Rows keep the handle stamped on them by an earlier pass; unstamped
    /// rows (and copies of an already seen stamp) get a fresh one.
    pub fn index_rows(&mut self) {
        self.row_map.clear();
        let mut path = Vec::new();
        Self::traverse_and_index(&mut self.root, &mut path, &mut self.row_map);
    }

    fn traverse_and_index(node: &mut ElementNode, path: &mut Vec<usize>, row_map: &mut RowMap) {
        if node.is_row() {
            let kept = Self::stamp_of(node).is_some_and(|handle| row_map.relocate(handle, path.clone()));
            if !kept {
                let handle = row_map.register(path.clone());
                node.add_attribute(ROW_ATTRIBUTE, handle.0.to_string());
            }
        }

        for (i, child) in node.children.iter_mut().enumerate() {
            path.push(i);
            Self::traverse_and_index(child, path, row_map);
            path.pop();
        }
    }

    fn stamp_of(node: &ElementNode) -> Option<RowHandle> {
        node.get_attribute(ROW_ATTRIBUTE)?.parse().ok().map(RowHandle)
    }

    /// Re-index and return the text of every row currently in the tree
    pub fn scan_rows(&mut self) -> Vec<RowText> {
        self.index_rows();
        self.row_map
            .handles()
            .filter_map(|handle| {
                self.row(handle).map(|row| RowText {
                    handle,
                    text: row.inner_text(),
                    cells: row.cell_texts(),
                })
            })
            .collect()
    }

    fn node_at(&self, path: &[usize]) -> Option<&ElementNode> {
        path.iter().try_fold(&self.root, |node, &i| node.children.get(i))
    }

    /// Whether the indexed path of a row still leads to that row
    fn path_is_current(&self, handle: RowHandle) -> bool {
        self.row_map
            .path(handle)
            .and_then(|path| self.node_at(path))
            .is_some_and(|node| Self::stamp_of(node) == Some(handle))
    }

    /// Get a row by handle
    ///
    /// Falls back to a search for the row's stamp when the tree changed
    /// since it was indexed.
    pub fn row(&self, handle: RowHandle) -> Option<&ElementNode> {
        if self.path_is_current(handle) {
            return self.row_map.path(handle).and_then(|path| self.node_at(path));
        }
        Self::find_row_recursive(&self.root, handle)
    }

    fn find_row_recursive(node: &ElementNode, handle: RowHandle) -> Option<&ElementNode> {
        if node.is_row() && Self::stamp_of(node) == Some(handle) {
            return Some(node);
        }
        node.children
            .iter()
            .find_map(|child| Self::find_row_recursive(child, handle))
    }

    /// Get a mutable row by handle
    pub fn row_mut(&mut self, handle: RowHandle) -> Option<&mut ElementNode> {
        if self.path_is_current(handle) {
            let path = self.row_map.path(handle)?.to_vec();
            return path
                .iter()
                .try_fold(&mut self.root, |node, &i| node.children.get_mut(i));
        }
        Self::find_row_mut_recursive(&mut self.root, handle)
    }

    fn find_row_mut_recursive(node: &mut ElementNode, handle: RowHandle) -> Option<&mut ElementNode> {
        if node.is_row() && Self::stamp_of(node) == Some(handle) {
            return Some(node);
        }
        node.children
            .iter_mut()
            .find_map(|child| Self::find_row_mut_recursive(child, handle))
    }

    /// Count indexed rows
    pub fn count_rows(&self) -> usize {
        self.row_map.len()
    }

    /// Count total elements in the tree
    pub fn count_elements(&self) -> usize {
        Self::count_elements_recursive(&self.root)
    }

    fn count_elements_recursive(node: &ElementNode) -> usize {
        1 + node.children.iter().map(Self::count_elements_recursive).sum::<usize>()
    }

    /// Find an element by its id attribute
    pub fn find_by_id(&self, id: &str) -> Option<&ElementNode> {
        Self::find_by_id_recursive(&self.root, id)
    }

    fn find_by_id_recursive<'a>(node: &'a ElementNode, id: &str) -> Option<&'a ElementNode> {
        if node.id().map(String::as_str) == Some(id) {
            return Some(node);
        }
        node.children
            .iter()
            .find_map(|child| Self::find_by_id_recursive(child, id))
    }

    /// Find a mutable element by its id attribute
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut ElementNode> {
        Self::find_by_id_mut_recursive(&mut self.root, id)
    }

    fn find_by_id_mut_recursive<'a>(node: &'a mut ElementNode, id: &str) -> Option<&'a mut ElementNode> {
        if node.id().map(String::as_str) == Some(id) {
            return Some(node);
        }
        node.children
            .iter_mut()
            .find_map(|child| Self::find_by_id_mut_recursive(child, id))
    }

    /// Append an element at the end of the root (the document body)
    pub fn append_to_body(&mut self, node: ElementNode) {
        self.root.add_child(node);
    }
}
