//! Page model used for row matching
//!
//! This module provides the element tree the matcher scans. It includes:
//! - ElementNode: Representation of DOM elements with rendered-text helpers
//! - DomTree: Element tree with its table rows indexed in document order
//! - RowMap: Mapping of row handles to their location in the tree

pub mod element;
pub mod row_map;
pub mod tree;

pub use element::ElementNode;
pub use row_map::{ROW_ATTRIBUTE, RowHandle, RowMap};
pub use tree::{DomTree, RowText};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_node_export() {
        let element = ElementNode::new("tr");
        assert!(element.is_row());
    }

    #[test]
    fn test_row_map_export() {
        let map = RowMap::new();
        assert!(map.is_empty());
    }

    #[test]
    fn test_dom_tree_export() {
        let root = ElementNode::new("body");
        let tree = DomTree::new(root);
        assert_eq!(tree.root.tag_name, "body");
        assert_eq!(tree.count_rows(), 0);
    }
}
