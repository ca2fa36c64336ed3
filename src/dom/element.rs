use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Tags whose content never contributes to rendered text
const NON_RENDERED_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Represents a DOM element node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementNode {
    /// HTML tag name (e.g., "table", "tr", "td")
    pub tag_name: String,

    /// Element attributes in source order (e.g., id, class, style)
    #[serde(default)]
    pub attributes: IndexMap<String, String>,

    /// Text content owned directly by the element
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    /// Child elements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: IndexMap::new(),
            text_content: None,
            children: Vec::new(),
        }
    }

    /// Builder method: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<ElementNode>) -> Self {
        self.children = children;
        self
    }

    /// Builder method: set a single attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_attribute(key, value);
        self
    }

    /// Build a `<tr>` whose cells hold the given texts
    pub fn row<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ElementNode::new("tr").with_children(
            cells
                .into_iter()
                .map(|text| ElementNode::new("td").with_text(text))
                .collect(),
        )
    }

    /// Add a single attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Add a child element
    pub fn add_child(&mut self, child: ElementNode) {
        self.children.push(child);
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    /// Get element ID
    pub fn id(&self) -> Option<&String> {
        self.attributes.get("id")
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Whether the element is a table row
    pub fn is_row(&self) -> bool {
        self.is_tag("tr")
    }

    /// Whether the element is a table cell
    pub fn is_cell(&self) -> bool {
        self.is_tag("td") || self.is_tag("th")
    }

    fn is_rendered(&self) -> bool {
        !NON_RENDERED_TAGS.iter().any(|tag| self.is_tag(tag))
            && self.style_property("display").as_deref() != Some("none")
    }

    /// Rendered text of the element and its descendants
    ///
    /// Cells of a row are separated by a tab, other pieces by a single space,
    /// the way a browser lays out `innerText` for a table row.
    pub fn inner_text(&self) -> String {
        if !self.is_rendered() {
            return String::new();
        }

        let mut parts = Vec::new();
        if let Some(text) = &self.text_content {
            let text = text.trim();
            if !text.is_empty() {
                parts.push(text.to_string());
            }
        }

        for child in &self.children {
            let text = child.inner_text();
            if !text.is_empty() {
                parts.push(text);
            }
        }

        let separator = if self.is_row() { "\t" } else { " " };
        parts.join(separator)
    }

    /// Rendered text of every direct cell of this element, in order
    pub fn cell_texts(&self) -> Vec<String> {
        self.children
            .iter()
            .filter(|child| child.is_cell())
            .map(|cell| cell.inner_text())
            .collect()
    }

    /// Read one property out of the inline `style` attribute
    pub fn style_property(&self, name: &str) -> Option<String> {
        self.get_attribute("style")?
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
            .map(|(_, value)| value.trim().to_string())
    }

    /// Set (or with an empty value, remove) one inline style property
    pub fn set_style_property(&mut self, name: &str, value: &str) {
        let mut declarations: Vec<(String, String)> = self
            .get_attribute("style")
            .map(|style| {
                style
                    .split(';')
                    .filter_map(|decl| decl.split_once(':'))
                    .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                    .filter(|(k, _)| !k.eq_ignore_ascii_case(name))
                    .collect()
            })
            .unwrap_or_default();

        if !value.is_empty() {
            declarations.push((name.to_string(), value.to_string()));
        }

        if declarations.is_empty() {
            self.attributes.shift_remove("style");
        } else {
            let style = declarations
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect::<Vec<_>>()
                .join("; ");
            self.attributes.insert("style".to_string(), style);
        }
    }

    /// Convert to a simplified string representation
    pub fn to_simple_string(&self) -> String {
        let mut parts = vec![format!("<{}", self.tag_name)];

        if let Some(id) = self.id() {
            parts.push(format!(" id=\"{}\"", id));
        }

        if let Some(style) = self.attributes.get("style") {
            parts.push(format!(" style=\"{}\"", style));
        }

        parts.push(">".to_string());

        let text = self.inner_text();
        if !text.is_empty() {
            parts.push(text);
        }

        parts.join("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_builder() {
        let row = ElementNode::row(["A-100-2024", "open"]);

        assert!(row.is_row());
        assert_eq!(row.children.len(), 2);
        assert!(row.children.iter().all(|c| c.is_cell()));
    }

    #[test]
    fn test_inner_text_joins_cells_with_tabs() {
        let row = ElementNode::row(["A-100-2024", "open", "Smith"]);
        assert_eq!(row.inner_text(), "A-100-2024\topen\tSmith");
    }

    #[test]
    fn test_inner_text_skips_scripts_and_hidden() {
        let mut cell = ElementNode::new("td").with_text("visible");
        cell.add_child(ElementNode::new("script").with_text("var x = 'A-1';"));
        cell.add_child(
            ElementNode::new("span")
                .with_attribute("style", "display: none")
                .with_text("hidden"),
        );

        assert_eq!(cell.inner_text(), "visible");
    }

    #[test]
    fn test_inner_text_nested_markup() {
        let cell = ElementNode::new("td").with_children(vec![
            ElementNode::new("a").with_text("B-200"),
            ElementNode::new("em").with_text("2024"),
        ]);
        assert_eq!(cell.inner_text(), "B-200 2024");
    }

    #[test]
    fn test_cell_texts() {
        let row = ElementNode::row(["one", "two", "three"]);
        assert_eq!(row.cell_texts(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_style_properties() {
        let mut row = ElementNode::row(["x"]);
        row.set_style_property("background-color", "yellow");
        assert_eq!(row.style_property("background-color").as_deref(), Some("yellow"));

        row.set_style_property("display", "none");
        row.set_style_property("background-color", "orange");
        assert_eq!(row.style_property("background-color").as_deref(), Some("orange"));
        assert_eq!(row.style_property("display").as_deref(), Some("none"));

        row.set_style_property("background-color", "");
        row.set_style_property("display", "");
        assert!(row.get_attribute("style").is_none());
    }

    #[test]
    fn test_serialization() {
        let element = ElementNode::row(["A-1", "open"]).with_attribute("id", "r1");

        let json = serde_json::to_string(&element).unwrap();
        let deserialized: ElementNode = serde_json::from_str(&json).unwrap();

        assert_eq!(element, deserialized);
    }

    #[test]
    fn test_to_simple_string() {
        let mut element = ElementNode::new("button")
            .with_attribute("id", "caseFinder-nextButton")
            .with_text("Next Match");
        element.set_style_property("display", "none");

        let simple = element.to_simple_string();
        assert!(simple.contains("<button"));
        assert!(simple.contains("id=\"caseFinder-nextButton\""));
        assert!(simple.contains("style=\"display: none\""));
    }
}
