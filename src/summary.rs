//! Summaries of matching rows
//!
//! A summary keeps the last two cells of every matching row and renders them
//! as a small standalone HTML document.

use crate::dom::RowText;
use crate::error::Result;
use crate::matcher::pattern::compile_patterns;
use serde::{Deserialize, Serialize};

/// Number of trailing cells kept per row
const SNAPSHOT_CELLS: usize = 2;

/// Trailing cell texts of one matching row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSnapshot {
    pub cells: Vec<String>,
}

impl RowSnapshot {
    /// Snapshot the last two cells of a row (fewer if the row is narrower)
    pub fn from_row(row: &RowText) -> Self {
        let skip = row.cells.len().saturating_sub(SNAPSHOT_CELLS);
        Self {
            cells: row.cells[skip..].to_vec(),
        }
    }
}

/// Collect snapshots of every row matching any case number
///
/// Rows come in document order; a row matching several case numbers is
/// repeated once per case number, in case order.
pub fn collect_summary(rows: &[RowText], case_numbers: &[String]) -> Vec<RowSnapshot> {
    let patterns = compile_patterns(case_numbers);
    let mut snapshots = Vec::new();

    for row in rows {
        for (_, pattern) in &patterns {
            if pattern.is_match(&row.text) {
                snapshots.push(RowSnapshot::from_row(row));
            }
        }
    }

    snapshots
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render snapshots as a self-contained HTML document
pub fn render_summary_document(title: &str, snapshots: &[RowSnapshot]) -> String {
    let mut rows = String::new();
    for snapshot in snapshots {
        rows.push_str("      <tr>");
        for cell in &snapshot.cells {
            rows.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        rows.push_str("</tr>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>
      body {{ font-family: sans-serif; margin: 16px; }}
      table {{ border-collapse: collapse; }}
      td {{ border: 1px solid #ccc; padding: 4px 8px; }}
    </style>
  </head>
  <body>
    <h1>{title}</h1>
    <table>
{rows}    </table>
  </body>
</html>
"#,
        title = escape_html(title),
        rows = rows,
    )
}

/// Opens a rendered document in a new viewing context
pub trait DocumentViewer: Send + Sync {
    fn open_document(&self, title: &str, html: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::RowHandle;

    fn row(i: usize, cells: &[&str]) -> RowText {
        RowText {
            handle: RowHandle(i),
            text: cells.join("\t"),
            cells: cells.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_snapshot_keeps_last_two_cells() {
        let snapshot = RowSnapshot::from_row(&row(0, &["A-1", "Smith", "2024-01-02", "open"]));
        assert_eq!(snapshot.cells, vec!["2024-01-02", "open"]);

        let narrow = RowSnapshot::from_row(&row(0, &["A-1"]));
        assert_eq!(narrow.cells, vec!["A-1"]);
    }

    #[test]
    fn test_collect_summary_order_and_duplicates() {
        let rows = vec![
            row(0, &["A-1 and B-2", "x", "first"]),
            row(1, &["C-3", "y", "second"]),
            row(2, &["B-2", "z", "third"]),
        ];
        let cases = vec!["B-2".to_string(), "A-1".to_string()];

        let summary = collect_summary(&rows, &cases);
        let last: Vec<_> = summary.iter().map(|s| s.cells[1].as_str()).collect();
        assert_eq!(last, vec!["first", "first", "third"]);
    }

    #[test]
    fn test_render_escapes_content() {
        let html = render_summary_document(
            "Cases <summary>",
            &[RowSnapshot {
                cells: vec!["<b>A&B</b>".to_string(), "open".to_string()],
            }],
        );

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Cases &lt;summary&gt;</title>"));
        assert!(html.contains("<tr><td>&lt;b&gt;A&amp;B&lt;/b&gt;</td><td>open</td></tr>"));
    }

    #[test]
    fn test_render_empty_summary() {
        let html = render_summary_document("Summary", &[]);
        assert!(html.contains("<table>"));
        assert!(!html.contains("<tr>"));
    }
}
