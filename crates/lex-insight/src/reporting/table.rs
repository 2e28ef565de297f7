use crate::utils::any_value_to_string;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// A rectangular table of display strings with an optional row label column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    /// Column headers (without the row label column).
    pub header: Vec<String>,
    /// Row labels, empty when rows are unlabeled.
    pub row_labels: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            row_labels: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Append a labeled row.
    pub fn push_labeled_row(&mut self, label: impl Into<String>, cells: Vec<String>) {
        self.row_labels.push(label.into());
        self.rows.push(cells);
    }

    /// Append an unlabeled row.
    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Build a view of every cell of a DataFrame (use `head` first for previews).
    pub fn from_dataframe(df: &DataFrame) -> PolarsResult<Self> {
        let header = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let mut view = Self::new(header);

        for row_idx in 0..df.height() {
            let mut cells = Vec::with_capacity(df.width());
            for column in df.get_columns() {
                let value = column.as_materialized_series().get(row_idx)?;
                cells.push(any_value_to_string(&value));
            }
            view.push_row(cells);
        }

        Ok(view)
    }

    fn has_labels(&self) -> bool {
        !self.row_labels.is_empty()
    }

    /// Render as an HTML `<table>` with the given CSS classes.
    pub fn to_html(&self, classes: &str) -> String {
        let mut html = String::new();
        html.push_str(&format!(
            "<table border=\"1\" class=\"dataframe {}\">\n",
            escape_html(classes)
        ));

        html.push_str("  <thead>\n    <tr style=\"text-align: right;\">\n");
        if self.has_labels() {
            html.push_str("      <th></th>\n");
        }
        for name in &self.header {
            html.push_str(&format!("      <th>{}</th>\n", escape_html(name)));
        }
        html.push_str("    </tr>\n  </thead>\n");

        html.push_str("  <tbody>\n");
        for (idx, row) in self.rows.iter().enumerate() {
            html.push_str("    <tr>\n");
            if let Some(label) = self.row_labels.get(idx) {
                html.push_str(&format!("      <th>{}</th>\n", escape_html(label)));
            }
            for cell in row {
                html.push_str(&format!("      <td>{}</td>\n", escape_html(cell)));
            }
            html.push_str("    </tr>\n");
        }
        html.push_str("  </tbody>\n</table>");

        html
    }

    /// Render as right-aligned plain text, one line per row.
    pub fn to_text(&self) -> String {
        let label_width = self
            .row_labels
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);

        let widths: Vec<usize> = self
            .header
            .iter()
            .enumerate()
            .map(|(col_idx, name)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(col_idx))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = Vec::with_capacity(self.rows.len() + 1);

        let mut header_line = String::new();
        if self.has_labels() {
            header_line.push_str(&" ".repeat(label_width));
        }
        for (name, width) in self.header.iter().zip(&widths) {
            header_line.push_str(&format!("  {:>width$}", name, width = width));
        }
        lines.push(header_line);

        for (idx, row) in self.rows.iter().enumerate() {
            let mut line = String::new();
            if self.has_labels() {
                let label = self.row_labels.get(idx).map(String::as_str).unwrap_or("");
                line.push_str(&format!("{:<width$}", label, width = label_width));
            }
            for (cell, width) in row.iter().zip(&widths) {
                line.push_str(&format!("  {:>width$}", cell, width = width));
            }
            lines.push(line);
        }

        lines.join("\n")
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dataframe_renders_missing_as_nan() {
        let df = df![
            "name" => [Some("Ann"), None],
            "age" => [Some(30i64), Some(41)],
        ]
        .unwrap();

        let view = TableView::from_dataframe(&df).unwrap();
        assert_eq!(view.header, vec!["name".to_string(), "age".to_string()]);
        assert_eq!(view.rows[0], vec!["Ann".to_string(), "30".to_string()]);
        assert_eq!(view.rows[1][0], "NaN");
    }

    #[test]
    fn test_to_html_escapes_and_labels() {
        let mut view = TableView::new(vec!["a<b".to_string()]);
        view.push_labeled_row("count", vec!["1 & 2".to_string()]);

        let html = view.to_html("table table-striped");
        assert!(html.starts_with("<table border=\"1\" class=\"dataframe table table-striped\">"));
        assert!(html.contains("<th>a&lt;b</th>"));
        assert!(html.contains("<th>count</th>"));
        assert!(html.contains("<td>1 &amp; 2</td>"));
        assert!(html.ends_with("</table>"));
    }

    #[test]
    fn test_to_text_aligns_columns() {
        let mut view = TableView::new(vec!["age".to_string(), "income".to_string()]);
        view.push_labeled_row("mean", vec!["30.00".to_string(), "1,250.00".to_string()]);
        view.push_labeled_row("max", vec!["200.00".to_string(), "9.00".to_string()]);

        let text = view.to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "         age    income");
        assert_eq!(lines[1], "mean   30.00  1,250.00");
        assert_eq!(lines[2], "max   200.00      9.00");
    }

    #[test]
    fn test_to_text_aligns_non_ascii_cells() {
        let mut view = TableView::new(vec!["city".to_string()]);
        view.push_labeled_row("top", vec!["São Paulo".to_string()]);
        view.push_labeled_row("min", vec!["NY".to_string()]);

        let text = view.to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "          city");
        assert_eq!(lines[1], "top  São Paulo");
        assert_eq!(lines[2], "min         NY");
    }
}
