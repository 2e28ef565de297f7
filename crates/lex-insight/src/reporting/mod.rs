//! Report rendering module.
//!
//! Turns computed results into display-ready tables: HTML for a web frontend
//! and aligned plain text for the CLI.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_insight::reporting::TableView;
//!
//! let view = TableView::from_dataframe(&df.head(Some(5)))?;
//! println!("{}", view.to_text());
//! let html = view.to_html("table table-striped");
//! ```

mod table;

pub use table::TableView;
