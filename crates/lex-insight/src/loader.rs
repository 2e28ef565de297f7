//! CSV loading and writing.
//!
//! Loading tries progressively more forgiving strategies before giving up:
//! 1. Standard parsing with `"` as the quote character
//! 2. Parsing without quote handling
//! 3. Parsing after a pre-clean of the raw text (doubled quotes collapsed,
//!    blank lines dropped)
//!
//! Cells holding a common missing-value marker (`NA`, `NaN`, `null`, ...)
//! load as nulls, and any float `NaN` left after parsing becomes a null too.

use crate::error::{InsightError, Result, ResultExt};
use crate::utils::nan_to_null;
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Rows scanned to infer column dtypes.
const INFER_SCHEMA_ROWS: usize = 100;

/// Cell texts read as missing values.
const NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Loads headered, comma-delimited CSV into a [`DataFrame`].
pub struct TableLoader;

impl TableLoader {
    /// Load a `.csv` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            return Err(InsightError::Load(
                "Invalid file type, please upload a CSV".to_string(),
            ));
        }

        info!("Loading dataset from: {}", path.display());
        let bytes = fs::read(path).map_err(|e| {
            InsightError::Load(format!("Could not read '{}': {}", path.display(), e))
        })?;

        let df = Self::from_bytes(&bytes)?;
        info!("Dataset loaded successfully: {:?}", df.shape());
        Ok(df)
    }

    /// Load CSV content already in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<DataFrame> {
        let mut df = Self::read_with_fallbacks(bytes)?;
        nan_to_null(&mut df)?;
        Ok(df)
    }

    fn read_with_fallbacks(bytes: &[u8]) -> Result<DataFrame> {
        match Self::read(bytes.to_vec(), Some(b'"')) {
            Ok(df) => return Ok(df),
            Err(e) => debug!("Standard loading failed: {}", e),
        }

        match Self::read(bytes.to_vec(), None) {
            Ok(df) => return Ok(df),
            Err(e) => debug!("Loading without quotes failed: {}", e),
        }

        let cleaned = clean_csv_content(&String::from_utf8_lossy(bytes));
        Self::read(cleaned.into_bytes(), Some(b'"'))
            .map_err(|e| InsightError::Load(format!("Could not parse CSV: {}", e)))
    }

    fn read(bytes: Vec<u8>, quote_char: Option<u8>) -> PolarsResult<DataFrame> {
        let null_values = NullValues::AllColumns(
            NULL_TOKENS.iter().map(|token| PlSmallStr::from_str(token)).collect(),
        );
        let parse_options = CsvParseOptions::default()
            .with_quote_char(quote_char)
            .with_null_values(Some(null_values));

        CsvReadOptions::default()
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .with_has_header(true)
            .with_parse_options(parse_options)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()
    }
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write a table as headered CSV, creating parent directories.
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)
        .context(format!("Failed to write '{}'", path.display()))?;

    info!("Dataset saved: {}", path.display());
    Ok(())
}

/// Name under which a cleaned table is saved (`cleaned_<name>`).
pub fn cleaned_file_name(name: &str) -> String {
    format!("cleaned_{}", name)
}
