use indexmap::IndexMap;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InsightError;

// ============================================================================
// Table Model
// ============================================================================

/// Kind of a column, inferred from its Polars dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating point values.
    Numeric,
    /// Everything else (strings, booleans, dates, ...).
    Categorical,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Insight Types
// ============================================================================

/// Structural description of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub kind: ColumnKind,
    /// Polars dtype, as displayed by Polars (e.g. `i64`, `str`).
    pub dtype: String,
    pub non_null_count: usize,
}

/// Descriptive statistics of one numeric column.
///
/// Percentiles use linear interpolation, `std` is the sample standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericDescription {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Descriptive statistics of one categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalDescription {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

/// Descriptive statistics of a table.
///
/// Numeric columns are described when there are any; otherwise every column
/// is described as categorical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "columns", rename_all = "snake_case")]
pub enum Description {
    Numeric(Vec<NumericDescription>),
    Categorical(Vec<CategoricalDescription>),
    /// The table has no columns.
    Empty,
}

/// Initial feedback about a freshly loaded table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insights {
    pub rows: usize,
    pub columns: usize,
    pub schema: Vec<ColumnSchema>,
    /// Estimated in-memory size of the table in bytes.
    pub estimated_size_bytes: usize,
    pub description: Description,
    /// Description rendered as an HTML table.
    pub description_html: String,
    /// Missing-value counts, only for columns with at least one missing value.
    pub missing_values: IndexMap<String, usize>,
    pub numeric_columns: Vec<String>,
    pub all_columns: Vec<String>,
    /// First rows of the table rendered as an HTML table.
    pub preview_html: String,
}

impl Insights {
    /// Text report of the table structure: shape, one line per column, and size.
    pub fn info_report(&self) -> String {
        let name_width = self
            .schema
            .iter()
            .map(|col| col.name.len())
            .max()
            .unwrap_or(0)
            .max("Column".len());

        let mut report = String::new();
        report.push_str(&format!("Rows: {}\n", self.rows));
        report.push_str(&format!("Data columns (total {} columns):\n", self.columns));
        report.push_str(&format!(
            " {:<3} {:<name_width$}  {:<14}  {:<11}  {}\n",
            "#", "Column", "Non-Null Count", "Kind", "Dtype"
        ));
        report.push_str(&format!(
            " {:<3} {:<name_width$}  {:<14}  {:<11}  {}\n",
            "---",
            "-".repeat("Column".len()),
            "-".repeat(14),
            "-".repeat(4),
            "-".repeat(5)
        ));
        for (idx, col) in self.schema.iter().enumerate() {
            report.push_str(&format!(
                " {:<3} {:<name_width$}  {:<14}  {:<11}  {}\n",
                idx,
                col.name,
                format!("{} non-null", col.non_null_count),
                col.kind.as_str(),
                col.dtype
            ));
        }
        report.push_str(&format!(
            "memory usage: {}\n",
            format_bytes(self.estimated_size_bytes)
        ));
        report
    }
}

fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["bytes", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} bytes", bytes)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

// ============================================================================
// Preprocessing Types
// ============================================================================

/// Method used to handle missing values in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationMethod {
    /// Fill with the mean of non-missing values (numeric only).
    Mean,
    /// Fill with the median of non-missing values (numeric only).
    Median,
    /// Fill with the most frequent value, ties broken by first-seen order.
    Mode,
    /// Drop every row where the column is missing.
    Remove,
}

impl ImputationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
            Self::Remove => "remove",
        }
    }

    /// Resolve a method name for a column, failing with `UnsupportedMethod`.
    pub fn parse_for(column: &str, method: &str) -> Result<Self, InsightError> {
        method
            .parse()
            .map_err(|reason: String| InsightError::UnsupportedMethod {
                column: column.to_string(),
                method: method.to_string(),
                reason,
            })
    }
}

impl FromStr for ImputationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "mode" => Ok(Self::Mode),
            "remove" => Ok(Self::Remove),
            _ => Err("expected one of mean, median, mode, remove".to_string()),
        }
    }
}

impl AsRef<str> for ImputationMethod {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ImputationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The cleaning actions requested by a caller.
///
/// Deserializes from `{"missing_values": {"age": "mean"}, "outliers": ["age"],
/// "normalize": ["age"]}`; every part is optional and the key order of
/// `missing_values` is the processing order.
///
/// # Example
///
/// ```rust,ignore
/// use lex_insight::{ActionSpec, ImputationMethod};
///
/// let spec = ActionSpec::new()
///     .impute("age", ImputationMethod::Mean)
///     .cap_outliers("age")
///     .normalize("age");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Column name -> imputation method name.
    #[serde(default)]
    pub missing_values: IndexMap<String, String>,
    /// Columns to outlier-cap.
    #[serde(default)]
    pub outliers: Vec<String>,
    /// Columns to min-max normalize.
    #[serde(default)]
    pub normalize: Vec<String>,
}

impl ActionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a request from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, InsightError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Request missing-value handling for a column.
    pub fn impute(mut self, column: impl Into<String>, method: impl AsRef<str>) -> Self {
        self.missing_values
            .insert(column.into(), method.as_ref().to_string());
        self
    }

    /// Request outlier capping for a column.
    pub fn cap_outliers(mut self, column: impl Into<String>) -> Self {
        self.outliers.push(column.into());
        self
    }

    /// Request min-max normalization for a column.
    pub fn normalize(mut self, column: impl Into<String>) -> Self {
        self.normalize.push(column.into());
        self
    }

    /// True when no action of any category is requested.
    pub fn is_empty(&self) -> bool {
        self.missing_values.is_empty() && self.outliers.is_empty() && self.normalize.is_empty()
    }
}

/// A single action taken during preprocessing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingAction {
    /// Type of action performed.
    pub action_type: ActionType,
    /// Column the action applied to.
    pub target: String,
    /// Human-readable description of the action (one log line).
    pub description: String,
}

impl PreprocessingAction {
    /// Create a new preprocessing action.
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
        }
    }
}

/// Types of actions that can be taken during preprocessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Missing values were imputed.
    ValueImputed,
    /// Rows with a missing value in the column were removed.
    RowsRemoved,
    /// Outliers were capped.
    OutlierHandled,
    /// Data was min-max normalized.
    DataNormalized,
}

impl ActionType {
    /// Get a human-readable display name for the action type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ValueImputed => "Value Imputed",
            Self::RowsRemoved => "Rows Removed",
            Self::OutlierHandled => "Outlier Handled",
            Self::DataNormalized => "Data Normalized",
        }
    }
}

/// Result of a preprocessing call.
#[derive(Debug, Clone)]
pub struct PreprocessOutcome {
    /// The transformed table.
    pub table: DataFrame,
    /// Actions with observable effect, in the order they were applied.
    pub actions: Vec<PreprocessingAction>,
    pub rows_before: usize,
    pub rows_after: usize,
}

impl PreprocessOutcome {
    /// The human-readable log, one line per action.
    pub fn log(&self) -> Vec<String> {
        self.actions
            .iter()
            .map(|action| action.description.clone())
            .collect()
    }

    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }
}

// ============================================================================
// Analysis Types
// ============================================================================

/// Kind of chart a caller can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Histogram,
    Boxplot,
    Count,
}

impl ChartKind {
    /// Parse a chart kind name; unrecognized names give `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "histogram" => Some(Self::Histogram),
            "boxplot" => Some(Self::Boxplot),
            "count" => Some(Self::Count),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Histogram => "histogram",
            Self::Boxplot => "boxplot",
            Self::Count => "count",
        }
    }

    /// Capitalized name used in chart titles.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Histogram => "Histogram",
            Self::Boxplot => "Boxplot",
            Self::Count => "Count",
        }
    }
}

/// Histogram bin with half-open range `[start, end)` (the last bin is closed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Box plot summary values for numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value inside the lower outlier bound.
    pub lower_whisker: f64,
    /// Largest value inside the upper outlier bound.
    pub upper_whisker: f64,
}

/// Simple category count entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// What to plot, by chart kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
    Histogram {
        values: Vec<f64>,
        overlay_density: bool,
        bins: Vec<HistogramBin>,
    },
    Boxplot {
        values: Vec<f64>,
        summary: BoxPlotSummary,
    },
    Count {
        categories: Vec<CategoryCount>,
    },
}

/// Declarative chart description handed to an external renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub data: ChartData,
}

/// Statistics of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub sum: f64,
    pub median: Option<f64>,
    pub std: Option<f64>,
}

/// Statistics of a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalStats {
    pub count: usize,
    pub unique: usize,
    pub top: String,
}

/// Kind-dependent column statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStats {
    Numeric(NumericStats),
    Categorical(CategoricalStats),
}

/// One formatted statistic, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    pub label: String,
    pub value: String,
}

impl StatEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Result of analyzing one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub column: String,
    pub stats: ColumnStats,
    /// Statistics formatted for display, in display order.
    pub display: Vec<StatEntry>,
    /// `None` when the chart kind is unrecognized or does not fit the column.
    pub chart: Option<ChartSpec>,
}
