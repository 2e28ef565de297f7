//! Tabular Insight Library
//!
//! A table cleaning and statistics engine built with Rust and Polars.
//!
//! # Overview
//!
//! The library provides three operations on a [`DataFrame`](polars::prelude::DataFrame):
//!
//! - **Insights**: schema, descriptive statistics, missing-value counts and a preview
//! - **Preprocessing**: missing-value handling, IQR outlier capping and min-max
//!   normalization, applied in that fixed order and atomically per call
//! - **Analysis**: per-column statistics plus a declarative chart specification
//!
//! Loading and saving CSV files is available through [`loader`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_insight::{ActionSpec, TableLoader};
//!
//! let df = TableLoader::from_path("data.csv")?;
//!
//! let insights = lex_insight::compute_insights(&df)?;
//! println!("{}", insights.info_report());
//!
//! let spec = ActionSpec::new()
//!     .impute("age", "median")
//!     .cap_outliers("age")
//!     .normalize("income");
//! let outcome = lex_insight::preprocess(&df, &spec)?;
//! for line in outcome.log() {
//!     println!("{}", line);
//! }
//!
//! let result = lex_insight::analyze(&outcome.table, "city", "count")?;
//! ```
//!
//! # Configuration
//!
//! The free functions use [`EngineConfig::default()`]. Use the engines directly
//! to change the IQR multiplier, the zero-range normalization policy or the
//! chart and display settings:
//!
//! ```rust,ignore
//! use lex_insight::{DegeneratePolicy, EngineConfig, PreprocessingEngine};
//!
//! let config = EngineConfig::builder()
//!     .iqr_multiplier(3.0)
//!     .degenerate_policy(DegeneratePolicy::Error)
//!     .build()?;
//! let outcome = PreprocessingEngine::new(config).preprocess(&df, &spec)?;
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use analysis::StatisticalAnalyzer;
pub use config::{
    ConfigValidationError, DegeneratePolicy, EngineConfig, EngineConfigBuilder, MAX_HISTOGRAM_BINS,
};
pub use error::{InsightError, Result as InsightResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use loader::{TableLoader, cleaned_file_name, write_csv};
pub use pipeline::{MinMaxScaler, OutlierBounds, OutlierHandler, PreprocessingEngine};
pub use profiler::InsightGenerator;
pub use reporting::TableView;
pub use types::{
    ActionSpec, ActionType, AnalysisResult, BoxPlotSummary, CategoricalStats, CategoryCount,
    ChartData, ChartKind, ChartSpec, ColumnKind, ColumnSchema, ColumnStats, Description,
    HistogramBin, ImputationMethod, Insights, NumericStats, PreprocessOutcome,
    PreprocessingAction, StatEntry,
};

use polars::prelude::DataFrame;

/// Compute [`Insights`] with the default configuration.
pub fn compute_insights(df: &DataFrame) -> InsightResult<Insights> {
    InsightGenerator::default().compute_insights(df)
}

/// Apply an [`ActionSpec`] with the default configuration.
pub fn preprocess(df: &DataFrame, spec: &ActionSpec) -> InsightResult<PreprocessOutcome> {
    PreprocessingEngine::default().preprocess(df, spec)
}

/// Analyze one column with the default configuration.
pub fn analyze(df: &DataFrame, column: &str, chart_kind: &str) -> InsightResult<AnalysisResult> {
    StatisticalAnalyzer::default().analyze(df, column, chart_kind)
}
