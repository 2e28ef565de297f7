//! Custom error types for the insight engine.
//!
//! This module provides the error hierarchy using `thiserror` for the three
//! table operations (insights, preprocessing, analysis) and the loading helpers.
//!
//! Errors are serializable so a request-handling layer can forward them to a
//! frontend as `{ code, message }` objects.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the insight engine.
#[derive(Error, Debug)]
pub enum InsightError {
    /// Source data could not be parsed into a table.
    #[error("Failed to load dataset: {0}")]
    Load(String),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in the dataset.")]
    ColumnNotFound(String),

    /// Imputation method is unknown or cannot be applied to the column.
    #[error("Unsupported imputation method '{method}' for column '{column}': {reason}")]
    UnsupportedMethod {
        column: String,
        method: String,
        reason: String,
    },

    /// Normalization of a column whose min equals its max.
    #[error("Column '{0}' has zero range and cannot be min-max normalized")]
    DegenerateColumn(String),

    /// A statistic was requested on a column without any non-missing values.
    #[error("Cannot compute {operation} of column '{column}': no non-missing values")]
    EmptyColumn { column: String, operation: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<InsightError>,
    },
}

impl InsightError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        InsightError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for [`InsightError::EmptyColumn`].
    pub fn empty_column(column: impl Into<String>, operation: impl Into<String>) -> Self {
        InsightError::EmptyColumn {
            column: column.into(),
            operation: operation.into(),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Load(_) => "LOAD_ERROR",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::UnsupportedMethod { .. } => "UNSUPPORTED_METHOD",
            Self::DegenerateColumn(_) => "DEGENERATE_COLUMN",
            Self::EmptyColumn { .. } => "EMPTY_COLUMN",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by the caller's request rather than the data
    /// or the environment (bad column name, bad method, bad config).
    pub fn is_request_error(&self) -> bool {
        match self {
            Self::ColumnNotFound(_) | Self::UnsupportedMethod { .. } | Self::InvalidConfig(_) => {
                true
            }
            Self::WithContext { source, .. } => source.is_request_error(),
            _ => false,
        }
    }
}

impl From<crate::config::ConfigValidationError> for InsightError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        InsightError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields,
/// making them easy to handle in the frontend.
impl Serialize for InsightError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("InsightError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, InsightError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| InsightError::Polars(e).with_context(context))
    }
}
