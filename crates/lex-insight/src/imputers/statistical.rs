//! Statistical imputation methods.
//!
//! Provides mean, median, mode and row-removal handling of missing values.

use crate::error::{InsightError, Result};
use crate::types::{ActionType, ColumnKind, ImputationMethod, PreprocessingAction};
use crate::utils::{
    column_kind, fill_numeric_nulls, fill_string_nulls, mean, missing_count, mode_first_seen,
    non_null_numeric_values, numeric_mode, present_mask, quantile_sorted, sorted_copy,
    string_values,
};
use polars::prelude::*;
use tracing::{debug, warn};

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Handle the missing values of one column with the given method.
    ///
    /// Returns the logged action, or `None` when the column is absent or has
    /// no missing values.
    pub fn apply(
        df: &mut DataFrame,
        col_name: &str,
        method: ImputationMethod,
    ) -> Result<Option<PreprocessingAction>> {
        let Ok(column) = df.column(col_name) else {
            warn!("Skipping missing-value handling for absent column '{}'", col_name);
            return Ok(None);
        };

        let missing = missing_count(column.as_materialized_series())?;
        if missing == 0 {
            debug!("Column '{}' has no missing values", col_name);
            return Ok(None);
        }

        match method {
            ImputationMethod::Mean => Self::apply_numeric_mean(df, col_name)?,
            ImputationMethod::Median => Self::apply_numeric_median(df, col_name)?,
            ImputationMethod::Mode => Self::apply_mode_imputation(df, col_name)?,
            ImputationMethod::Remove => Self::remove_missing_rows(df, col_name)?,
        }

        let action_type = match method {
            ImputationMethod::Remove => ActionType::RowsRemoved,
            _ => ActionType::ValueImputed,
        };

        Ok(Some(PreprocessingAction::new(
            action_type,
            col_name,
            format!(
                "Handled {} missing values in '{}' using {}.",
                missing, col_name, method
            ),
        )))
    }

    /// Fill a numeric column's missing cells with the mean of its values.
    pub fn apply_numeric_mean(df: &mut DataFrame, col_name: &str) -> Result<()> {
        let values = Self::numeric_values_for(df, col_name, ImputationMethod::Mean)?;
        let mean_val =
            mean(&values).ok_or_else(|| InsightError::empty_column(col_name, "mean"))?;
        Self::fill_with_value(df, col_name, mean_val, "mean")
    }

    /// Fill a numeric column's missing cells with the median of its values.
    pub fn apply_numeric_median(df: &mut DataFrame, col_name: &str) -> Result<()> {
        let values = Self::numeric_values_for(df, col_name, ImputationMethod::Median)?;
        let median_val = quantile_sorted(&sorted_copy(&values), 0.5)
            .ok_or_else(|| InsightError::empty_column(col_name, "median"))?;
        Self::fill_with_value(df, col_name, median_val, "median")
    }

    /// Fill missing cells with the most frequent value (first seen wins ties).
    ///
    /// Numeric columns stay numeric (Float64); any other column becomes a string column.
    pub fn apply_mode_imputation(df: &mut DataFrame, col_name: &str) -> Result<()> {
        let series = df.column(col_name)?.as_materialized_series().clone();

        if column_kind(series.dtype()) == ColumnKind::Numeric {
            let values = non_null_numeric_values(&series)?;
            let mode_val =
                numeric_mode(&values).ok_or_else(|| InsightError::empty_column(col_name, "mode"))?;
            return Self::fill_with_value(df, col_name, mode_val, "mode");
        }

        let mode_val = mode_first_seen(string_values(&series)?.into_iter().flatten())
            .ok_or_else(|| InsightError::empty_column(col_name, "mode"))?;
        let filled = fill_string_nulls(&series, &mode_val)?;
        df.replace(col_name, filled)?;

        debug!("Filled '{}' with mode: '{}'", col_name, mode_val);
        Ok(())
    }

    /// Drop every row where the column is missing.
    pub fn remove_missing_rows(df: &mut DataFrame, col_name: &str) -> Result<()> {
        let rows_before = df.height();
        let mask = present_mask(df.column(col_name)?.as_materialized_series())?;
        *df = df.filter(&mask)?;

        debug!(
            "Removed {} rows with missing '{}'",
            rows_before - df.height(),
            col_name
        );
        Ok(())
    }

    /// Non-missing values of a column that must be numeric for `method`.
    fn numeric_values_for(
        df: &DataFrame,
        col_name: &str,
        method: ImputationMethod,
    ) -> Result<Vec<f64>> {
        let series = df.column(col_name)?.as_materialized_series();
        if column_kind(series.dtype()) != ColumnKind::Numeric {
            return Err(InsightError::UnsupportedMethod {
                column: col_name.to_string(),
                method: method.to_string(),
                reason: format!("column has non-numeric dtype {}", series.dtype()),
            });
        }
        Ok(non_null_numeric_values(series)?)
    }

    /// Fill numeric column with a specific value.
    fn fill_with_value(
        df: &mut DataFrame,
        col_name: &str,
        fill_value: f64,
        method: &str,
    ) -> Result<()> {
        let series = df.column(col_name)?.as_materialized_series();
        let filled = fill_numeric_nulls(series, fill_value)?;
        df.replace(col_name, filled)?;

        debug!("Filled '{}' with {}: {:.2}", col_name, method, fill_value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_at(df: &DataFrame, col: &str, idx: usize) -> f64 {
        df.column(col)
            .unwrap()
            .get(idx)
            .unwrap()
            .try_extract::<f64>()
            .unwrap()
    }

    // ========================================================================
    // apply() tests
    // ========================================================================

    #[test]
    fn test_apply_logs_count_and_method() {
        let mut df = df![
            "values" => [Some(1.0), None, Some(3.0), None, Some(5.0)],
        ]
        .unwrap();

        let action = StatisticalImputer::apply(&mut df, "values", ImputationMethod::Median)
            .unwrap()
            .expect("action should be logged");

        assert_eq!(action.action_type, ActionType::ValueImputed);
        assert_eq!(action.target, "values");
        assert_eq!(
            action.description,
            "Handled 2 missing values in 'values' using median."
        );
    }

    #[test]
    fn test_apply_no_nulls_is_silent() {
        let mut df = df![
            "values" => [1.0, 2.0, 3.0],
        ]
        .unwrap();
        let before = df.clone();

        let action = StatisticalImputer::apply(&mut df, "values", ImputationMethod::Mean).unwrap();

        assert!(action.is_none());
        assert!(df.equals(&before));
    }

    #[test]
    fn test_apply_nonexistent_column_is_silent() {
        let mut df = df![
            "other" => [Some(1.0), None],
        ]
        .unwrap();

        let action = StatisticalImputer::apply(&mut df, "values", ImputationMethod::Mean).unwrap();
        assert!(action.is_none());
        assert_eq!(df.column("other").unwrap().null_count(), 1);
    }

    // ========================================================================
    // mean / median tests
    // ========================================================================

    #[test]
    fn test_apply_numeric_mean_basic() {
        let mut df = df![
            "values" => [Some(10.0), None, Some(20.0)],
        ]
        .unwrap();

        StatisticalImputer::apply_numeric_mean(&mut df, "values").unwrap();

        let values = df.column("values").unwrap();
        assert_eq!(values.null_count(), 0);
        assert_eq!(f64_at(&df, "values", 0), 10.0);
        assert_eq!(f64_at(&df, "values", 1), 15.0);
        assert_eq!(f64_at(&df, "values", 2), 20.0);
    }

    #[test]
    fn test_apply_numeric_mean_integer_column_becomes_float() {
        let mut df = df![
            "age" => [Some(20i64), Some(25), None, Some(200), Some(30)],
        ]
        .unwrap();

        StatisticalImputer::apply_numeric_mean(&mut df, "age").unwrap();

        assert!(matches!(df.column("age").unwrap().dtype(), DataType::Float64));
        assert_eq!(f64_at(&df, "age", 2), 68.75);
    }

    #[test]
    fn test_apply_numeric_median_even_count_interpolates() {
        let mut df = df![
            "values" => [Some(1.0), None, Some(3.0), Some(10.0), Some(4.0)],
        ]
        .unwrap();

        StatisticalImputer::apply_numeric_median(&mut df, "values").unwrap();

        // Median of [1, 3, 4, 10] = 3.5
        assert_eq!(f64_at(&df, "values", 1), 3.5);
    }

    #[test]
    fn test_apply_numeric_median_all_nulls_fails() {
        let mut df = df![
            "values" => [Option::<f64>::None, None, None],
        ]
        .unwrap();

        let err = StatisticalImputer::apply(&mut df, "values", ImputationMethod::Median).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_COLUMN");
    }

    #[test]
    fn test_apply_mean_on_categorical_fails() {
        let mut df = df![
            "city" => [Some("NY"), None],
        ]
        .unwrap();

        let err = StatisticalImputer::apply(&mut df, "city", ImputationMethod::Mean).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_METHOD");
    }

    // ========================================================================
    // mode tests
    // ========================================================================

    #[test]
    fn test_apply_mode_imputation_categorical() {
        let mut df = df![
            "category" => [Some("A"), Some("B"), Some("A"), None, Some("A")],
        ]
        .unwrap();

        StatisticalImputer::apply_mode_imputation(&mut df, "category").unwrap();

        let values = string_values(df.column("category").unwrap().as_materialized_series()).unwrap();
        assert_eq!(values[3].as_deref(), Some("A"));
    }

    #[test]
    fn test_apply_mode_imputation_tie_breaking_first_seen() {
        let mut df = df![
            "category" => [Some("B"), Some("A"), None, Some("A"), Some("B")],
        ]
        .unwrap();

        StatisticalImputer::apply_mode_imputation(&mut df, "category").unwrap();

        let values = string_values(df.column("category").unwrap().as_materialized_series()).unwrap();
        assert_eq!(values[2].as_deref(), Some("B"));
    }

    #[test]
    fn test_apply_mode_imputation_numeric() {
        let mut df = df![
            "rating" => [Some(4i64), Some(5), Some(5), None, Some(4), Some(5)],
        ]
        .unwrap();

        StatisticalImputer::apply_mode_imputation(&mut df, "rating").unwrap();

        assert_eq!(f64_at(&df, "rating", 3), 5.0);
    }

    #[test]
    fn test_apply_mode_all_nulls_fails() {
        let mut df = df![
            "category" => [Option::<&str>::None, None],
        ]
        .unwrap();

        let err = StatisticalImputer::apply(&mut df, "category", ImputationMethod::Mode).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_COLUMN");
    }

    // ========================================================================
    // remove tests
    // ========================================================================

    #[test]
    fn test_remove_missing_rows_shrinks_every_column() {
        let mut df = df![
            "age" => [Some(20.0), None, Some(30.0), None],
            "city" => [Some("NY"), Some("LA"), None, Some("SF")],
        ]
        .unwrap();

        let action = StatisticalImputer::apply(&mut df, "age", ImputationMethod::Remove)
            .unwrap()
            .unwrap();

        assert_eq!(action.action_type, ActionType::RowsRemoved);
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("age").unwrap().null_count(), 0);
        // The remaining 'city' null was on a kept row
        assert_eq!(df.column("city").unwrap().null_count(), 1);
    }

    #[test]
    fn test_nan_cells_count_as_missing() {
        let mut df = df![
            "score" => [Some(1.0), Some(f64::NAN), Some(3.0), None],
        ]
        .unwrap();

        let action = StatisticalImputer::apply(&mut df, "score", ImputationMethod::Mean)
            .unwrap()
            .unwrap();

        assert_eq!(action.description, "Handled 2 missing values in 'score' using mean.");
        assert_eq!(f64_at(&df, "score", 1), 2.0);
        assert_eq!(f64_at(&df, "score", 3), 2.0);
    }

    #[test]
    fn test_remove_drops_nan_rows() {
        let mut df = df![
            "score" => [Some(1.0), Some(f64::NAN), Some(3.0)],
            "label" => ["a", "b", "c"],
        ]
        .unwrap();

        StatisticalImputer::apply(&mut df, "score", ImputationMethod::Remove)
            .unwrap()
            .unwrap();

        assert_eq!(df.height(), 2);
        let labels = string_values(df.column("label").unwrap().as_materialized_series()).unwrap();
        assert_eq!(labels, vec![Some("a".to_string()), Some("c".to_string())]);
    }
}
