//! Shared utilities for the insight engine.
//!
//! This module contains common helper functions used across multiple modules
//! to reduce code duplication and ensure consistency: dtype classification,
//! value extraction, order statistics, frequency counting and display
//! formatting.

use crate::types::ColumnKind;
use indexmap::IndexMap;
use polars::prelude::*;
use std::hash::Hash;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Get the column kind of a DataType. Anything that is not a number is categorical.
#[inline]
pub fn column_kind(dtype: &DataType) -> ColumnKind {
    if is_numeric_dtype(dtype) {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

// =============================================================================
// Value Extraction Utilities
// =============================================================================

/// Read a Series as optional f64 values, one per row.
///
/// Float `NaN` is missing, like a null.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let casted = series.cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .map(|value| value.filter(|v| !v.is_nan()))
        .collect())
}

/// Read the non-missing values of a Series as f64, in row order.
pub fn non_null_numeric_values(series: &Series) -> PolarsResult<Vec<f64>> {
    Ok(numeric_values(series)?.into_iter().flatten().collect())
}

// =============================================================================
// Missing Value Utilities
// =============================================================================

#[inline]
fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Row mask that is `true` where a value is present (not null, not `NaN`).
pub fn present_mask(series: &Series) -> PolarsResult<BooleanChunked> {
    if !is_float_dtype(series.dtype()) {
        return Ok(series.is_not_null());
    }

    let present: Vec<bool> = numeric_values(series)?
        .iter()
        .map(Option::is_some)
        .collect();
    Ok(BooleanChunked::new(series.name().clone(), present.as_slice()))
}

/// Number of missing cells in a Series. Float `NaN` counts as missing.
pub fn missing_count(series: &Series) -> PolarsResult<usize> {
    if !is_float_dtype(series.dtype()) {
        return Ok(series.null_count());
    }

    Ok(numeric_values(series)?
        .iter()
        .filter(|value| value.is_none())
        .count())
}

/// Replace float `NaN` cells with nulls, leaving other columns untouched.
pub fn nan_to_null(df: &mut DataFrame) -> PolarsResult<()> {
    let float_columns: Vec<PlSmallStr> = df
        .get_columns()
        .iter()
        .filter(|column| is_float_dtype(column.dtype()))
        .map(|column| column.name().clone())
        .collect();

    for name in float_columns {
        let series = df.column(&name)?.as_materialized_series();
        let cleaned = Series::new(name.clone(), numeric_values(series)?);
        df.replace(&name, cleaned)?;
    }
    Ok(())
}

/// Read a Series as optional strings, one per row.
///
/// Non-string columns are cast first, so numbers come back in Polars'
/// display form (`20` for integers, `20.0` for floats).
pub fn string_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let casted = series.cast(&DataType::String)?;
    Ok(casted
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// Render a single cell for display. Missing cells render as `NaN`.
pub fn any_value_to_string(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => "NaN".to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => format!("{}", other),
    }
}

// =============================================================================
// Order Statistics
// =============================================================================

/// Return a sorted copy of `values` (ascending, total order).
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Quantile of already sorted values using linear interpolation between the
/// two closest ranks: position `q * (n - 1)`.
///
/// Returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], quantile: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = quantile.clamp(0.0, 1.0) * (sorted.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let weight = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1 denominator), `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
    Some(variance.sqrt())
}

// =============================================================================
// Frequency Utilities
// =============================================================================

/// Count occurrences and order them by descending count.
///
/// Ties keep first-seen order: the value that appeared earlier in the input
/// comes first.
pub fn value_frequencies<K, I>(values: I) -> Vec<(K, usize)>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    let mut counts: IndexMap<K, usize> = IndexMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut entries: Vec<(K, usize)> = counts.into_iter().collect();
    // stable sort keeps insertion order among equal counts
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

/// Most frequent value, ties broken by first-seen order.
pub fn mode_first_seen<K, I>(values: I) -> Option<K>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    value_frequencies(values)
        .into_iter()
        .next()
        .map(|(value, _)| value)
}

/// Most frequent f64 value, ties broken by first-seen order.
pub fn numeric_mode(values: &[f64]) -> Option<f64> {
    // -0.0 and 0.0 count as the same value
    mode_first_seen(values.iter().map(|v| (v + 0.0).to_bits())).map(f64::from_bits)
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value. The result is Float64.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let filled: Vec<Option<f64>> = numeric_values(series)?
        .into_iter()
        .map(|value| Some(value.unwrap_or(fill_value)))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

/// Fill null values in a Series with a string value. The result is a String column.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let filled: Vec<Option<String>> = string_values(series)?
        .into_iter()
        .map(|value| Some(value.unwrap_or_else(|| fill_value.to_string())))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

// =============================================================================
// Display Formatting
// =============================================================================

/// Insert thousands separators into a string of ASCII digits.
fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Format a count with thousands separators (`1234567` -> `1,234,567`).
pub fn format_count(count: usize) -> String {
    group_digits(&count.to_string())
}

/// Format a number with thousands separators and a fixed number of decimals
/// (`1234.5` -> `1,234.50`). Non-finite values render as `nan`/`inf`/`-inf`.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    // "-0.00" is not worth a sign
    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, group_digits(int_part), frac),
        None => format!("{}{}", sign, group_digits(int_part)),
    }
}

/// Format an optional statistic, absent values render as `nan`.
pub fn format_optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "nan".to_string(), |v| format_grouped(v, decimals))
}
