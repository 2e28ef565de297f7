//! Per-column statistics and their display form.

use crate::error::{InsightError, Result};
use crate::types::{CategoricalStats, NumericStats, StatEntry};
use crate::utils::{
    format_count, format_optional, mean, non_null_numeric_values, quantile_sorted, sample_std,
    sorted_copy, string_values, value_frequencies,
};
use polars::prelude::*;

/// Count, mean, sum, median and sample standard deviation of a numeric column.
pub(crate) fn numeric_stats(series: &Series) -> Result<NumericStats> {
    let values = non_null_numeric_values(series)?;
    let sorted = sorted_copy(&values);

    Ok(NumericStats {
        count: values.len(),
        mean: mean(&values),
        sum: values.iter().sum(),
        median: quantile_sorted(&sorted, 0.5),
        std: sample_std(&values),
    })
}

/// Count, distinct count and most frequent value of a categorical column.
pub(crate) fn categorical_stats(series: &Series) -> Result<CategoricalStats> {
    let values: Vec<String> = string_values(series)?.into_iter().flatten().collect();
    let count = values.len();
    let frequencies = value_frequencies(values);
    let unique = frequencies.len();

    let top = frequencies
        .into_iter()
        .next()
        .map(|(value, _)| value)
        .ok_or_else(|| InsightError::empty_column(series.name().as_str(), "top value"))?;

    Ok(CategoricalStats { count, unique, top })
}

pub(crate) fn numeric_display(stats: &NumericStats, decimals: usize) -> Vec<StatEntry> {
    vec![
        StatEntry::new("Count", format_count(stats.count)),
        StatEntry::new("Mean (Average)", format_optional(stats.mean, decimals)),
        StatEntry::new("Total (Sum)", format_optional(Some(stats.sum), decimals)),
        StatEntry::new("Median", format_optional(stats.median, decimals)),
        StatEntry::new("Std Deviation", format_optional(stats.std, decimals)),
    ]
}

pub(crate) fn categorical_display(stats: &CategoricalStats) -> Vec<StatEntry> {
    vec![
        StatEntry::new("Count", format_count(stats.count)),
        StatEntry::new("Unique Values", format_count(stats.unique)),
        StatEntry::new("Top Value", stats.top.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_stats() {
        let series = Series::new("price".into(), &[Some(1000.0), None, Some(2500.5), Some(1500.0)]);
        let stats = numeric_stats(&series).unwrap();

        assert_eq!(stats.count, 3);
        assert_eq!(stats.sum, 5000.5);
        assert_eq!(stats.median, Some(1500.0));
        assert!((stats.mean.unwrap() - 5000.5 / 3.0).abs() < 1e-9);
        assert!(stats.std.is_some());
    }

    #[test]
    fn test_numeric_stats_without_values() {
        let series = Series::new("x".into(), &[Option::<f64>::None]);
        let stats = numeric_stats(&series).unwrap();

        assert_eq!(stats.count, 0);
        assert_eq!(stats.sum, 0.0);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.median, None);
    }

    #[test]
    fn test_numeric_display_groups_thousands() {
        let stats = NumericStats {
            count: 1200,
            mean: Some(1234.567),
            sum: 1481480.4,
            median: Some(1000.0),
            std: None,
        };
        let display = numeric_display(&stats, 2);

        let labels: Vec<&str> = display.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Count", "Mean (Average)", "Total (Sum)", "Median", "Std Deviation"]
        );
        assert_eq!(display[0].value, "1,200");
        assert_eq!(display[1].value, "1,234.57");
        assert_eq!(display[2].value, "1,481,480.40");
        assert_eq!(display[4].value, "nan");
    }

    #[test]
    fn test_categorical_stats_tie_breaks_first_seen() {
        let series = Series::new("color".into(), &[Some("red"), Some("blue"), None, Some("blue"), Some("red")]);
        let stats = categorical_stats(&series).unwrap();

        assert_eq!(stats.count, 4);
        assert_eq!(stats.unique, 2);
        assert_eq!(stats.top, "red");
    }

    #[test]
    fn test_categorical_stats_empty_column_fails() {
        let series = Series::new("color".into(), &[Option::<&str>::None, None]);
        let err = categorical_stats(&series).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_COLUMN");
    }
}
