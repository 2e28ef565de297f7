//! Descriptive statistics for the insight description table.

use crate::error::Result;
use crate::reporting::TableView;
use crate::types::{CategoricalDescription, Description, NumericDescription};
use crate::utils::{
    format_count, format_optional, mean, non_null_numeric_values, quantile_sorted, sample_std,
    sorted_copy, string_values, value_frequencies,
};
use polars::prelude::*;

/// Describe a numeric column: count, mean, std, min, quartiles and max.
pub(crate) fn describe_numeric(series: &Series) -> Result<NumericDescription> {
    let values = non_null_numeric_values(series)?;
    let sorted = sorted_copy(&values);

    Ok(NumericDescription {
        column: series.name().to_string(),
        count: values.len(),
        mean: mean(&values),
        std: sample_std(&values),
        min: sorted.first().copied(),
        q25: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q75: quantile_sorted(&sorted, 0.75),
        max: sorted.last().copied(),
    })
}

/// Describe a categorical column: count, distinct values, top value and its frequency.
pub(crate) fn describe_categorical(series: &Series) -> Result<CategoricalDescription> {
    let values: Vec<String> = string_values(series)?.into_iter().flatten().collect();
    let count = values.len();
    let frequencies = value_frequencies(values);
    let unique = frequencies.len();
    let (top, freq) = match frequencies.into_iter().next() {
        Some((value, freq)) => (Some(value), freq),
        None => (None, 0),
    };

    Ok(CategoricalDescription {
        column: series.name().to_string(),
        count,
        unique,
        top,
        freq,
    })
}

/// Lay the description out with statistics as rows and columns as table columns.
pub(crate) fn description_table(description: &Description, decimals: usize) -> TableView {
    match description {
        Description::Numeric(columns) => {
            let mut view = TableView::new(columns.iter().map(|c| c.column.clone()).collect());
            view.push_labeled_row(
                "count",
                columns.iter().map(|c| format_count(c.count)).collect(),
            );

            let rows: [(&str, fn(&NumericDescription) -> Option<f64>); 7] = [
                ("mean", |c| c.mean),
                ("std", |c| c.std),
                ("min", |c| c.min),
                ("25%", |c| c.q25),
                ("50%", |c| c.median),
                ("75%", |c| c.q75),
                ("max", |c| c.max),
            ];
            for (label, stat) in rows {
                view.push_labeled_row(
                    label,
                    columns
                        .iter()
                        .map(|c| format_optional(stat(c), decimals))
                        .collect(),
                );
            }
            view
        }
        Description::Categorical(columns) => {
            let mut view = TableView::new(columns.iter().map(|c| c.column.clone()).collect());
            view.push_labeled_row(
                "count",
                columns.iter().map(|c| format_count(c.count)).collect(),
            );
            view.push_labeled_row(
                "unique",
                columns.iter().map(|c| format_count(c.unique)).collect(),
            );
            view.push_labeled_row(
                "top",
                columns
                    .iter()
                    .map(|c| c.top.clone().unwrap_or_else(|| "NaN".to_string()))
                    .collect(),
            );
            view.push_labeled_row(
                "freq",
                columns.iter().map(|c| format_count(c.freq)).collect(),
            );
            view
        }
        Description::Empty => TableView::default(),
    }
}
