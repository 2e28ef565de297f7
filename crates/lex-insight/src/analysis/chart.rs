//! Chart specification building.
//!
//! Charts are declarative: they carry the data to plot and leave drawing to
//! an external renderer.

use crate::config::{EngineConfig, MAX_HISTOGRAM_BINS};
use crate::error::Result;
use crate::pipeline::OutlierBounds;
use crate::types::{
    BoxPlotSummary, CategoryCount, ChartData, ChartKind, ChartSpec, ColumnKind, HistogramBin,
};
use crate::utils::{non_null_numeric_values, quantile_sorted, sorted_copy, string_values, value_frequencies};
use polars::prelude::*;
use tracing::warn;

/// Build the chart of a column, `None` when the kind does not fit the column.
pub(crate) fn build_chart(
    series: &Series,
    kind: ChartKind,
    column_kind: ColumnKind,
    config: &EngineConfig,
) -> Result<Option<ChartSpec>> {
    let column = series.name().to_string();

    let data = match (kind, column_kind) {
        (ChartKind::Histogram, ColumnKind::Numeric) => {
            let values = non_null_numeric_values(series)?;
            let bins = build_histogram(&sorted_copy(&values), config.histogram_bins);
            ChartData::Histogram {
                values,
                overlay_density: config.overlay_density,
                bins,
            }
        }
        (ChartKind::Boxplot, ColumnKind::Numeric) => {
            let values = non_null_numeric_values(series)?;
            let Some(summary) = box_plot_summary(&sorted_copy(&values), config.iqr_multiplier)
            else {
                warn!("No values to draw a boxplot of '{}'", column);
                return Ok(None);
            };
            ChartData::Boxplot { values, summary }
        }
        (ChartKind::Count, _) => ChartData::Count {
            categories: top_categories(series, config.count_chart_limit)?,
        },
        (kind, ColumnKind::Categorical) => {
            warn!(
                "A {} chart needs a numeric column, '{}' is categorical",
                kind.as_str(),
                column
            );
            return Ok(None);
        }
    };

    Ok(Some(ChartSpec {
        kind,
        title: format!("{} Plot of {}", kind.display_name(), column),
        x_label: column,
        data,
    }))
}

/// Equal-width histogram of sorted values; the last bin is closed.
///
/// `bins` is clamped to `1..=MAX_HISTOGRAM_BINS`.
pub(crate) fn build_histogram(sorted: &[f64], bins: usize) -> Vec<HistogramBin> {
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };
    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: sorted.len(),
        }];
    }

    let bin_count = bins.clamp(1, MAX_HISTOGRAM_BINS);
    let width = (max - min) / bin_count as f64;
    let mut counts = vec![0usize; bin_count];

    for value in sorted {
        let index = (((value - min) / width) as usize).min(bin_count - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| HistogramBin {
            start: min + idx as f64 * width,
            end: min + (idx as f64 + 1.0) * width,
            count,
        })
        .collect()
}

/// Five-number summary and whiskers of sorted values.
pub(crate) fn box_plot_summary(sorted: &[f64], multiplier: f64) -> Option<BoxPlotSummary> {
    let bounds = OutlierBounds::from_sorted(sorted, multiplier)?;
    let min = *sorted.first()?;
    let max = *sorted.last()?;

    let lower_whisker = sorted
        .iter()
        .copied()
        .find(|v| *v >= bounds.lower)
        .unwrap_or(min);
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|v| *v <= bounds.upper)
        .unwrap_or(max);

    Some(BoxPlotSummary {
        min,
        q1: bounds.q1,
        median: quantile_sorted(sorted, 0.5)?,
        q3: bounds.q3,
        max,
        lower_whisker,
        upper_whisker,
    })
}

/// The `limit` most frequent values, most frequent first, ties in first-seen order.
pub(crate) fn top_categories(series: &Series, limit: usize) -> Result<Vec<CategoryCount>> {
    let values = string_values(series)?.into_iter().flatten();
    Ok(value_frequencies(values)
        .into_iter()
        .take(limit)
        .map(|(value, count)| CategoryCount { value, count })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_histogram_counts_every_value() {
        let bins = build_histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4);

        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[3].end, 4.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
        // max lands in the last bin
        assert_eq!(bins[3].count, 2);
    }

    #[test]
    fn test_build_histogram_constant_values() {
        let bins = build_histogram(&[2.0, 2.0, 2.0], 10);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn test_build_histogram_bin_count_is_bounded() {
        let bins = build_histogram(&[0.0, 1.0, 2.0], usize::MAX);
        assert_eq!(bins.len(), MAX_HISTOGRAM_BINS);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_build_histogram_empty() {
        assert!(build_histogram(&[], 10).is_empty());
    }

    #[test]
    fn test_box_plot_summary_whiskers() {
        let summary = box_plot_summary(&[20.0, 25.0, 30.0, 200.0], 1.5).unwrap();

        assert_eq!(summary.min, 20.0);
        assert_eq!(summary.q1, 23.75);
        assert_eq!(summary.median, 27.5);
        assert_eq!(summary.q3, 72.5);
        assert_eq!(summary.max, 200.0);
        assert_eq!(summary.lower_whisker, 20.0);
        assert_eq!(summary.upper_whisker, 30.0);
    }

    #[test]
    fn test_top_categories_order_and_limit() {
        let series = Series::new("city".into(), &["NY", "NY", "LA", "SF", "LA", "NY"]);

        let counts = top_categories(&series, 15).unwrap();
        let pairs: Vec<(&str, usize)> = counts.iter().map(|c| (c.value.as_str(), c.count)).collect();
        assert_eq!(pairs, vec![("NY", 3), ("LA", 2), ("SF", 1)]);

        let limited = top_categories(&series, 2).unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_build_chart_histogram_on_categorical_is_none() {
        let series = Series::new("city".into(), &["NY", "LA"]);
        let chart = build_chart(
            &series,
            ChartKind::Histogram,
            ColumnKind::Categorical,
            &EngineConfig::default(),
        )
        .unwrap();
        assert!(chart.is_none());
    }

    #[test]
    fn test_build_chart_title_and_label() {
        let series = Series::new("age".into(), &[Some(1.0), None, Some(3.0)]);
        let chart = build_chart(
            &series,
            ChartKind::Boxplot,
            ColumnKind::Numeric,
            &EngineConfig::default(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(chart.title, "Boxplot Plot of age");
        assert_eq!(chart.x_label, "age");
        match chart.data {
            ChartData::Boxplot { values, .. } => assert_eq!(values, vec![1.0, 3.0]),
            other => panic!("expected boxplot data, got {:?}", other),
        }
    }
}
