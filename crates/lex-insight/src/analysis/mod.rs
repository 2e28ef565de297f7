//! Column analysis: statistics plus a chart specification.
//!
//! Numeric columns get count, mean, sum, median and standard deviation;
//! categorical columns get count, distinct count and top value. Each result
//! also carries a display-ready list of labeled values.

mod chart;
mod stats;

use crate::config::EngineConfig;
use crate::error::{InsightError, Result};
use crate::types::{AnalysisResult, ChartKind, ColumnKind, ColumnStats};
use crate::utils::column_kind;
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Computes [`AnalysisResult`]s. Pure: the table is only read.
#[derive(Debug, Clone, Default)]
pub struct StatisticalAnalyzer {
    config: EngineConfig,
}

impl StatisticalAnalyzer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze one column and build the requested chart.
    ///
    /// An unrecognized `chart_kind` is not an error: the result has no chart.
    pub fn analyze(&self, df: &DataFrame, column: &str, chart_kind: &str) -> Result<AnalysisResult> {
        let series = df
            .column(column)
            .map_err(|_| InsightError::ColumnNotFound(column.to_string()))?
            .as_materialized_series();
        let kind = column_kind(series.dtype());

        info!("Analyzing {} column '{}'", kind, column);

        let (stats, display) = match kind {
            ColumnKind::Numeric => {
                let stats = stats::numeric_stats(series)?;
                let display = stats::numeric_display(&stats, self.config.display_decimals);
                (ColumnStats::Numeric(stats), display)
            }
            ColumnKind::Categorical => {
                let stats = stats::categorical_stats(series)?;
                let display = stats::categorical_display(&stats);
                (ColumnStats::Categorical(stats), display)
            }
        };

        let chart = match ChartKind::parse(chart_kind) {
            Some(chart_kind) => chart::build_chart(series, chart_kind, kind, &self.config)?,
            None => {
                warn!("Unrecognized chart kind '{}', no chart produced", chart_kind);
                None
            }
        };
        debug!("Chart produced for '{}': {}", column, chart.is_some());

        Ok(AnalysisResult {
            column: column.to_string(),
            stats,
            display,
            chart,
        })
    }
}

static_assertions::assert_impl_all!(StatisticalAnalyzer: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChartData;

    fn sample_df() -> DataFrame {
        df![
            "age" => [Some(20i64), Some(25), None, Some(200), Some(30)],
            "city" => ["NY", "NY", "LA", "SF", "LA"],
        ]
        .unwrap()
    }

    #[test]
    fn test_analyze_numeric_histogram() {
        let result = StatisticalAnalyzer::default()
            .analyze(&sample_df(), "age", "histogram")
            .unwrap();

        match &result.stats {
            ColumnStats::Numeric(stats) => {
                assert_eq!(stats.count, 4);
                assert_eq!(stats.sum, 275.0);
                assert_eq!(stats.mean, Some(68.75));
            }
            other => panic!("expected numeric stats, got {:?}", other),
        }
        assert_eq!(result.display[2].value, "275.00");

        let chart = result.chart.unwrap();
        assert_eq!(chart.kind, ChartKind::Histogram);
        assert_eq!(chart.title, "Histogram Plot of age");
        match chart.data {
            ChartData::Histogram {
                values,
                overlay_density,
                bins,
            } => {
                assert_eq!(values, vec![20.0, 25.0, 200.0, 30.0]);
                assert!(overlay_density);
                assert_eq!(bins.len(), 24);
            }
            other => panic!("expected histogram data, got {:?}", other),
        }
    }

    #[test]
    fn test_analyze_skips_nan_cells() {
        let df = df![
            "age" => [20.5, f64::NAN, 30.0, 1000.0, 21.0, 22.0],
        ]
        .unwrap();
        let result = StatisticalAnalyzer::default()
            .analyze(&df, "age", "boxplot")
            .unwrap();

        match &result.stats {
            ColumnStats::Numeric(stats) => {
                assert_eq!(stats.count, 5);
                assert_eq!(stats.sum, 1093.5);
                assert!(stats.std.is_some_and(f64::is_finite));
            }
            other => panic!("expected numeric stats, got {:?}", other),
        }
        assert_eq!(result.display[0].value, "5");
    }

    #[test]
    fn test_analyze_categorical_count() {
        let result = StatisticalAnalyzer::default()
            .analyze(&sample_df(), "city", "count")
            .unwrap();

        assert_eq!(
            result.stats,
            ColumnStats::Categorical(crate::types::CategoricalStats {
                count: 5,
                unique: 3,
                top: "NY".to_string(),
            })
        );
        assert_eq!(result.display[2].label, "Top Value");
        assert!(matches!(
            result.chart.map(|c| c.data),
            Some(ChartData::Count { .. })
        ));
    }

    #[test]
    fn test_analyze_unknown_chart_kind_has_no_chart() {
        let result = StatisticalAnalyzer::default()
            .analyze(&sample_df(), "age", "pie")
            .unwrap();
        assert!(result.chart.is_none());
        assert_eq!(result.display.len(), 5);
    }

    #[test]
    fn test_analyze_missing_column() {
        let err = StatisticalAnalyzer::default()
            .analyze(&sample_df(), "salary", "histogram")
            .unwrap_err();

        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
        assert_eq!(err.to_string(), "Column 'salary' not found in the dataset.");
    }

    #[test]
    fn test_analyze_respects_count_chart_limit() {
        let config = EngineConfig::builder().count_chart_limit(1).build().unwrap();
        let result = StatisticalAnalyzer::new(config)
            .analyze(&sample_df(), "city", "count")
            .unwrap();

        match result.chart.unwrap().data {
            ChartData::Count { categories } => {
                assert_eq!(categories.len(), 1);
                assert_eq!(categories[0].value, "NY");
            }
            other => panic!("expected count data, got {:?}", other),
        }
    }
}
