//! Insight generation for freshly loaded datasets.
//!
//! This module provides the first feedback a caller gets about a table:
//! - Schema (column name, kind, dtype, non-null count)
//! - Descriptive statistics, rendered as a display-ready table
//! - Missing-value counts per column
//! - A preview of the first rows

mod statistics;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::reporting::TableView;
use crate::types::{ColumnKind, ColumnSchema, Description, Insights};
use crate::utils::{column_kind, missing_count};
use indexmap::IndexMap;
use polars::prelude::*;
use tracing::{debug, info};

pub(crate) use statistics::{describe_categorical, describe_numeric, description_table};

/// Computes [`Insights`] for a table. Pure: the table is only read.
#[derive(Debug, Clone, Default)]
pub struct InsightGenerator {
    config: EngineConfig,
}

impl InsightGenerator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute schema, description, missing counts and preview of a table.
    pub fn compute_insights(&self, df: &DataFrame) -> Result<Insights> {
        info!("Computing insights for dataset of shape {:?}", df.shape());

        let schema = Self::schema(df)?;
        let numeric_columns: Vec<String> = schema
            .iter()
            .filter(|col| col.kind == ColumnKind::Numeric)
            .map(|col| col.name.clone())
            .collect();
        let all_columns: Vec<String> = schema.iter().map(|col| col.name.clone()).collect();

        let description = Self::describe(df, &numeric_columns)?;
        let description_html = description_table(&description, self.config.display_decimals)
            .to_html(&self.config.html_table_classes);

        let missing_values = Self::missing_values(df)?;
        debug!("{} columns have missing values", missing_values.len());

        let preview = df.head(Some(self.config.preview_rows));
        let preview_html =
            TableView::from_dataframe(&preview)?.to_html(&self.config.html_table_classes);

        Ok(Insights {
            rows: df.height(),
            columns: df.width(),
            schema,
            estimated_size_bytes: df.estimated_size(),
            description,
            description_html,
            missing_values,
            numeric_columns,
            all_columns,
            preview_html,
        })
    }

    /// Render the description of a table as aligned text (used by the CLI).
    pub fn description_text(&self, insights: &Insights) -> String {
        description_table(&insights.description, self.config.display_decimals).to_text()
    }

    fn schema(df: &DataFrame) -> Result<Vec<ColumnSchema>> {
        df.get_columns()
            .iter()
            .map(|column| {
                let missing = missing_count(column.as_materialized_series())?;
                Ok(ColumnSchema {
                    name: column.name().to_string(),
                    kind: column_kind(column.dtype()),
                    dtype: column.dtype().to_string(),
                    non_null_count: column.len() - missing,
                })
            })
            .collect()
    }

    fn describe(df: &DataFrame, numeric_columns: &[String]) -> Result<Description> {
        if df.width() == 0 {
            return Ok(Description::Empty);
        }

        if numeric_columns.is_empty() {
            let columns = df
                .get_columns()
                .iter()
                .map(|column| describe_categorical(column.as_materialized_series()))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Description::Categorical(columns));
        }

        let columns = numeric_columns
            .iter()
            .map(|name| describe_numeric(df.column(name)?.as_materialized_series()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Description::Numeric(columns))
    }

    fn missing_values(df: &DataFrame) -> Result<IndexMap<String, usize>> {
        let mut missing = IndexMap::new();
        for column in df.get_columns() {
            let count = missing_count(column.as_materialized_series())?;
            if count > 0 {
                missing.insert(column.name().to_string(), count);
            }
        }
        Ok(missing)
    }
}

static_assertions::assert_impl_all!(InsightGenerator: Send, Sync);
