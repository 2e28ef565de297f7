//! Preprocessing engine module.
//!
//! Applies an [`ActionSpec`] to a table in a fixed order: missing values,
//! then outliers, then normalization. The input table is never modified;
//! a failing call returns no table at all.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::imputers::StatisticalImputer;
use crate::pipeline::outliers::OutlierHandler;
use crate::pipeline::scaling::MinMaxScaler;
use crate::types::{ActionSpec, ImputationMethod, PreprocessOutcome, PreprocessingAction};
use indexmap::IndexSet;
use polars::prelude::*;
use tracing::{debug, info};

/// Executes preprocessing requests against a table.
#[derive(Debug, Clone, Default)]
pub struct PreprocessingEngine {
    config: EngineConfig,
}

impl PreprocessingEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply the requested actions to a copy of `df`.
    ///
    /// Every imputation method name is checked before anything runs, so an
    /// unknown method fails the call even when its column does not exist.
    pub fn preprocess(&self, df: &DataFrame, spec: &ActionSpec) -> Result<PreprocessOutcome> {
        let methods = Self::resolve_methods(spec)?;

        info!(
            "Preprocessing dataset of shape {:?}: {} imputations, {} outlier columns, {} normalized columns",
            df.shape(),
            methods.len(),
            spec.outliers.len(),
            spec.normalize.len()
        );

        let rows_before = df.height();
        let mut working = df.clone();
        let mut actions: Vec<PreprocessingAction> = Vec::new();

        info!("Step 1: Handling missing values...");
        for (col_name, method) in &methods {
            debug!("Handling missing values in '{}' with {}", col_name, method);
            actions.extend(StatisticalImputer::apply(&mut working, col_name, *method)?);
        }

        info!("Step 2: Capping outliers...");
        for col_name in unique_columns(&spec.outliers) {
            actions.extend(OutlierHandler::cap_outliers(
                &mut working,
                col_name,
                self.config.iqr_multiplier,
            )?);
        }

        info!("Step 3: Normalizing columns...");
        for col_name in unique_columns(&spec.normalize) {
            actions.extend(MinMaxScaler::normalize(
                &mut working,
                col_name,
                self.config.degenerate_policy,
            )?);
        }

        let rows_after = working.height();
        info!(
            "Preprocessing completed: {} actions, {} -> {} rows",
            actions.len(),
            rows_before,
            rows_after
        );

        Ok(PreprocessOutcome {
            table: working,
            actions,
            rows_before,
            rows_after,
        })
    }

    /// Parse every requested method, keeping the caller's column order.
    fn resolve_methods(spec: &ActionSpec) -> Result<Vec<(&str, ImputationMethod)>> {
        spec.missing_values
            .iter()
            .map(|(column, method)| {
                ImputationMethod::parse_for(column, method).map(|m| (column.as_str(), m))
            })
            .collect()
    }
}

/// Column names in first-seen order, without repeats.
fn unique_columns(columns: &[String]) -> IndexSet<&str> {
    columns.iter().map(String::as_str).collect()
}

static_assertions::assert_impl_all!(PreprocessingEngine: Send, Sync);
