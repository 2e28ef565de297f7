//! Min-max normalization of numeric columns.

use crate::config::DegeneratePolicy;
use crate::error::{InsightError, Result};
use crate::types::{ActionType, ColumnKind, PreprocessingAction};
use crate::utils::{column_kind, numeric_values};
use polars::prelude::*;
use tracing::{debug, warn};

/// Rescales numeric columns to `[0, 1]`.
pub struct MinMaxScaler;

impl MinMaxScaler {
    /// Normalize a numeric column with `(x - min) / (max - min)`.
    ///
    /// Min and max are taken over the non-missing values at the time of the
    /// call. A zero-range column follows `policy`. Returns `None` when the
    /// column is absent or not numeric.
    pub fn normalize(
        df: &mut DataFrame,
        col_name: &str,
        policy: DegeneratePolicy,
    ) -> Result<Option<PreprocessingAction>> {
        let Ok(column) = df.column(col_name) else {
            warn!("Skipping normalization for absent column '{}'", col_name);
            return Ok(None);
        };
        if column_kind(column.dtype()) != ColumnKind::Numeric {
            warn!(
                "Skipping normalization for non-numeric column '{}' ({})",
                col_name,
                column.dtype()
            );
            return Ok(None);
        }

        let values = numeric_values(column.as_materialized_series())?;
        let (min, max) = values
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });

        let scaled: Vec<Option<f64>> = if min > max {
            debug!("Column '{}' has no values to normalize", col_name);
            values
        } else if max == min {
            match policy {
                DegeneratePolicy::Error => {
                    return Err(InsightError::DegenerateColumn(col_name.to_string()));
                }
                DegeneratePolicy::MapToZero => {
                    warn!(
                        "Column '{}' has a single distinct value ({}), mapping it to 0",
                        col_name, min
                    );
                    values.into_iter().map(|v| v.map(|_| 0.0)).collect()
                }
            }
        } else {
            let range = max - min;
            values
                .into_iter()
                .map(|v| v.map(|val| (val - min) / range))
                .collect()
        };
        df.replace(col_name, Series::new(col_name.into(), scaled))?;

        debug!("Normalized '{}' from {} .. {}", col_name, min, max);

        Ok(Some(PreprocessingAction::new(
            ActionType::DataNormalized,
            col_name,
            format!("Normalized '{}' using Min-Max scaling.", col_name),
        )))
    }
}
