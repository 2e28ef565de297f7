//! Outlier handling module.
//!
//! Contains functions for detecting and capping outliers in numeric columns
//! with the IQR rule. Quartiles use linear interpolation between ranks
//! (position `q * (n - 1)` in the sorted non-missing values).

use crate::error::Result;
use crate::types::{ActionType, ColumnKind, PreprocessingAction};
use crate::utils::{column_kind, numeric_values, quantile_sorted, sorted_copy};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Quartiles of a column and the outlier bounds derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    /// Bounds `[Q1 - k * IQR, Q3 + k * IQR]` of sorted values, `None` when empty.
    pub fn from_sorted(sorted: &[f64], multiplier: f64) -> Option<Self> {
        let q1 = quantile_sorted(sorted, 0.25)?;
        let q3 = quantile_sorted(sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    /// True when the value lies strictly outside the bounds.
    #[inline]
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Handles outlier detection and treatment.
pub struct OutlierHandler;

impl OutlierHandler {
    /// Cap the outliers of a numeric column at the IQR bounds.
    ///
    /// Returns the logged action, or `None` when the column is absent,
    /// not numeric, or has no outliers. Missing cells stay missing.
    pub fn cap_outliers(
        df: &mut DataFrame,
        col_name: &str,
        multiplier: f64,
    ) -> Result<Option<PreprocessingAction>> {
        let Ok(column) = df.column(col_name) else {
            warn!("Skipping outlier capping for absent column '{}'", col_name);
            return Ok(None);
        };
        if column_kind(column.dtype()) != ColumnKind::Numeric {
            warn!(
                "Skipping outlier capping for non-numeric column '{}' ({})",
                col_name,
                column.dtype()
            );
            return Ok(None);
        }

        let values = numeric_values(column.as_materialized_series())?;
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let Some(bounds) = OutlierBounds::from_sorted(&sorted_copy(&present), multiplier) else {
            debug!("Column '{}' has no values to cap", col_name);
            return Ok(None);
        };

        let outliers = present.iter().filter(|v| bounds.is_outlier(**v)).count();
        if outliers == 0 {
            debug!(
                "No outliers in '{}' (bounds {:.4} .. {:.4})",
                col_name, bounds.lower, bounds.upper
            );
            return Ok(None);
        }

        let capped: Vec<Option<f64>> = values
            .into_iter()
            .map(|v| v.map(|val| val.clamp(bounds.lower, bounds.upper)))
            .collect();
        df.replace(col_name, Series::new(col_name.into(), capped))?;

        debug!(
            "Capped {} outliers in '{}' to {:.4} .. {:.4}",
            outliers, col_name, bounds.lower, bounds.upper
        );

        Ok(Some(PreprocessingAction::new(
            ActionType::OutlierHandled,
            col_name,
            format!("Capped {} outliers in '{}'.", outliers, col_name),
        )))
    }
}
