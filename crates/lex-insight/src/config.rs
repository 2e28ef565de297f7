//! Configuration types for the insight engine.
//!
//! This module provides configuration options using the builder pattern.
//! One [`EngineConfig`] is shared by the insight generator, the preprocessing
//! engine and the statistical analyzer.

use serde::{Deserialize, Serialize};

/// Upper bound on `histogram_bins`.
pub const MAX_HISTOGRAM_BINS: usize = 1_000;

/// Policy for min-max normalization of a column whose min equals its max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DegeneratePolicy {
    /// Map every value of the column to 0.0.
    #[default]
    MapToZero,
    /// Fail the whole preprocessing call with `DegenerateColumn`.
    Error,
}

/// Configuration for the insight engine.
///
/// Use [`EngineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_insight::config::{EngineConfig, DegeneratePolicy};
///
/// let config = EngineConfig::builder()
///     .iqr_multiplier(3.0)
///     .degenerate_policy(DegeneratePolicy::Error)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Multiplier applied to the IQR to get the outlier bounds.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// What to do when normalizing a zero-range column.
    /// Default: MapToZero
    pub degenerate_policy: DegeneratePolicy,

    /// Number of categories kept in a `count` chart.
    /// Default: 15
    pub count_chart_limit: usize,

    /// Number of equal-width bins pre-computed for histogram charts.
    /// Default: 24, at most [`MAX_HISTOGRAM_BINS`]
    pub histogram_bins: usize,

    /// Whether histogram charts ask the renderer for a density overlay.
    /// Default: true
    pub overlay_density: bool,

    /// Rows included in the insight preview table.
    /// Default: 5
    pub preview_rows: usize,

    /// Decimals used when formatting statistics for display.
    /// Default: 2
    pub display_decimals: usize,

    /// CSS classes put on rendered HTML tables.
    /// Default: "table table-striped table-bordered"
    pub html_table_classes: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            iqr_multiplier: 1.5,
            degenerate_policy: DegeneratePolicy::default(),
            count_chart_limit: 15,
            histogram_bins: 24,
            overlay_density: true,
            preview_rows: 5,
            display_decimals: 2,
            html_table_classes: "table table-striped table-bordered".to_string(),
        }
    }
}

impl EngineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier > 0.0) {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        if self.count_chart_limit == 0 {
            return Err(ConfigValidationError::ZeroNotAllowed(
                "count_chart_limit".to_string(),
            ));
        }

        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::ZeroNotAllowed(
                "histogram_bins".to_string(),
            ));
        }

        if self.histogram_bins > MAX_HISTOGRAM_BINS {
            return Err(ConfigValidationError::TooManyBins(self.histogram_bins));
        }

        if self.display_decimals > 10 {
            return Err(ConfigValidationError::TooManyDecimals(self.display_decimals));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid IQR multiplier: {0} (must be a positive finite number)")]
    InvalidIqrMultiplier(f64),

    #[error("'{0}' must be at least 1")]
    ZeroNotAllowed(String),

    #[error("Invalid display decimals: {0} (must be at most 10)")]
    TooManyDecimals(usize),

    #[error("Invalid histogram bins: {0} (must be at most {max})", max = MAX_HISTOGRAM_BINS)]
    TooManyBins(usize),
}

/// Builder for [`EngineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    iqr_multiplier: Option<f64>,
    degenerate_policy: Option<DegeneratePolicy>,
    count_chart_limit: Option<usize>,
    histogram_bins: Option<usize>,
    overlay_density: Option<bool>,
    preview_rows: Option<usize>,
    display_decimals: Option<usize>,
    html_table_classes: Option<String>,
}

impl EngineConfigBuilder {
    /// Set the IQR multiplier used for outlier bounds.
    ///
    /// # Arguments
    /// * `multiplier` - Positive value (1.5 gives the classic Tukey fences)
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the zero-range normalization policy.
    pub fn degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate_policy = Some(policy);
        self
    }

    /// Set how many categories a `count` chart keeps.
    pub fn count_chart_limit(mut self, limit: usize) -> Self {
        self.count_chart_limit = Some(limit);
        self
    }

    /// Set the number of pre-computed histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Enable or disable the density overlay flag on histograms.
    pub fn overlay_density(mut self, overlay: bool) -> Self {
        self.overlay_density = Some(overlay);
        self
    }

    /// Set the number of preview rows in insights.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Set the decimals used for formatted statistics.
    pub fn display_decimals(mut self, decimals: usize) -> Self {
        self.display_decimals = Some(decimals);
        self
    }

    /// Set the CSS classes of rendered HTML tables.
    pub fn html_table_classes(mut self, classes: impl Into<String>) -> Self {
        self.html_table_classes = Some(classes.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `EngineConfig` or an error if validation fails.
    pub fn build(self) -> Result<EngineConfig, ConfigValidationError> {
        let defaults = EngineConfig::default();
        let config = EngineConfig {
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            degenerate_policy: self.degenerate_policy.unwrap_or_default(),
            count_chart_limit: self.count_chart_limit.unwrap_or(defaults.count_chart_limit),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            overlay_density: self.overlay_density.unwrap_or(defaults.overlay_density),
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
            display_decimals: self.display_decimals.unwrap_or(defaults.display_decimals),
            html_table_classes: self
                .html_table_classes
                .unwrap_or(defaults.html_table_classes),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.iqr_multiplier, 1.5);
        assert_eq!(config.degenerate_policy, DegeneratePolicy::MapToZero);
        assert_eq!(config.count_chart_limit, 15);
        assert_eq!(config.preview_rows, 5);
        assert!(config.overlay_density);
    }

    #[test]
    fn test_builder_defaults() {
        let config = EngineConfig::builder().build().unwrap();
        assert_eq!(config.iqr_multiplier, 1.5);
        assert_eq!(config.display_decimals, 2);
        assert_eq!(config.html_table_classes, "table table-striped table-bordered");
    }

    #[test]
    fn test_builder_custom_values() {
        let config = EngineConfig::builder()
            .iqr_multiplier(3.0)
            .degenerate_policy(DegeneratePolicy::Error)
            .count_chart_limit(5)
            .overlay_density(false)
            .build()
            .unwrap();

        assert_eq!(config.iqr_multiplier, 3.0);
        assert_eq!(config.degenerate_policy, DegeneratePolicy::Error);
        assert_eq!(config.count_chart_limit, 5);
        assert!(!config.overlay_density);
    }

    #[test]
    fn test_validation_invalid_multiplier() {
        let result = EngineConfig::builder().iqr_multiplier(-1.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidIqrMultiplier(_)
        ));
    }

    #[test]
    fn test_validation_zero_chart_limit() {
        let result = EngineConfig::builder().count_chart_limit(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::ZeroNotAllowed(_)
        ));
    }

    #[test]
    fn test_validation_histogram_bins_upper_bound() {
        let result = EngineConfig::builder().histogram_bins(usize::MAX).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::TooManyBins(usize::MAX)
        ));

        let at_limit = EngineConfig::builder().histogram_bins(MAX_HISTOGRAM_BINS).build();
        assert!(at_limit.is_ok());
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "iqr_multiplier": 2.0,
            "degenerate_policy": "Error",
            "count_chart_limit": 10,
            "histogram_bins": 12,
            "overlay_density": false,
            "preview_rows": 3,
            "display_decimals": 1,
            "html_table_classes": "data"
        }"#;

        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.iqr_multiplier, 2.0);
        assert_eq!(config.degenerate_policy, DegeneratePolicy::Error);
        assert_eq!(config.histogram_bins, 12);
        assert_eq!(config.html_table_classes, "data");
    }
}
