//! Pipeline module.
//!
//! This module provides the preprocessing engine and the column
//! transformations it drives after missing-value handling:
//! - IQR outlier capping
//! - Min-max normalization

mod engine;
pub mod outliers;
pub mod scaling;

pub use engine::PreprocessingEngine;
pub use outliers::{OutlierBounds, OutlierHandler};
pub use scaling::MinMaxScaler;
