//! Imputation module for handling missing values.
//!
//! Provides statistical imputation (mean, median, mode) and row removal.

mod statistical;

pub use statistical::StatisticalImputer;
