//! loadrank: Feature Importance Library
//!
//! Ranks the numeric attributes of a tabular dataset by their
//! variance-weighted contribution to the leading principal components,
//! after KNN imputation and extreme-outlier removal.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
