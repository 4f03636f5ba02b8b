//! Pipeline module - load → impute → filter → scale → decompose → rank

pub mod config;
pub mod error;
pub mod imputer;
pub mod loader;
pub mod outliers;
pub mod pca;
pub mod ranker;
pub mod scaler;

pub use config::*;
pub use error::*;
pub use imputer::*;
pub use loader::*;
pub use outliers::*;
pub use pca::*;
pub use ranker::*;
pub use scaler::*;
