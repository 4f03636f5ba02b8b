//! Report module - summarizing and exporting analysis results

pub mod export;
pub mod ranking;
pub mod summary;

pub use export::*;
pub use ranking::*;
pub use summary::*;
