//! Yearly GloFAS flood severity index generation.
//!
//! For each requested year the pipeline loads the daily discharge files,
//! clips them and the return-period thresholds to one bounding box,
//! classifies every cell into a severity level and writes
//! `<prefix><year>.nc`.

pub mod args;
pub mod config;
pub mod pipeline;

pub use args::{parse_years, Args, YearList};
pub use config::{ErrorPolicy, OutputConfig, PipelineConfig};
pub use pipeline::{Pipeline, RunSummary, YearFailure, YearReport};
