//! Common types shared across the flood severity index crates.

pub mod bbox;
pub mod coords;
pub mod error;
pub mod grid;
pub mod severity;
pub mod time;

pub use bbox::{split_literal, BboxParseError, BoundingBox};
pub use coords::{label_slice, Axis};
pub use error::{ClassificationError, FloodError, LoadError, Stage, WriteError};
pub use grid::{Coordinates, Grid, SeverityGrid, ThresholdGrid};
pub use severity::Severity;
pub use time::{
    encode_output_time, format_coverage, CfTimeUnits, TimeParseError, TimeStep, OUTPUT_CALENDAR,
    OUTPUT_TIME_UNITS,
};
