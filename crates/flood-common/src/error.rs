//! Error types for the flood severity index pipeline.
//!
//! Errors are grouped by the pipeline stage that raises them so that a failed
//! year can be reported together with the stage it failed in.

use std::path::PathBuf;

use thiserror::Error;

use crate::coords::Axis;
use crate::time::TimeParseError;

/// Pipeline stage a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Classify,
    Write,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Load => write!(f, "load"),
            Stage::Classify => write!(f, "classify"),
            Stage::Write => write!(f, "write"),
        }
    }
}

/// Failures while reading and aligning discharge and threshold data.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no discharge files found for year {year} in {}", .dir.display())]
    NoFiles { year: i32, dir: PathBuf },

    #[error("missing variable '{var}' in {}", .path.display())]
    MissingVariable { var: String, path: PathBuf },

    #[error("variable '{var}' in {} has dimensions {found:?}, expected {expected:?}", .path.display())]
    UnexpectedDimensions {
        var: String,
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("{axis} coordinate is not monotonic")]
    NonMonotonic { axis: Axis },

    #[error("bounding box {bbox} selects an empty grid ({lat} lat x {lon} lon)")]
    EmptySelection { bbox: String, lat: usize, lon: usize },

    #[error("shape mismatch: discharge grid is {discharge:?} but thresholds are {thresholds:?}")]
    ShapeMismatch {
        discharge: (usize, usize),
        thresholds: (usize, usize),
    },

    #[error("{axis} mismatch at index {index}: discharge {discharge} vs thresholds {thresholds}")]
    CoordinateMismatch {
        axis: Axis,
        index: usize,
        discharge: f64,
        thresholds: f64,
    },

    #[error("{} does not match the first file of the year: {reason}", .path.display())]
    InconsistentFiles { path: PathBuf, reason: String },

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("time decoding failed in {}: {source}", .path.display())]
    Time {
        path: PathBuf,
        #[source]
        source: TimeParseError,
    },

    #[error("NetCDF read failed for {}: {message}", .path.display())]
    Netcdf { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while classifying a discharge grid.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("thresholds of shape {thresholds:?} cannot broadcast against grid slices of shape {grid:?}")]
    Broadcast {
        grid: (usize, usize),
        thresholds: (usize, usize),
    },
}

/// Failures while serializing a severity grid.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot write an index with an empty {0} coordinate")]
    EmptyCoordinate(&'static str),

    #[error("severity grid shape {grid:?} does not match coordinates {coords:?}")]
    ShapeMismatch {
        grid: (usize, usize, usize),
        coords: (usize, usize, usize),
    },

    #[error("NetCDF write failed for {}: {message}", .path.display())]
    Netcdf { path: PathBuf, message: String },

    #[error("failed to publish {}: {source}", .path.display())]
    Publish {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Any pipeline failure.
#[derive(Debug, Error)]
pub enum FloodError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

impl FloodError {
    /// The stage this error was raised in.
    pub fn stage(&self) -> Stage {
        match self {
            FloodError::Load(_) => Stage::Load,
            FloodError::Classification(_) => Stage::Classify,
            FloodError::Write(_) => Stage::Write,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_mapping() {
        let err: FloodError = LoadError::InvalidGrid("x".into()).into();
        assert_eq!(err.stage(), Stage::Load);

        let err: FloodError = ClassificationError::Broadcast {
            grid: (2, 2),
            thresholds: (3, 3),
        }
        .into();
        assert_eq!(err.stage(), Stage::Classify);

        let err: FloodError = WriteError::EmptyCoordinate("time").into();
        assert_eq!(err.stage(), Stage::Write);
    }

    #[test]
    fn test_no_files_message_names_year() {
        let err = LoadError::NoFiles {
            year: 2013,
            dir: PathBuf::from("/data/2013"),
        };
        let msg = err.to_string();
        assert!(msg.contains("2013"));
        assert!(msg.contains("no discharge files"));
    }
}
