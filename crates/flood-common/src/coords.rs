//! Label-based slicing of coordinate vectors.
//!
//! A label slice `(start, stop)` selects every coordinate value lying between
//! `start` and `stop` inclusive, walking in the coordinate's own direction.
//! On an ascending axis that means `start <= v <= stop`; on a descending axis
//! `start >= v >= stop`. A slice whose bounds run against the axis direction
//! selects nothing. The result is always a contiguous index range, so it can
//! be handed straight to a hyperslab read.

use std::ops::Range;

use crate::error::LoadError;

/// Spatial axis, used to label coordinate errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Latitude => write!(f, "latitude"),
            Axis::Longitude => write!(f, "longitude"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Ascending,
    Descending,
}

fn direction(values: &[f64]) -> Option<Direction> {
    if values.windows(2).all(|w| w[0] <= w[1]) {
        Some(Direction::Ascending)
    } else if values.windows(2).all(|w| w[0] >= w[1]) {
        Some(Direction::Descending)
    } else {
        None
    }
}

/// Resolve a label slice to an index range over `values`.
///
/// Vectors of length 0 or 1 are treated as ascending. Fails when the vector
/// is not monotonic or contains NaN.
pub fn label_slice(
    axis: Axis,
    values: &[f64],
    start: f64,
    stop: f64,
) -> Result<Range<usize>, LoadError> {
    if values.iter().any(|v| v.is_nan()) {
        return Err(LoadError::NonMonotonic { axis });
    }

    let (first, end) = match direction(values).ok_or(LoadError::NonMonotonic { axis })? {
        Direction::Ascending => (
            values.partition_point(|&v| v < start),
            values.partition_point(|&v| v <= stop),
        ),
        Direction::Descending => (
            values.partition_point(|&v| v > start),
            values.partition_point(|&v| v >= stop),
        ),
    };

    Ok(first..end.max(first))
}
