//! Gridded discharge, threshold and severity containers.

use chrono::{DateTime, Utc};
use ndarray::{Array2, Array3};

use crate::coords::Axis;
use crate::error::LoadError;

/// Coordinate vectors of a (time, lat, lon) grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub time: Vec<DateTime<Utc>>,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
}

impl Coordinates {
    pub fn new(time: Vec<DateTime<Utc>>, lat: Vec<f64>, lon: Vec<f64>) -> Self {
        Self { time, lat, lon }
    }

    /// (time, lat, lon) lengths.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.time.len(), self.lat.len(), self.lon.len())
    }

    /// Minimum and maximum latitude, ignoring NaN. `None` when empty.
    pub fn lat_range(&self) -> Option<(f64, f64)> {
        min_max(&self.lat)
    }

    /// Minimum and maximum longitude, ignoring NaN. `None` when empty.
    pub fn lon_range(&self) -> Option<(f64, f64)> {
        min_max(&self.lon)
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Discharge values over (time, lat, lon); NaN marks a missing cell.
#[derive(Debug, Clone)]
pub struct Grid {
    values: Array3<f64>,
    coords: Coordinates,
}

impl Grid {
    /// Build a grid, checking that the array matches the coordinate lengths.
    pub fn new(values: Array3<f64>, coords: Coordinates) -> Result<Self, LoadError> {
        if values.dim() != coords.shape() {
            return Err(LoadError::InvalidGrid(format!(
                "discharge array is {:?} but coordinates are {:?}",
                values.dim(),
                coords.shape()
            )));
        }
        Ok(Self { values, coords })
    }

    pub fn values(&self) -> &Array3<f64> {
        &self.values
    }

    pub fn coords(&self) -> &Coordinates {
        &self.coords
    }

    /// (time, lat, lon) shape.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.values.dim()
    }

    /// (lat, lon) shape of one time slice.
    pub fn spatial_shape(&self) -> (usize, usize) {
        let (_, ny, nx) = self.values.dim();
        (ny, nx)
    }
}

/// Return-period discharge thresholds over (lat, lon).
#[derive(Debug, Clone)]
pub struct ThresholdGrid {
    pub q2: Array2<f64>,
    pub q5: Array2<f64>,
    pub q20: Array2<f64>,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
}

impl ThresholdGrid {
    /// Build a threshold grid, checking all three fields share the coordinate shape.
    pub fn new(
        q2: Array2<f64>,
        q5: Array2<f64>,
        q20: Array2<f64>,
        lat: Vec<f64>,
        lon: Vec<f64>,
    ) -> Result<Self, LoadError> {
        let expected = (lat.len(), lon.len());
        for (name, field) in [("Q2", &q2), ("Q5", &q5), ("Q20", &q20)] {
            if field.dim() != expected {
                return Err(LoadError::InvalidGrid(format!(
                    "{} threshold is {:?} but coordinates are {:?}",
                    name,
                    field.dim(),
                    expected
                )));
            }
        }
        Ok(Self {
            q2,
            q5,
            q20,
            lat,
            lon,
        })
    }

    /// (lat, lon) shape.
    pub fn shape(&self) -> (usize, usize) {
        self.q2.dim()
    }

    /// Number of cells where `Q2 <= Q5 <= Q20` does not hold.
    ///
    /// Cells with a NaN threshold are not counted.
    pub fn inverted_cells(&self) -> usize {
        ndarray::Zip::from(&self.q2)
            .and(&self.q5)
            .and(&self.q20)
            .fold(0, |count, &q2, &q5, &q20| {
                if q2 > q5 || q5 > q20 {
                    count + 1
                } else {
                    count
                }
            })
    }

    /// Check that these thresholds sit on the same lat/lon points as `grid`.
    pub fn ensure_aligned(&self, grid: &Grid, tolerance: f64) -> Result<(), LoadError> {
        if self.shape() != grid.spatial_shape() {
            return Err(LoadError::ShapeMismatch {
                discharge: grid.spatial_shape(),
                thresholds: self.shape(),
            });
        }

        let coords = grid.coords();
        for (axis, discharge, thresholds) in [
            (Axis::Latitude, &coords.lat, &self.lat),
            (Axis::Longitude, &coords.lon, &self.lon),
        ] {
            if let Some((index, (d, t))) = discharge
                .iter()
                .zip(thresholds.iter())
                .enumerate()
                .find(|(_, (d, t))| (*d - *t).abs() > tolerance)
            {
                return Err(LoadError::CoordinateMismatch {
                    axis,
                    index,
                    discharge: *d,
                    thresholds: *t,
                });
            }
        }
        Ok(())
    }
}

/// Severity levels over (time, lat, lon), stored as 0.0-3.0 with NaN for missing.
#[derive(Debug, Clone, PartialEq)]
pub struct SeverityGrid {
    values: Array3<f32>,
}

impl SeverityGrid {
    pub fn new(values: Array3<f32>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &Array3<f32> {
        &self.values
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.values.dim()
    }

    /// Cell values in (time, lat, lon) row-major order.
    pub fn to_row_major(&self) -> Vec<f32> {
        self.values.iter().copied().collect()
    }

    /// Cell-wise equality that treats two NaN cells as equal.
    pub fn same_cells(&self, other: &SeverityGrid) -> bool {
        self.shape() == other.shape()
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
    }
}
