//! Common test fixtures for flood-index tests.
//!
//! This module provides pre-defined discharge and threshold data with known
//! severity classifications.

/// The 2 x 2 x 2 reference scenario.
///
/// Discharge `[[[1, 6], [11, 25]], [[NaN, 3], [7, 19]]]` against constant
/// thresholds Q2 = 2, Q5 = 5, Q20 = 20 classifies as
/// `[[[0, 1], [2, 3]], [[NaN, 0], [1, 2]]]`.
pub mod scenario {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use flood_common::{BoundingBox, Coordinates, Grid, ThresholdGrid};
    use ndarray::{Array2, Array3};

    /// Latitudes, north to south.
    pub const LAT: [f64; 2] = [10.5, 10.0];

    pub const LON: [f64; 2] = [20.0, 20.5];

    pub const TIME_UNITS: &str = "days since 2010-01-01 00:00:00";

    /// Raw time offsets in [`TIME_UNITS`].
    pub const TIMES: [f64; 2] = [0.0, 1.0];

    pub const YEAR: i32 = 2010;

    /// Discharge in (time, lat, lon) row-major order.
    pub const DISCHARGE: [f64; 8] = [1.0, 6.0, 11.0, 25.0, f64::NAN, 3.0, 7.0, 19.0];

    pub const Q2: f64 = 2.0;
    pub const Q5: f64 = 5.0;
    pub const Q20: f64 = 20.0;

    /// Expected severity cells in (time, lat, lon) row-major order.
    pub const EXPECTED: [f32; 8] = [0.0, 1.0, 2.0, 3.0, f32::NAN, 0.0, 1.0, 2.0];

    pub fn expected_severity() -> Vec<f32> {
        EXPECTED.to_vec()
    }

    /// Decoded time axis of the scenario.
    pub fn times() -> Vec<DateTime<Utc>> {
        let epoch = Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap();
        TIMES
            .iter()
            .map(|&d| epoch + Duration::days(d as i64))
            .collect()
    }

    pub fn coordinates() -> Coordinates {
        Coordinates::new(times(), LAT.to_vec(), LON.to_vec())
    }

    pub fn discharge_grid() -> Grid {
        let values = Array3::from_shape_vec((2, 2, 2), DISCHARGE.to_vec()).unwrap();
        Grid::new(values, coordinates()).unwrap()
    }

    pub fn threshold_grid() -> ThresholdGrid {
        ThresholdGrid::new(
            Array2::from_elem((2, 2), Q2),
            Array2::from_elem((2, 2), Q5),
            Array2::from_elem((2, 2), Q20),
            LAT.to_vec(),
            LON.to_vec(),
        )
        .unwrap()
    }

    /// A box strictly wider than the scenario grid on every side.
    pub fn wide_bbox() -> BoundingBox {
        BoundingBox::new(19.0, 22.0, 9.0, 12.0)
    }

    /// A box with no overlap with the scenario grid.
    pub fn disjoint_bbox() -> BoundingBox {
        BoundingBox::new(-50.0, -40.0, -30.0, -20.0)
    }
}
