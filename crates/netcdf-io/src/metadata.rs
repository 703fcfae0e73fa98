//! Metadata schema of the flood index output.

use chrono::NaiveDate;
use flood_common::{format_coverage, Coordinates, WriteError};
use serde::{Deserialize, Serialize};

use crate::error::WriteResult;

/// Name of the severity variable.
pub const FLOOD_VAR: &str = "flood";

/// Default output file name prefix.
pub const DEFAULT_PREFIX: &str = "GloFAS_FloodIndex_";

pub const FLOOD_TITLE: &str = "Flood level Severity (medium, high, and severe)";
pub const FLOOD_LONG_NAME: &str = "Flood Level Severity";
pub const FLOOD_STANDARD_NAME: &str = "channel_water_flow__flood_volume-flux_severity_index";
pub const FLOOD_UNITS: &str = "unitless";

pub const DATASET_TITLE: &str = "Flood Severity";
pub const DATASET_SUMMARY: &str = "Flood severity index: medium (2-yr flood, index=1), \
high (5-yr flood, index=2), and severe (20-yr flood, index=3), inferred from \
the GloFAS dataset. Thresholds were determined by fitting a Gumbel extreme \
value distribution to the yearly maxima in each grid cell over 1981-2017.";
pub const TIME_RESOLUTION: &str = "daily";

/// Output file name for a year, e.g. `GloFAS_FloodIndex_2010.nc`.
pub fn output_file_name(prefix: &str, year: i32) -> String {
    format!("{}{}.nc", prefix, year)
}

/// Who produced the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Provenance {
    pub creator_name: String,
    pub creator_email: String,
    pub institution: String,
}

impl Default for Provenance {
    fn default() -> Self {
        Self {
            creator_name: "Deborah Khider".to_string(),
            creator_email: "khider@usc.edu".to_string(),
            institution: "USC Information Sciences Institute".to_string(),
        }
    }
}

/// An attribute value as stored in the output file.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Text(String),
    Number(f64),
}

impl MetaValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            MetaValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetaValue::Number(n) => Some(*n),
            MetaValue::Text(_) => None,
        }
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Text(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::Text(s)
    }
}

impl From<f64> for MetaValue {
    fn from(n: f64) -> Self {
        MetaValue::Number(n)
    }
}

impl From<MetaValue> for netcdf::AttributeValue {
    fn from(value: MetaValue) -> Self {
        match value {
            MetaValue::Text(s) => netcdf::AttributeValue::Str(s),
            MetaValue::Number(n) => netcdf::AttributeValue::Double(n),
        }
    }
}

/// Dataset-level attributes of one output file.
///
/// Extents come from the coordinate vectors actually written, never from the
/// requested bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct FloodIndexMetadata {
    pub date_created: NaiveDate,
    pub provenance: Provenance,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    pub time_coverage_start: String,
    pub time_coverage_end: String,
}

impl FloodIndexMetadata {
    pub fn from_coordinates(
        coords: &Coordinates,
        provenance: &Provenance,
        date_created: NaiveDate,
    ) -> WriteResult<Self> {
        let (lat_min, lat_max) = coords
            .lat_range()
            .ok_or(WriteError::EmptyCoordinate("lat"))?;
        let (lon_min, lon_max) = coords
            .lon_range()
            .ok_or(WriteError::EmptyCoordinate("lon"))?;
        let (first, last) = match (coords.time.first(), coords.time.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(WriteError::EmptyCoordinate("time")),
        };

        Ok(Self {
            date_created,
            provenance: provenance.clone(),
            lat_min,
            lat_max,
            lon_min,
            lon_max,
            time_coverage_start: format_coverage(first),
            time_coverage_end: format_coverage(last),
        })
    }

    /// Global attributes in the order they are written.
    pub fn global_attributes(&self) -> Vec<(&'static str, MetaValue)> {
        vec![
            ("title", DATASET_TITLE.into()),
            ("summary", DATASET_SUMMARY.into()),
            ("date_created", self.date_created.format("%Y-%m-%d").to_string().into()),
            ("creator_name", self.provenance.creator_name.clone().into()),
            ("creator_email", self.provenance.creator_email.clone().into()),
            ("institution", self.provenance.institution.clone().into()),
            ("geospatial_lat_min", self.lat_min.into()),
            ("geospatial_lat_max", self.lat_max.into()),
            ("geospatial_lon_min", self.lon_min.into()),
            ("geospatial_lon_max", self.lon_max.into()),
            ("time_coverage_start", self.time_coverage_start.clone().into()),
            ("time_coverage_end", self.time_coverage_end.clone().into()),
            ("time_coverage_resolution", TIME_RESOLUTION.into()),
        ]
    }
}
