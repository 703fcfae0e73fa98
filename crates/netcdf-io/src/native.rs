//! Thin helpers over the native netcdf library.
//!
//! Attribute lookups go through [`has_attr`] first so that probing for
//! optional attributes does not trigger HDF5 diagnostics.

use std::path::Path;
use std::sync::Once;

use chrono::{DateTime, Utc};
use flood_common::{CfTimeUnits, LoadError, TimeParseError};

use crate::error::{missing_variable, read_failed, LoadResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This creates confusing log spam like:
///
/// ```text
/// HDF5-DIAG: Error detected in HDF5 (1.10.8) thread 3:
///   #003: ../../../src/H5Adense.c line 397 in H5A__dense_open(): can't locate attribute in name index
/// ```
///
/// Call this once early in `main()`; the loader also calls it before opening
/// files. Safe to call multiple times.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

pub(crate) fn open(path: &Path) -> LoadResult<netcdf::File> {
    silence_hdf5_errors();
    netcdf::open(path).map_err(|e| read_failed(path, "failed to open", e))
}

pub(crate) fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

pub(crate) fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

pub(crate) fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

pub(crate) fn dimension_names(var: &netcdf::Variable) -> Vec<String> {
    var.dimensions()
        .iter()
        .map(|dim| dim.name().to_string())
        .collect()
}

/// Fail unless `var` is laid out over exactly `expected` dimensions.
pub(crate) fn expect_dimensions(
    var: &netcdf::Variable,
    name: &str,
    expected: &[&str],
    path: &Path,
) -> LoadResult<()> {
    let found = dimension_names(var);
    if found.iter().map(String::as_str).eq(expected.iter().copied()) {
        return Ok(());
    }
    Err(LoadError::UnexpectedDimensions {
        var: name.to_string(),
        path: path.to_path_buf(),
        expected: expected.iter().map(|s| s.to_string()).collect(),
        found,
    })
}

/// CF packing attributes of a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Packing {
    scale: f64,
    offset: f64,
    fill: Option<f64>,
    missing: Option<f64>,
}

impl Default for Packing {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: 0.0,
            fill: None,
            missing: None,
        }
    }
}

impl Packing {
    pub(crate) fn from_variable(var: &netcdf::Variable) -> Self {
        Self {
            scale: get_f64_attr(var, "scale_factor").unwrap_or(1.0),
            offset: get_f64_attr(var, "add_offset").unwrap_or(0.0),
            fill: get_f64_attr(var, "_FillValue"),
            missing: get_f64_attr(var, "missing_value"),
        }
    }

    /// Fill and missing values become NaN; everything else is scaled.
    pub(crate) fn unpack(&self, raw: f64) -> f64 {
        if raw.is_nan() || Some(raw) == self.fill || Some(raw) == self.missing {
            f64::NAN
        } else {
            raw * self.scale + self.offset
        }
    }

    pub(crate) fn unpack_all(&self, mut values: Vec<f64>) -> Vec<f64> {
        for v in values.iter_mut() {
            *v = self.unpack(*v);
        }
        values
    }
}

/// Read a one-dimensional coordinate variable in full.
pub(crate) fn read_coordinate(file: &netcdf::File, name: &str, path: &Path) -> LoadResult<Vec<f64>> {
    let var = file
        .variable(name)
        .ok_or_else(|| missing_variable(path, name))?;
    expect_dimensions(&var, name, &[name], path)?;
    var.get_values::<f64, _>(..)
        .map_err(|e| read_failed(path, &format!("failed to read '{}'", name), e))
}

/// Read and decode a CF time axis.
pub(crate) fn read_time(
    file: &netcdf::File,
    name: &str,
    path: &Path,
) -> LoadResult<Vec<DateTime<Utc>>> {
    let var = file
        .variable(name)
        .ok_or_else(|| missing_variable(path, name))?;
    let time_error = |source| LoadError::Time {
        path: path.to_path_buf(),
        source,
    };

    let units = get_string_attr(&var, "units")
        .ok_or_else(|| time_error(TimeParseError::InvalidUnits(format!("'{}' has no units", name))))?;
    let calendar = get_string_attr(&var, "calendar");
    let units = CfTimeUnits::parse(&units, calendar.as_deref()).map_err(time_error)?;

    let raw = var
        .get_values::<f64, _>(..)
        .map_err(|e| read_failed(path, &format!("failed to read '{}'", name), e))?;
    raw.into_iter()
        .map(|v| units.decode(v).map_err(time_error))
        .collect()
}
