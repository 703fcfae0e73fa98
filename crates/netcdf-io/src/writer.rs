//! Flood index output.
//!
//! Each year is written inside a hidden staging directory in the destination
//! directory and renamed over `<prefix><year>.nc` once the NetCDF handle is
//! closed, so readers never see a half-written index.

use std::path::{Path, PathBuf};

use chrono::Utc;
use flood_common::{
    encode_output_time, Coordinates, SeverityGrid, WriteError, OUTPUT_CALENDAR, OUTPUT_TIME_UNITS,
};
use tracing::{debug, info, warn};

use crate::error::{write_failed, WriteResult};
use crate::metadata::{
    output_file_name, FloodIndexMetadata, Provenance, FLOOD_LONG_NAME, FLOOD_STANDARD_NAME,
    FLOOD_TITLE, FLOOD_UNITS, FLOOD_VAR,
};

/// Write one year's severity grid and return the published path.
pub fn write_flood_index(
    dir: &Path,
    prefix: &str,
    year: i32,
    severity: &SeverityGrid,
    coords: &Coordinates,
    provenance: &Provenance,
) -> WriteResult<PathBuf> {
    if severity.shape() != coords.shape() {
        return Err(WriteError::ShapeMismatch {
            grid: severity.shape(),
            coords: coords.shape(),
        });
    }
    let metadata = FloodIndexMetadata::from_coordinates(coords, provenance, Utc::now().date_naive())?;

    std::fs::create_dir_all(dir)?;
    let target = dir.join(output_file_name(prefix, year));

    // netcdf creates the staged file itself so it gets the usual umask mode.
    // The staging directory and anything in it are removed on drop.
    let staging = tempfile::Builder::new()
        .prefix(".flood_index_")
        .tempdir_in(dir)?;
    let staged = staging.path().join(output_file_name(prefix, year));

    write_netcdf(&staged, severity, coords, &metadata)?;

    std::fs::rename(&staged, &target).map_err(|source| WriteError::Publish {
        path: target.clone(),
        source,
    })?;
    if let Err(e) = staging.close() {
        warn!(path = %target.display(), error = %e, "Failed to remove staging directory");
    }

    info!(
        year = year,
        path = %target.display(),
        time_steps = coords.time.len(),
        "Wrote flood index"
    );
    Ok(target)
}

fn write_netcdf(
    path: &Path,
    severity: &SeverityGrid,
    coords: &Coordinates,
    metadata: &FloodIndexMetadata,
) -> WriteResult<()> {
    let fail = |context: &str, e: netcdf::Error| write_failed(path, context, e);

    let mut file = netcdf::create(path).map_err(|e| fail("failed to create", e))?;

    let (nt, ny, nx) = coords.shape();
    file.add_dimension("time", nt)
        .map_err(|e| fail("failed to add time dimension", e))?;
    file.add_dimension("lat", ny)
        .map_err(|e| fail("failed to add lat dimension", e))?;
    file.add_dimension("lon", nx)
        .map_err(|e| fail("failed to add lon dimension", e))?;

    {
        let times: Vec<f64> = coords.time.iter().map(encode_output_time).collect();
        let mut var = file
            .add_variable::<f64>("time", &["time"])
            .map_err(|e| fail("failed to add time", e))?;
        put_attributes(
            &mut var,
            [
                ("units", OUTPUT_TIME_UNITS.into()),
                ("calendar", OUTPUT_CALENDAR.into()),
                ("standard_name", "time".into()),
            ],
        )
        .map_err(|e| fail("failed to annotate time", e))?;
        var.put_values(&times, ..)
            .map_err(|e| fail("failed to write time", e))?;
    }

    for (name, values, units) in [
        ("lat", &coords.lat, "degrees_north"),
        ("lon", &coords.lon, "degrees_east"),
    ] {
        let mut var = file
            .add_variable::<f64>(name, &[name])
            .map_err(|e| fail(&format!("failed to add {}", name), e))?;
        var.put_attribute("units", units)
            .map_err(|e| fail(&format!("failed to annotate {}", name), e))?;
        var.put_values(values, ..)
            .map_err(|e| fail(&format!("failed to write {}", name), e))?;
    }

    {
        let mut var = file
            .add_variable::<f32>(FLOOD_VAR, &["time", "lat", "lon"])
            .map_err(|e| fail("failed to add flood", e))?;
        var.set_fill_value(f32::NAN)
            .map_err(|e| fail("failed to set flood fill value", e))?;
        put_attributes(
            &mut var,
            [
                ("title", FLOOD_TITLE.into()),
                ("long_name", FLOOD_LONG_NAME.into()),
                ("units", FLOOD_UNITS.into()),
                ("valid_min", 0.0f32.into()),
                ("valid_max", 3.0f32.into()),
                ("missing_value", f32::NAN.into()),
                ("standard_name", FLOOD_STANDARD_NAME.into()),
            ],
        )
        .map_err(|e| fail("failed to annotate flood", e))?;
        var.put_values(&severity.to_row_major(), ..)
            .map_err(|e| fail("failed to write flood", e))?;
    }

    for (name, value) in metadata.global_attributes() {
        file.add_attribute(name, netcdf::AttributeValue::from(value))
            .map_err(|e| fail(&format!("failed to write attribute '{}'", name), e))?;
    }

    debug!(path = %path.display(), shape = ?(nt, ny, nx), "Serialized flood index");
    Ok(())
}

fn put_attributes<const N: usize>(
    var: &mut netcdf::VariableMut,
    attrs: [(&str, netcdf::AttributeValue); N],
) -> Result<(), netcdf::Error> {
    for (name, value) in attrs {
        var.put_attribute(name, value)?;
    }
    Ok(())
}
