//! Discharge and threshold loading.
//!
//! A year of discharge lives in `<root>/<year>/` as one or more NetCDF files
//! that are concatenated along time in file name order. Thresholds come from
//! a single static file. Both are clipped with the same bounding box so that
//! they line up cell for cell.

use std::collections::BTreeMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

use flood_common::{
    label_slice, Axis, BoundingBox, Coordinates, Grid, LoadError, SeverityGrid, ThresholdGrid,
};
use ndarray::{Array2, Array3};
use tracing::{debug, info, warn};

use crate::error::{missing_variable, read_failed, LoadResult};
use crate::layout::DatasetLayout;
use crate::metadata::{MetaValue, FLOOD_VAR};
use crate::native::{expect_dimensions, open, read_coordinate, read_time, Packing};

/// Largest coordinate difference still treated as the same grid.
pub const COORD_TOLERANCE: f64 = 1e-6;

/// Discharge and thresholds for one year, clipped and aligned.
#[derive(Debug, Clone)]
pub struct YearInputs {
    pub year: i32,
    pub discharge: Grid,
    pub thresholds: ThresholdGrid,
}

impl YearInputs {
    /// Pair a discharge grid with thresholds, checking they share a grid.
    pub fn assemble(year: i32, discharge: Grid, thresholds: ThresholdGrid) -> LoadResult<Self> {
        thresholds.ensure_aligned(&discharge, COORD_TOLERANCE)?;
        Ok(Self {
            year,
            discharge,
            thresholds,
        })
    }
}

/// Files with `extension` directly under `<root>/<year>/`, sorted by name.
///
/// Hidden files are skipped; symlinks to regular files are included.
pub fn discover_year_files(root: &Path, year: i32, extension: &str) -> LoadResult<Vec<PathBuf>> {
    let dir = root.join(year.to_string());
    let no_files = || LoadError::NoFiles {
        year,
        dir: dir.clone(),
    };
    if !dir.is_dir() {
        return Err(no_files());
    }

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        let matches = entry.path().extension().and_then(|e| e.to_str()) == Some(extension);
        if !hidden && matches && entry.path().is_file() {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Err(no_files());
    }
    debug!(year = year, files = files.len(), dir = %dir.display(), "Discovered discharge files");
    Ok(files)
}

/// Index ranges selected by `bbox`, failing when either is empty.
fn clip(bbox: &BoundingBox, lat: &[f64], lon: &[f64]) -> LoadResult<(Range<usize>, Range<usize>)> {
    let (lat_start, lat_stop) = bbox.lat_slice();
    let (lon_start, lon_stop) = bbox.lon_slice();
    let lat_range = label_slice(Axis::Latitude, lat, lat_start, lat_stop)?;
    let lon_range = label_slice(Axis::Longitude, lon, lon_start, lon_stop)?;

    if lat_range.is_empty() || lon_range.is_empty() {
        return Err(LoadError::EmptySelection {
            bbox: bbox.to_string(),
            lat: lat_range.len(),
            lon: lon_range.len(),
        });
    }
    Ok((lat_range, lon_range))
}

fn same_axis(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| (x - y).abs() <= COORD_TOLERANCE)
}

fn to_array2(values: Vec<f64>, shape: (usize, usize)) -> LoadResult<Array2<f64>> {
    Array2::from_shape_vec(shape, values).map_err(|e| LoadError::InvalidGrid(e.to_string()))
}

/// Load Q2, Q5 and Q20 clipped to `bbox`.
pub fn load_thresholds(
    path: &Path,
    bbox: &BoundingBox,
    layout: &DatasetLayout,
) -> LoadResult<ThresholdGrid> {
    let file = open(path)?;
    let lat = read_coordinate(&file, &layout.lat_var, path)?;
    let lon = read_coordinate(&file, &layout.lon_var, path)?;
    let (lat_range, lon_range) = clip(bbox, &lat, &lon)?;
    let shape = (lat_range.len(), lon_range.len());

    let read_field = |name: &str| -> LoadResult<Array2<f64>> {
        let var = file
            .variable(name)
            .ok_or_else(|| missing_variable(path, name))?;
        expect_dimensions(
            &var,
            name,
            &[layout.lat_var.as_str(), layout.lon_var.as_str()],
            path,
        )?;
        let raw = var
            .get_values::<f64, _>((lat_range.clone(), lon_range.clone()))
            .map_err(|e| read_failed(path, &format!("failed to read '{}'", name), e))?;
        to_array2(Packing::from_variable(&var).unpack_all(raw), shape)
    };

    let [q2_var, q5_var, q20_var] = layout.threshold_vars();
    let grid = ThresholdGrid::new(
        read_field(q2_var)?,
        read_field(q5_var)?,
        read_field(q20_var)?,
        lat[lat_range.clone()].to_vec(),
        lon[lon_range.clone()].to_vec(),
    )?;

    let inverted = grid.inverted_cells();
    if inverted > 0 {
        warn!(
            path = %path.display(),
            cells = inverted,
            "Thresholds are not ordered Q2 <= Q5 <= Q20 in some cells"
        );
    }
    debug!(path = %path.display(), shape = ?shape, "Loaded thresholds");
    Ok(grid)
}

/// Load and concatenate one year of discharge, clipped to `bbox`.
pub fn load_discharge(
    root: &Path,
    year: i32,
    bbox: &BoundingBox,
    layout: &DatasetLayout,
) -> LoadResult<Grid> {
    let files = discover_year_files(root, year, &layout.extension)?;
    let grid = load_discharge_files(&files, bbox, layout)?;
    info!(
        year = year,
        files = files.len(),
        time_steps = grid.shape().0,
        "Loaded discharge"
    );
    Ok(grid)
}

/// Full coordinates of the first file of a year and the clipped ranges.
struct SpatialReference {
    lat: Vec<f64>,
    lon: Vec<f64>,
    lat_range: Range<usize>,
    lon_range: Range<usize>,
}

impl SpatialReference {
    fn new(bbox: &BoundingBox, lat: Vec<f64>, lon: Vec<f64>) -> LoadResult<Self> {
        let (lat_range, lon_range) = clip(bbox, &lat, &lon)?;
        Ok(Self {
            lat,
            lon,
            lat_range,
            lon_range,
        })
    }

    fn check(&self, path: &Path, lat: &[f64], lon: &[f64]) -> LoadResult<()> {
        for (axis, expected, found) in [
            (Axis::Latitude, &self.lat, lat),
            (Axis::Longitude, &self.lon, lon),
        ] {
            if !same_axis(expected, found) {
                return Err(LoadError::InconsistentFiles {
                    path: path.to_path_buf(),
                    reason: format!("{} coordinates differ", axis),
                });
            }
        }
        Ok(())
    }
}

/// Concatenate discharge from `files` in the order given.
///
/// Every file must carry the latitude and longitude of the first one.
pub fn load_discharge_files(
    files: &[PathBuf],
    bbox: &BoundingBox,
    layout: &DatasetLayout,
) -> LoadResult<Grid> {
    let mut reference: Option<SpatialReference> = None;
    let mut times = Vec::new();
    let mut values = Vec::new();

    for path in files {
        let file = open(path)?;
        let lat = read_coordinate(&file, &layout.lat_var, path)?;
        let lon = read_coordinate(&file, &layout.lon_var, path)?;

        let spatial = match reference.take() {
            Some(spatial) => {
                spatial.check(path, &lat, &lon)?;
                spatial
            }
            None => SpatialReference::new(bbox, lat, lon)?,
        };

        let step_times = read_time(&file, &layout.time_var, path)?;
        let name = layout.discharge_var.as_str();
        let var = file
            .variable(name)
            .ok_or_else(|| missing_variable(path, name))?;
        expect_dimensions(
            &var,
            name,
            &[
                layout.time_var.as_str(),
                layout.lat_var.as_str(),
                layout.lon_var.as_str(),
            ],
            path,
        )?;

        let steps = step_times.len();
        if steps > 0 {
            let raw = var
                .get_values::<f64, _>((
                    0..steps,
                    spatial.lat_range.clone(),
                    spatial.lon_range.clone(),
                ))
                .map_err(|e| read_failed(path, &format!("failed to read '{}'", name), e))?;
            values.extend(Packing::from_variable(&var).unpack_all(raw));
        }
        times.extend(step_times);
        reference = Some(spatial);
        debug!(path = %path.display(), time_steps = steps, "Read discharge file");
    }

    let spatial = reference.ok_or_else(|| {
        LoadError::InvalidGrid("no discharge files to concatenate".to_string())
    })?;
    let shape = (
        times.len(),
        spatial.lat_range.len(),
        spatial.lon_range.len(),
    );
    let values =
        Array3::from_shape_vec(shape, values).map_err(|e| LoadError::InvalidGrid(e.to_string()))?;
    let coords = Coordinates::new(
        times,
        spatial.lat[spatial.lat_range].to_vec(),
        spatial.lon[spatial.lon_range].to_vec(),
    );
    Grid::new(values, coords)
}

/// Load one year of discharge with its thresholds.
pub fn load_year(
    root: &Path,
    thresholds_path: &Path,
    year: i32,
    bbox: &BoundingBox,
    layout: &DatasetLayout,
) -> LoadResult<YearInputs> {
    let discharge = load_discharge(root, year, bbox, layout)?;
    let thresholds = load_thresholds(thresholds_path, bbox, layout)?;
    YearInputs::assemble(year, discharge, thresholds)
}

/// A flood index file read back from disk.
#[derive(Debug, Clone)]
pub struct FloodIndexFile {
    pub severity: SeverityGrid,
    pub coords: Coordinates,
    pub attributes: BTreeMap<String, MetaValue>,
}

impl FloodIndexFile {
    pub fn attribute(&self, name: &str) -> Option<&MetaValue> {
        self.attributes.get(name)
    }
}

/// Read a file produced by [`crate::write_flood_index`].
pub fn read_flood_index(path: &Path) -> LoadResult<FloodIndexFile> {
    let file = open(path)?;
    let lat = read_coordinate(&file, "lat", path)?;
    let lon = read_coordinate(&file, "lon", path)?;
    let time = read_time(&file, "time", path)?;

    let var = file
        .variable(FLOOD_VAR)
        .ok_or_else(|| missing_variable(path, FLOOD_VAR))?;
    expect_dimensions(&var, FLOOD_VAR, &["time", "lat", "lon"], path)?;
    let cells = var
        .get_values::<f32, _>(..)
        .map_err(|e| read_failed(path, "failed to read flood", e))?;

    let coords = Coordinates::new(time, lat, lon);
    let cells = Array3::from_shape_vec(coords.shape(), cells)
        .map_err(|e| LoadError::InvalidGrid(e.to_string()))?;

    let mut attributes = BTreeMap::new();
    for attr in file.attributes() {
        let value = attr
            .value()
            .map_err(|e| read_failed(path, &format!("failed to read attribute '{}'", attr.name()), e))?;
        let value = match value {
            netcdf::AttributeValue::Str(s) => MetaValue::Text(s),
            other => match f64::try_from(other) {
                Ok(n) => MetaValue::Number(n),
                Err(_) => continue,
            },
        };
        attributes.insert(attr.name().to_string(), value);
    }

    Ok(FloodIndexFile {
        severity: SeverityGrid::new(cells),
        coords,
        attributes,
    })
}
