//! Writer tests: layout, metadata and atomic publishing of flood index files.

use flood_common::{Severity, SeverityGrid, WriteError};
use ndarray::Array3;
use netcdf_io::{read_flood_index, write_flood_index, MetaValue, Provenance, DEFAULT_PREFIX};
use test_utils::assert_cells_eq;
use test_utils::fixtures::scenario;

fn scenario_severity() -> SeverityGrid {
    SeverityGrid::new(Array3::from_shape_vec((2, 2, 2), scenario::expected_severity()).unwrap())
}

#[test]
fn test_write_then_read_back() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_flood_index(
        tmp.path(),
        DEFAULT_PREFIX,
        2010,
        &scenario_severity(),
        &scenario::coordinates(),
        &Provenance::default(),
    )
    .unwrap();

    assert_eq!(path, tmp.path().join("GloFAS_FloodIndex_2010.nc"));
    let file = read_flood_index(&path).unwrap();

    assert_cells_eq!(&file.severity.to_row_major(), &scenario::EXPECTED);
    assert_eq!(file.coords, scenario::coordinates());
    assert_eq!(
        Severity::from_cell(file.severity.values()[[0, 1, 1]]),
        Some(Severity::Severe)
    );
}

#[test]
fn test_global_attributes() {
    let tmp = tempfile::tempdir().unwrap();
    let provenance = Provenance {
        creator_name: "Flood Team".to_string(),
        ..Provenance::default()
    };
    let path = write_flood_index(
        tmp.path(),
        DEFAULT_PREFIX,
        2010,
        &scenario_severity(),
        &scenario::coordinates(),
        &provenance,
    )
    .unwrap();
    let file = read_flood_index(&path).unwrap();

    let text = |name: &str| file.attribute(name).and_then(MetaValue::as_text).map(str::to_string);
    let number = |name: &str| file.attribute(name).and_then(MetaValue::as_number);

    assert_eq!(text("title").as_deref(), Some("Flood Severity"));
    assert_eq!(text("creator_name").as_deref(), Some("Flood Team"));
    assert_eq!(text("institution").as_deref(), Some("USC Information Sciences Institute"));
    assert_eq!(text("time_coverage_start").as_deref(), Some("2010-01-01T00:00:00"));
    assert_eq!(text("time_coverage_end").as_deref(), Some("2010-01-02T00:00:00"));
    assert_eq!(text("time_coverage_resolution").as_deref(), Some("daily"));
    assert_eq!(number("geospatial_lat_min"), Some(10.0));
    assert_eq!(number("geospatial_lat_max"), Some(10.5));
    assert_eq!(number("geospatial_lon_min"), Some(20.0));
    assert_eq!(number("geospatial_lon_max"), Some(20.5));
    assert_eq!(text("date_created").map(|d| d.len()), Some(10));
}

#[test]
fn test_flood_variable_attributes() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write_flood_index(
        tmp.path(),
        "idx_",
        2010,
        &scenario_severity(),
        &scenario::coordinates(),
        &Provenance::default(),
    )
    .unwrap();

    let file = netcdf::open(&path).unwrap();
    let var = file.variable("flood").unwrap();
    let string_attr = |name: &str| match var.attribute_value(name).unwrap().unwrap() {
        netcdf::AttributeValue::Str(s) => s,
        other => panic!("{name} is not a string: {other:?}"),
    };
    let number_attr =
        |name: &str| f64::try_from(var.attribute_value(name).unwrap().unwrap()).unwrap();

    assert_eq!(string_attr("long_name"), "Flood Level Severity");
    assert_eq!(string_attr("units"), "unitless");
    assert_eq!(
        string_attr("standard_name"),
        "channel_water_flow__flood_volume-flux_severity_index"
    );
    assert_eq!(number_attr("valid_min"), 0.0);
    assert_eq!(number_attr("valid_max"), 3.0);
    assert!(number_attr("missing_value").is_nan());

    let time = file.variable("time").unwrap();
    let seconds: Vec<f64> = time.get_values(..).unwrap();
    assert_eq!(seconds, vec![1_262_304_000.0, 1_262_390_400.0]);
}

#[test]
fn test_overwrite_leaves_no_temporary_files() {
    let tmp = tempfile::tempdir().unwrap();
    for _ in 0..2 {
        write_flood_index(
            tmp.path(),
            DEFAULT_PREFIX,
            2010,
            &scenario_severity(),
            &scenario::coordinates(),
            &Provenance::default(),
        )
        .unwrap();
    }

    let names: Vec<String> = std::fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["GloFAS_FloodIndex_2010.nc"]);
}

#[test]
fn test_shape_mismatch_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let severity = SeverityGrid::new(Array3::zeros((1, 2, 2)));
    let err = write_flood_index(
        tmp.path(),
        DEFAULT_PREFIX,
        2010,
        &severity,
        &scenario::coordinates(),
        &Provenance::default(),
    )
    .unwrap_err();

    assert!(matches!(err, WriteError::ShapeMismatch { .. }));
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn test_empty_time_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let mut coords = scenario::coordinates();
    coords.time.clear();
    let severity = SeverityGrid::new(Array3::zeros((0, 2, 2)));

    let err = write_flood_index(
        tmp.path(),
        DEFAULT_PREFIX,
        2010,
        &severity,
        &coords,
        &Provenance::default(),
    )
    .unwrap_err();
    assert!(matches!(err, WriteError::EmptyCoordinate("time")));
}

#[test]
fn test_failed_publish_leaves_no_partial_output() {
    let tmp = tempfile::tempdir().unwrap();
    // A non-empty directory in the way makes the final rename fail
    let blocker = tmp.path().join("GloFAS_FloodIndex_2010.nc");
    std::fs::create_dir(&blocker).unwrap();
    std::fs::write(blocker.join("keep"), b"x").unwrap();

    let err = write_flood_index(
        tmp.path(),
        DEFAULT_PREFIX,
        2010,
        &scenario_severity(),
        &scenario::coordinates(),
        &Provenance::default(),
    )
    .unwrap_err();

    assert!(matches!(err, WriteError::Publish { ref path, .. } if *path == blocker));
    let names: Vec<String> = std::fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["GloFAS_FloodIndex_2010.nc"]);
    assert!(blocker.join("keep").exists());
}

#[cfg(unix)]
#[test]
fn test_published_file_uses_default_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::tempdir().unwrap();
    let path = write_flood_index(
        tmp.path(),
        DEFAULT_PREFIX,
        2010,
        &scenario_severity(),
        &scenario::coordinates(),
        &Provenance::default(),
    )
    .unwrap();

    // A plain file created in the same directory carries the process umask
    let reference = tmp.path().join("reference");
    std::fs::File::create(&reference).unwrap();

    let mode = |p: &std::path::Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode(&path), mode(&reference));
}
