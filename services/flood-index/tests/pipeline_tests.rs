//! End-to-end runs over synthetic GloFAS inputs.

use std::path::Path;

use flood_common::{BoundingBox, FloodError, LoadError, Stage};
use flood_index::{ErrorPolicy, Pipeline, PipelineConfig};
use netcdf_io::read_flood_index;
use test_utils::assert_cells_eq;
use test_utils::fixtures::scenario;
use test_utils::generators::{write_scenario, year_dir, DischargeFile, ScenarioPaths};

fn config(out: &Path, policy: ErrorPolicy) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.output.dir = out.to_path_buf();
    config.error_policy = policy;
    config
}

fn pipeline(paths: &ScenarioPaths, bbox: BoundingBox, out: &Path, policy: ErrorPolicy) -> Pipeline {
    Pipeline::new(&paths.data_root, &paths.thresholds, bbox, config(out, policy))
}

/// Copy the scenario year under another year number.
fn add_year(paths: &ScenarioPaths, year: i32) {
    let cells = scenario::LAT.len() * scenario::LON.len();
    let dir = year_dir(&paths.data_root, year);
    let units = format!("days since {}-01-01 00:00:00", year);
    for (day, time) in scenario::TIMES.iter().enumerate() {
        DischargeFile::new(
            &scenario::LAT,
            &scenario::LON,
            &units,
            &[*time],
            &scenario::DISCHARGE[day * cells..(day + 1) * cells],
        )
        .write(&dir.join(format!("glofas_{}010{}.nc", year, day + 1)))
        .unwrap();
    }
}

#[test]
fn test_reference_scenario_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = write_scenario(tmp.path());
    let out = tmp.path().join("out");

    let summary = pipeline(&paths, scenario::wide_bbox(), &out, ErrorPolicy::Abort)
        .run(&[scenario::YEAR]);

    assert!(summary.is_success());
    assert_eq!(summary.written.len(), 1);
    let report = &summary.written[0];
    assert_eq!(report.path, out.join("GloFAS_FloodIndex_2010.nc"));
    assert_eq!(report.stats.missing, 1);

    let file = read_flood_index(&report.path).unwrap();
    assert_cells_eq!(&file.severity.to_row_major(), &scenario::EXPECTED);
    assert_eq!(file.coords.time, scenario::times());
}

#[test]
fn test_rerun_is_identical() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = write_scenario(tmp.path());
    let out = tmp.path().join("out");
    let mut pipeline = pipeline(&paths, scenario::wide_bbox(), &out, ErrorPolicy::Abort);

    let first = pipeline.run_year(scenario::YEAR).unwrap();
    let first = read_flood_index(&first.path).unwrap();
    let second = pipeline.run_year(scenario::YEAR).unwrap();
    let second = read_flood_index(&second.path).unwrap();

    assert!(first.severity.same_cells(&second.severity));
    assert_eq!(first.coords, second.coords);
}

#[test]
fn test_extent_comes_from_coordinates() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = write_scenario(tmp.path());
    let out = tmp.path().join("out");

    // Far wider than the 2 x 2 grid
    let bbox = BoundingBox::new(-180.0, 180.0, -90.0, 90.0);
    let report = pipeline(&paths, bbox, &out, ErrorPolicy::Abort)
        .run_year(scenario::YEAR)
        .unwrap();
    let file = read_flood_index(&report.path).unwrap();

    let number = |name: &str| file.attribute(name).and_then(|v| v.as_number());
    assert_eq!(number("geospatial_lat_min"), Some(10.0));
    assert_eq!(number("geospatial_lat_max"), Some(10.5));
    assert_eq!(number("geospatial_lon_min"), Some(20.0));
    assert_eq!(number("geospatial_lon_max"), Some(20.5));
}

#[test]
fn test_no_overlap_fails_in_load() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = write_scenario(tmp.path());
    let out = tmp.path().join("out");

    let failure = pipeline(&paths, scenario::disjoint_bbox(), &out, ErrorPolicy::Abort)
        .run_year(scenario::YEAR)
        .unwrap_err();

    assert_eq!(failure.stage, Stage::Load);
    assert!(matches!(
        failure.source,
        FloodError::Load(LoadError::EmptySelection { .. })
    ));
    assert!(!out.join("GloFAS_FloodIndex_2010.nc").exists());
}

#[test]
fn test_missing_year_names_the_year() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = write_scenario(tmp.path());
    let out = tmp.path().join("out");

    let failure = pipeline(&paths, scenario::wide_bbox(), &out, ErrorPolicy::Abort)
        .run_year(2042)
        .unwrap_err();

    assert_eq!(failure.year, 2042);
    assert_eq!(failure.stage, Stage::Load);
    let message = failure.to_string();
    assert!(message.starts_with("year 2042 failed during load"), "{message}");
    assert!(message.contains("no discharge files found for year 2042"), "{message}");
}

#[test]
fn test_abort_stops_at_first_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = write_scenario(tmp.path());
    add_year(&paths, 2012);
    let out = tmp.path().join("out");

    let summary = pipeline(&paths, scenario::wide_bbox(), &out, ErrorPolicy::Abort)
        .run(&[2010, 2011, 2012]);

    assert!(!summary.is_success());
    assert_eq!(summary.written.len(), 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].year, 2011);
    assert_eq!(summary.skipped, vec![2012]);
    assert!(!out.join("GloFAS_FloodIndex_2012.nc").exists());
}

#[test]
fn test_continue_processes_later_years() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = write_scenario(tmp.path());
    add_year(&paths, 2012);
    let out = tmp.path().join("out");

    let summary = pipeline(&paths, scenario::wide_bbox(), &out, ErrorPolicy::Continue)
        .run(&[2010, 2011, 2012]);

    assert!(!summary.is_success());
    assert!(summary.skipped.is_empty());
    let written: Vec<i32> = summary.written.iter().map(|r| r.year).collect();
    assert_eq!(written, vec![2010, 2012]);
    assert_eq!(summary.failures[0].year, 2011);

    let file = read_flood_index(&out.join("GloFAS_FloodIndex_2012.nc")).unwrap();
    assert_cells_eq!(&file.severity.to_row_major(), &scenario::EXPECTED);
    assert_eq!(
        file.attribute("time_coverage_start").and_then(|v| v.as_text()),
        Some("2012-01-01T00:00:00")
    );
}

#[test]
fn test_custom_prefix() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = write_scenario(tmp.path());
    let out = tmp.path().join("out");
    let mut config = config(&out, ErrorPolicy::Abort);
    config.output.prefix = "flood_".to_string();

    let report = Pipeline::new(&paths.data_root, &paths.thresholds, scenario::wide_bbox(), config)
        .run_year(scenario::YEAR)
        .unwrap();
    assert_eq!(report.path, out.join("flood_2010.nc"));
}
