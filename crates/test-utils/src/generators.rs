//! Writers for synthetic GloFAS-style NetCDF inputs.
//!
//! Discharge files carry a `dis24` variable over (time, lat, lon) stored as
//! float32, like the daily GloFAS forecasts. Threshold files carry `Q_2`,
//! `Q_5` and `Q_20` over (lat, lon).

use std::path::{Path, PathBuf};

use crate::fixtures::scenario;

/// One discharge file: coordinates, time axis and row-major values.
#[derive(Debug, Clone)]
pub struct DischargeFile {
    pub var: String,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub time_units: String,
    pub times: Vec<f64>,
    pub values: Vec<f64>,
    /// When set, NaN cells are written as this value and `_FillValue` is declared.
    pub fill_value: Option<f32>,
}

impl DischargeFile {
    pub fn new(
        lat: &[f64],
        lon: &[f64],
        time_units: &str,
        times: &[f64],
        values: &[f64],
    ) -> Self {
        assert_eq!(
            values.len(),
            times.len() * lat.len() * lon.len(),
            "discharge values do not match the coordinate shape"
        );
        Self {
            var: "dis24".to_string(),
            lat: lat.to_vec(),
            lon: lon.to_vec(),
            time_units: time_units.to_string(),
            times: times.to_vec(),
            values: values.to_vec(),
            fill_value: None,
        }
    }

    pub fn with_fill_value(mut self, fill: f32) -> Self {
        self.fill_value = Some(fill);
        self
    }

    pub fn with_variable(mut self, name: &str) -> Self {
        self.var = name.to_string();
        self
    }

    pub fn write(&self, path: &Path) -> Result<(), netcdf::Error> {
        let mut file = netcdf::create(path)?;
        file.add_dimension("time", self.times.len())?;
        file.add_dimension("lat", self.lat.len())?;
        file.add_dimension("lon", self.lon.len())?;

        {
            let mut var = file.add_variable::<f64>("time", &["time"])?;
            var.put_attribute("units", self.time_units.as_str())?;
            var.put_attribute("calendar", "proleptic_gregorian")?;
            var.put_values(&self.times, ..)?;
        }
        write_lat_lon(&mut file, &self.lat, &self.lon)?;

        let cells: Vec<f32> = self
            .values
            .iter()
            .map(|&v| match (v.is_nan(), self.fill_value) {
                (true, Some(fill)) => fill,
                _ => v as f32,
            })
            .collect();

        let mut var = file.add_variable::<f32>(&self.var, &["time", "lat", "lon"])?;
        if let Some(fill) = self.fill_value {
            var.set_fill_value(fill)?;
        }
        var.put_attribute("units", "m3 s-1")?;
        var.put_values(&cells, ..)?;
        Ok(())
    }
}

/// A threshold file with one value per (lat, lon) cell for each return period.
#[derive(Debug, Clone)]
pub struct ThresholdFile {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub q2: Vec<f64>,
    pub q5: Vec<f64>,
    pub q20: Vec<f64>,
    /// Variable names for Q2, Q5 and Q20.
    pub names: [String; 3],
}

impl ThresholdFile {
    pub fn new(lat: &[f64], lon: &[f64], q2: &[f64], q5: &[f64], q20: &[f64]) -> Self {
        let cells = lat.len() * lon.len();
        assert!(
            q2.len() == cells && q5.len() == cells && q20.len() == cells,
            "threshold values do not match the coordinate shape"
        );
        Self {
            lat: lat.to_vec(),
            lon: lon.to_vec(),
            q2: q2.to_vec(),
            q5: q5.to_vec(),
            q20: q20.to_vec(),
            names: ["Q_2".to_string(), "Q_5".to_string(), "Q_20".to_string()],
        }
    }

    /// Same thresholds in every cell.
    pub fn constant(lat: &[f64], lon: &[f64], q2: f64, q5: f64, q20: f64) -> Self {
        let cells = lat.len() * lon.len();
        Self::new(
            lat,
            lon,
            &vec![q2; cells],
            &vec![q5; cells],
            &vec![q20; cells],
        )
    }

    /// Leave one of the three fields out of the written file.
    pub fn without(mut self, name: &str) -> Self {
        for slot in self.names.iter_mut() {
            if slot == name {
                *slot = String::new();
            }
        }
        self
    }

    pub fn write(&self, path: &Path) -> Result<(), netcdf::Error> {
        let mut file = netcdf::create(path)?;
        file.add_dimension("lat", self.lat.len())?;
        file.add_dimension("lon", self.lon.len())?;
        write_lat_lon(&mut file, &self.lat, &self.lon)?;

        for (name, values) in self.names.iter().zip([&self.q2, &self.q5, &self.q20]) {
            if name.is_empty() {
                continue;
            }
            let mut var = file.add_variable::<f64>(name, &["lat", "lon"])?;
            var.put_attribute("units", "m3 s-1")?;
            var.put_values(values, ..)?;
        }
        Ok(())
    }
}

fn write_lat_lon(file: &mut netcdf::FileMut, lat: &[f64], lon: &[f64]) -> Result<(), netcdf::Error> {
    {
        let mut var = file.add_variable::<f64>("lat", &["lat"])?;
        var.put_attribute("units", "degrees_north")?;
        var.put_values(lat, ..)?;
    }
    let mut var = file.add_variable::<f64>("lon", &["lon"])?;
    var.put_attribute("units", "degrees_east")?;
    var.put_values(lon, ..)?;
    Ok(())
}

/// Create (if needed) and return `<root>/<year>`.
pub fn year_dir(root: &Path, year: i32) -> PathBuf {
    let dir = root.join(year.to_string());
    std::fs::create_dir_all(&dir).expect("create year directory");
    dir
}

/// Paths of a scenario written to disk.
#[derive(Debug, Clone)]
pub struct ScenarioPaths {
    pub data_root: PathBuf,
    pub thresholds: PathBuf,
}

/// Write the reference scenario under `root`.
///
/// The year is split into two single-day files whose names sort in time
/// order; the threshold file sits next to the data root.
pub fn write_scenario(root: &Path) -> ScenarioPaths {
    let data_root = root.join("glofas");
    let dir = year_dir(&data_root, scenario::YEAR);

    let cells = scenario::LAT.len() * scenario::LON.len();
    for (day, time) in scenario::TIMES.iter().enumerate() {
        let values = &scenario::DISCHARGE[day * cells..(day + 1) * cells];
        DischargeFile::new(
            &scenario::LAT,
            &scenario::LON,
            scenario::TIME_UNITS,
            &[*time],
            values,
        )
        .write(&dir.join(format!("glofas_{}010{}.nc", scenario::YEAR, day + 1)))
        .expect("write scenario discharge file");
    }

    let thresholds = root.join("thresholds.nc");
    ThresholdFile::constant(
        &scenario::LAT,
        &scenario::LON,
        scenario::Q2,
        scenario::Q5,
        scenario::Q20,
    )
    .write(&thresholds)
    .expect("write scenario threshold file");

    ScenarioPaths {
        data_root,
        thresholds,
    }
}

/// Discharge values that increase by one per cell, in row-major order.
pub fn ramp_values(nt: usize, ny: usize, nx: usize) -> Vec<f64> {
    (0..nt * ny * nx).map(|i| i as f64).collect()
}
