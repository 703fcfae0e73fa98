//! Command-line interface.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use flood_common::{split_literal, BoundingBox};

use crate::config::{ErrorPolicy, PipelineConfig};

/// Years to process, in the order given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearList(pub Vec<i32>);

/// Flood severity index generator
#[derive(Parser, Debug)]
#[command(name = "flood-index")]
#[command(about = "Classify GloFAS discharge into a yearly flood severity index")]
pub struct Args {
    /// Directory with one sub-directory of daily discharge files per year
    pub data_dir: PathBuf,

    /// NetCDF file holding the Q_2, Q_5 and Q_20 return-period thresholds
    pub thresholds: PathBuf,

    /// Bounding box as [min_lon, max_lon, min_lat, max_lat]
    #[arg(value_parser = parse_bbox, allow_hyphen_values = true)]
    pub bbox: BoundingBox,

    /// Years as [2010, 2011] or a single year
    #[arg(value_parser = parse_years)]
    pub years: YearList,

    /// Output directory (default: current directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Output file name prefix (default: GloFAS_FloodIndex_)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Keep going with the next year when one fails
    #[arg(long)]
    pub continue_on_error: bool,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl Args {
    /// Configuration file contents with command-line overrides applied.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_yaml_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.output.prefix = prefix.clone();
        }
        if self.continue_on_error {
            config.error_policy = ErrorPolicy::Continue;
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn parse_bbox(s: &str) -> Result<BoundingBox, String> {
    BoundingBox::from_literal(s).map_err(|e| e.to_string())
}

/// Parse `[2010, 2011]`, `(2010,)` or a bare `2010`.
pub fn parse_years(s: &str) -> Result<YearList, String> {
    if let Ok(year) = s.trim().parse::<i32>() {
        return Ok(YearList(vec![year]));
    }

    let parts = split_literal(s).ok_or_else(|| format!("Invalid years literal: {}", s))?;
    let years = parts
        .iter()
        .map(|p| {
            p.parse::<i32>()
                .map_err(|_| format!("Invalid year '{}' in {}", p, s))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if years.is_empty() {
        return Err(format!("No years given in {}", s));
    }
    Ok(YearList(years))
}
