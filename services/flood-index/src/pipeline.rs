//! Per-year load, classify and write loop.

use std::path::PathBuf;

use flood_classifier::{classify, SeverityStats};
use flood_common::{BoundingBox, FloodError, Severity, Stage, ThresholdGrid};
use netcdf_io::{load_discharge, load_thresholds, write_flood_index, YearInputs};
use tracing::{error, info, warn};

use crate::config::{ErrorPolicy, PipelineConfig};

/// A year that could not be produced.
#[derive(Debug, thiserror::Error)]
#[error("year {year} failed during {stage}: {source}")]
pub struct YearFailure {
    pub year: i32,
    pub stage: Stage,
    pub source: FloodError,
}

/// A year that was written.
#[derive(Debug, Clone)]
pub struct YearReport {
    pub year: i32,
    pub path: PathBuf,
    pub stats: SeverityStats,
}

/// Outcome of a multi-year run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub written: Vec<YearReport>,
    pub failures: Vec<YearFailure>,
    /// Years never attempted because an earlier year aborted the run.
    pub skipped: Vec<i32>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.skipped.is_empty()
    }
}

pub struct Pipeline {
    data_dir: PathBuf,
    thresholds_path: PathBuf,
    bbox: BoundingBox,
    config: PipelineConfig,
    /// Thresholds clipped to `bbox`; the same for every year.
    thresholds: Option<ThresholdGrid>,
}

impl Pipeline {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        thresholds_path: impl Into<PathBuf>,
        bbox: BoundingBox,
        config: PipelineConfig,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            thresholds_path: thresholds_path.into(),
            bbox,
            config,
            thresholds: None,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process `years` in order, honoring the configured error policy.
    pub fn run(&mut self, years: &[i32]) -> RunSummary {
        let mut summary = RunSummary::default();

        for (i, &year) in years.iter().enumerate() {
            match self.run_year(year) {
                Ok(report) => summary.written.push(report),
                Err(failure) => {
                    match self.config.error_policy {
                        ErrorPolicy::Abort => {
                            error!(year = year, stage = %failure.stage, "{}", failure);
                            summary.failures.push(failure);
                            summary.skipped = years[i + 1..].to_vec();
                            break;
                        }
                        ErrorPolicy::Continue => {
                            warn!(year = year, stage = %failure.stage, "{}; continuing", failure);
                            summary.failures.push(failure);
                        }
                    }
                }
            }
        }

        info!(
            written = summary.written.len(),
            failed = summary.failures.len(),
            skipped = summary.skipped.len(),
            "Run finished"
        );
        summary
    }

    /// Load, classify and write a single year.
    pub fn run_year(&mut self, year: i32) -> Result<YearReport, YearFailure> {
        self.process(year).map_err(|source| YearFailure {
            year,
            stage: source.stage(),
            source,
        })
    }

    fn process(&mut self, year: i32) -> Result<YearReport, FloodError> {
        let layout = &self.config.layout;
        let discharge = load_discharge(&self.data_dir, year, &self.bbox, layout)?;
        let thresholds = match self.thresholds.take() {
            Some(cached) => cached,
            None => load_thresholds(&self.thresholds_path, &self.bbox, layout)?,
        };
        let YearInputs {
            discharge,
            thresholds,
            ..
        } = YearInputs::assemble(year, discharge, thresholds)?;

        let severity = classify(&discharge, &thresholds);
        self.thresholds = Some(thresholds);
        let severity = severity?;

        let stats = SeverityStats::from_grid(&severity);
        info!(
            year = year,
            none = stats.count(Severity::None),
            medium = stats.count(Severity::Medium),
            high = stats.count(Severity::High),
            severe = stats.count(Severity::Severe),
            missing = stats.missing,
            "Classified discharge"
        );

        let output = &self.config.output;
        let path = write_flood_index(
            &output.dir,
            &output.prefix,
            year,
            &severity,
            discharge.coords(),
            &self.config.provenance,
        )?;

        Ok(YearReport { year, path, stats })
    }
}
