//! Pipeline configuration.
//!
//! Settings come from an optional YAML file; command-line flags are applied
//! on top and the result is validated before any data is read.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use netcdf_io::{DatasetLayout, Provenance, DEFAULT_PREFIX};
use serde::{Deserialize, Serialize};

/// What to do with the remaining years after one fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop at the first failed year.
    #[default]
    Abort,
    /// Log the failure and move on to the next year.
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the yearly index files are written to.
    pub dir: PathBuf,
    /// File name prefix, followed by the year and `.nc`.
    pub prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

/// Top-level configuration of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub layout: DatasetLayout,
    pub output: OutputConfig,
    pub provenance: Provenance,
    pub error_policy: ErrorPolicy,
}

impl PipelineConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).with_context(|| "Failed to parse pipeline config YAML")
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read pipeline config from {:?}", path.as_ref()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid pipeline config in {:?}", path.as_ref()))
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(field) = self.layout.first_empty() {
            anyhow::bail!("layout.{} cannot be empty", field);
        }
        anyhow::ensure!(
            !self.output.prefix.trim().is_empty(),
            "Output prefix cannot be empty"
        );
        anyhow::ensure!(
            !self.output.prefix.contains(std::path::is_separator),
            "Output prefix must not contain a path separator: {}",
            self.output.prefix
        );
        anyhow::ensure!(
            !self.output.dir.as_os_str().is_empty(),
            "Output directory cannot be empty"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert_eq!(config.error_policy, ErrorPolicy::Abort);
        assert_eq!(config.output.prefix, "GloFAS_FloodIndex_");
        assert_eq!(config.layout.discharge_var, "dis24");
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_yaml() {
        let config = PipelineConfig::from_yaml_str(
            r#"
error_policy: continue
output:
  dir: /tmp/flood
layout:
  discharge_var: dis
provenance:
  institution: Example Lab
"#,
        )
        .unwrap();

        assert_eq!(config.error_policy, ErrorPolicy::Continue);
        assert_eq!(config.output.dir, PathBuf::from("/tmp/flood"));
        assert_eq!(config.output.prefix, "GloFAS_FloodIndex_");
        assert_eq!(config.layout.discharge_var, "dis");
        assert_eq!(config.layout.q20_var, "Q_20");
        assert_eq!(config.provenance.institution, "Example Lab");
        assert_eq!(config.provenance.creator_name, "Deborah Khider");
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        assert!(PipelineConfig::from_yaml_str("error_policy: retry\n").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = PipelineConfig::default();
        config.output.prefix = String::new();
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.output.prefix = "out/idx_".to_string();
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.layout.lat_var = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("lat_var"));
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = PipelineConfig::from_yaml_file("/nonexistent/flood.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read pipeline config"));
    }
}
