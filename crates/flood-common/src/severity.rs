//! Flood severity levels.

use serde::{Deserialize, Serialize};

/// Ordinal flood severity assigned to one grid cell at one time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Below the 2-year return period discharge.
    None,
    /// At or above the 2-year, below the 5-year threshold.
    Medium,
    /// At or above the 5-year, below the 20-year threshold.
    High,
    /// At or above the 20-year threshold.
    Severe,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::None,
        Severity::Medium,
        Severity::High,
        Severity::Severe,
    ];

    /// Numeric level stored in output files (0-3).
    pub fn level(&self) -> u8 {
        match self {
            Severity::None => 0,
            Severity::Medium => 1,
            Severity::High => 2,
            Severity::Severe => 3,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        Self::ALL.get(level as usize).copied()
    }

    /// Decode a stored cell value; NaN (missing) and non-levels yield `None`.
    pub fn from_cell(value: f32) -> Option<Self> {
        if value.is_nan() || value.fract() != 0.0 || value < 0.0 {
            return None;
        }
        Self::from_level(value as u8).filter(|s| s.as_cell() == value)
    }

    pub fn as_cell(&self) -> f32 {
        self.level() as f32
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::None => write!(f, "none"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Severe => write!(f, "severe"),
        }
    }
}
