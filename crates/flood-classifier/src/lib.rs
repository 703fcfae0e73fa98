//! Flood severity classification.
//!
//! Each discharge cell is compared against the 2-, 5- and 20-year return
//! period thresholds of its (lat, lon) position. The comparison runs over the
//! whole (time, lat, lon) array at once, with the 2-D thresholds broadcast
//! along the time axis.

mod classify;
mod stats;

pub use classify::{classify, classify_value, classify_cell};
pub use stats::SeverityStats;
