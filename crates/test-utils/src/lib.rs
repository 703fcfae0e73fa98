//! Shared test utilities for the flood-index workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Reference discharge/threshold scenarios with known classifications
//! - Writers for synthetic GloFAS-style NetCDF inputs
//! - A NaN-aware assertion for severity cells
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures::scenario, generators::DischargeFile};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Assert two severity cell slices are equal, treating NaN cells as equal.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_cells_eq;
///
/// assert_cells_eq!(&[0.0, f32::NAN], &[0.0, f32::NAN]);
/// ```
#[macro_export]
macro_rules! assert_cells_eq {
    ($left:expr, $right:expr) => {{
        let left: &[f32] = $left;
        let right: &[f32] = $right;
        assert_eq!(left.len(), right.len(), "cell count differs");
        for (i, (l, r)) in left.iter().zip(right.iter()).enumerate() {
            if !(l == r || (l.is_nan() && r.is_nan())) {
                panic!(
                    "assertion failed: cell {} differs\n  left: `{:?}`,\n right: `{:?}`",
                    i, left, right
                );
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_cells_eq_passes_with_nan() {
        assert_cells_eq!(&[0.0, f32::NAN, 3.0], &[0.0, f32::NAN, 3.0]);
    }

    #[test]
    #[should_panic(expected = "cell 1 differs")]
    fn test_assert_cells_eq_fails() {
        assert_cells_eq!(&[0.0, 1.0], &[0.0, 2.0]);
    }
}
