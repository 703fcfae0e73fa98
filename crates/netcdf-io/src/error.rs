//! Error helpers for NetCDF reading and writing.
//!
//! The loader and writer report failures through the stage error families
//! defined in `flood_common`; this module maps `netcdf::Error` into them.

use std::path::Path;

use flood_common::{LoadError, WriteError};

/// Result type for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for writer operations.
pub type WriteResult<T> = Result<T, WriteError>;

pub(crate) fn read_failed(path: &Path, context: &str, err: netcdf::Error) -> LoadError {
    LoadError::Netcdf {
        path: path.to_path_buf(),
        message: format!("{}: {}", context, err),
    }
}

pub(crate) fn write_failed(path: &Path, context: &str, err: netcdf::Error) -> WriteError {
    WriteError::Netcdf {
        path: path.to_path_buf(),
        message: format!("{}: {}", context, err),
    }
}

pub(crate) fn missing_variable(path: &Path, var: &str) -> LoadError {
    LoadError::MissingVariable {
        var: var.to_string(),
        path: path.to_path_buf(),
    }
}
