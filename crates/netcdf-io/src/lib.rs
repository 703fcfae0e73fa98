//! NetCDF input and output for the flood severity index.
//!
//! Reading covers GloFAS discharge years (one directory of daily files per
//! year) and the static return-period threshold file, both clipped to a
//! bounding box with label-slice semantics. Writing produces one CF-annotated
//! `flood` file per year and publishes it atomically.
//!
//! # Example
//!
//! ```ignore
//! use netcdf_io::{load_year, write_flood_index, DatasetLayout, Provenance};
//!
//! let inputs = load_year(root, thresholds, 2010, &bbox, &DatasetLayout::default())?;
//! ```

pub mod error;
pub mod layout;
pub mod metadata;
pub mod native;
pub mod reader;
pub mod writer;

pub use error::{LoadResult, WriteResult};
pub use layout::DatasetLayout;
pub use metadata::{
    output_file_name, FloodIndexMetadata, MetaValue, Provenance, DEFAULT_PREFIX, FLOOD_VAR,
};
pub use native::silence_hdf5_errors;
pub use reader::{
    discover_year_files, load_discharge, load_discharge_files, load_thresholds, load_year,
    read_flood_index, FloodIndexFile, YearInputs, COORD_TOLERANCE,
};
pub use writer::write_flood_index;
