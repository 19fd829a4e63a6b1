//! # hp-data
//!
//! Data layer for hexplot: load a delimited table, pull two numeric columns
//! out of it and count the points per hexagon.
//!
//! Everything here is plain numbers; drawing lives in `hp-render`.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Error taxonomy for loading, extraction and binning.
pub mod error;

/// Coordinate extraction from named columns.
pub mod extract;

/// Hexagonal binning.
pub mod hexbin;

/// Delimited-text tables.
pub mod table;

pub use error::{DataLoadError, Error, Result};
pub use extract::{Points, extract_points};
pub use hexbin::{HexCell, HexCounts, HexGrid};
pub use table::{Column, Table, load_csv};
