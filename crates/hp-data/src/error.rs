//! Error types for the hexplot data layer

use std::path::PathBuf;

use thiserror::Error;

/// Why a table could not be loaded.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Input file does not exist
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Any other failure to open or read the input
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited text
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line of the bad record (0 when unknown)
        line: u64,
        /// Parser diagnostic
        message: String,
    },

    /// Header or record shape does not describe a table
    #[error("schema mismatch: {0}")]
    Schema(String),
}

/// hexplot data error type
#[derive(Error, Debug)]
pub enum Error {
    /// Loading the input table failed
    #[error("data load error: {0}")]
    DataLoad(#[from] DataLoadError),

    /// A requested column is absent or not numeric
    #[error("column extraction error for '{column}': {reason}")]
    ColumnExtraction {
        /// Requested column name
        column: String,
        /// What went wrong
        reason: String,
    },

    /// Coordinate sequences of different length
    #[error("shape mismatch: xs has {xs} values, ys has {ys}")]
    ShapeMismatch {
        /// Length of `xs`
        xs: usize,
        /// Length of `ys`
        ys: usize,
    },

    /// Binning parameters that cannot tile the plane
    #[error("invalid hex grid: {0}")]
    InvalidGrid(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
