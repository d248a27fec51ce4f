//! Error types for the floodmap workspace

use thiserror::Error;

/// Main error type for floodmap operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Band {band} has shape ({rows}, {cols}), expected ({want_rows}, {want_cols})")]
    BandMismatch {
        band: usize,
        rows: usize,
        cols: usize,
        want_rows: usize,
        want_cols: usize,
    },

    #[error("Band index {band} out of range: stack has {count} band(s)")]
    BandOutOfRange { band: usize, count: usize },

    #[error("Cannot decode raster: {0}")]
    Decode(String),

    #[error("Cannot encode image: {0}")]
    Encode(String),

    #[error("GDAL error: {0}")]
    #[cfg(feature = "gdal")]
    Gdal(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "gdal")]
impl From<gdal::errors::GdalError> for Error {
    fn from(e: gdal::errors::GdalError) -> Self {
        Error::Gdal(e.to_string())
    }
}

/// Result type alias for floodmap operations
pub type Result<T> = std::result::Result<T, Error>;
