//! # Floodmap Core
//!
//! Raster data model and GeoTIFF I/O for the floodmap renderer.
//!
//! This crate provides:
//! - `RasterStack<T>`: all bands of one georeferenced file in memory
//! - `GeoTransform` / `Bounds`: affine georeferencing and map bounding boxes
//! - Multi-band GeoTIFF reading (native `tiff` decoder, or GDAL with the
//!   `gdal` feature)
//! - Region identifier extraction from raster filenames

pub mod error;
pub mod io;
pub mod raster;
pub mod region;

pub use error::{Error, Result};
pub use raster::{Bounds, GeoTransform, RasterElement, RasterStack};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::raster::{Bounds, GeoTransform, RasterElement, RasterStack};
    pub use crate::region::region_id;
}
