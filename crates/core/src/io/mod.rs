//! Reading multi-band flood rasters

#[cfg(feature = "gdal")]
mod gdal_io;
mod native;

#[cfg(feature = "gdal")]
pub use gdal_io::read_stack;

#[cfg(not(feature = "gdal"))]
pub use native::read_stack;

// Buffer-based reading (always available, no filesystem dependency)
pub use native::read_stack_from_buffer;
