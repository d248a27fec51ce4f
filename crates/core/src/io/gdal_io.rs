//! Multi-band GeoTIFF reading using GDAL

use crate::error::Result;
use crate::raster::{GeoTransform, RasterElement, RasterStack};
use gdal::raster::GdalType;
use gdal::Dataset;
use ndarray::Array2;
use std::path::Path;

/// Read every band of a raster dataset into a [`RasterStack`].
///
/// The geotransform and the band-1 no-data value are taken from the
/// dataset when present.
pub fn read_stack<T, P>(path: P) -> Result<RasterStack<T>>
where
    T: RasterElement + GdalType,
    P: AsRef<Path>,
{
    let dataset = Dataset::open(path.as_ref())?;
    let (cols, rows) = dataset.raster_size();
    let count = dataset.raster_count();

    let mut bands = Vec::with_capacity(count);
    for band_idx in 1..=count {
        let rasterband = dataset.rasterband(band_idx)?;
        let buffer = rasterband.read_as::<T>((0, 0), (cols, rows), (cols, rows), None)?;
        let band = Array2::from_shape_vec((rows, cols), buffer.data().to_vec())
            .map_err(|e| crate::error::Error::Other(e.to_string()))?;
        bands.push(band);
    }

    let transform = dataset
        .geo_transform()
        .map(GeoTransform::from_gdal)
        .unwrap_or_default();

    let mut stack = RasterStack::new(bands, transform)?;

    if let Ok(Some(nodata)) = dataset.rasterband(1).map(|b| b.no_data_value()) {
        if let Some(nd) = num_traits::cast(nodata) {
            stack.set_nodata(Some(nd));
        }
    }

    Ok(stack)
}
