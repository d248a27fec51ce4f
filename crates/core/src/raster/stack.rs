//! Multi-band raster stack

use crate::error::{Error, Result};
use crate::raster::{Bounds, GeoTransform, RasterElement};
use ndarray::Array2;

/// All bands of one georeferenced raster file, decoded into memory.
///
/// Bands share dimensions and a single [`GeoTransform`]; band indices are
/// zero-based (the GeoTIFF convention of 1-based band numbers is confined to
/// the I/O layer).
#[derive(Debug, Clone)]
pub struct RasterStack<T: RasterElement> {
    bands: Vec<Array2<T>>,
    transform: GeoTransform,
    nodata: Option<T>,
}

impl<T: RasterElement> RasterStack<T> {
    /// Create a stack from decoded bands, validating that every band has the
    /// same shape
    pub fn new(bands: Vec<Array2<T>>, transform: GeoTransform) -> Result<Self> {
        let Some(first) = bands.first() else {
            return Err(Error::InvalidDimensions {
                width: 0,
                height: 0,
            });
        };
        let (want_rows, want_cols) = first.dim();
        if want_rows == 0 || want_cols == 0 {
            return Err(Error::InvalidDimensions {
                width: want_cols,
                height: want_rows,
            });
        }

        for (i, band) in bands.iter().enumerate().skip(1) {
            let (rows, cols) = band.dim();
            if (rows, cols) != (want_rows, want_cols) {
                return Err(Error::BandMismatch {
                    band: i,
                    rows,
                    cols,
                    want_rows,
                    want_cols,
                });
            }
        }

        Ok(Self {
            bands,
            transform,
            nodata: None,
        })
    }

    /// Number of bands
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.bands[0].nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.bands[0].ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.bands[0].dim()
    }

    /// Band data by zero-based index
    pub fn band(&self, index: usize) -> Result<&Array2<T>> {
        self.bands.get(index).ok_or(Error::BandOutOfRange {
            band: index,
            count: self.bands.len(),
        })
    }

    /// Iterate over all bands in order
    pub fn bands(&self) -> impl Iterator<Item = &Array2<T>> {
        self.bands.iter()
    }

    /// Get the geotransform
    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Get the no-data value
    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    /// Set the no-data value
    pub fn set_nodata(&mut self, nodata: Option<T>) {
        self.nodata = nodata;
    }

    /// Geographic bounds of the stack
    pub fn bounds(&self) -> Bounds {
        self.transform.bounds(self.cols(), self.rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn stack_basic_access() {
        let b0 = array![[1.0, 2.0], [3.0, 4.0]];
        let b1 = array![[5.0, 6.0], [7.0, 8.0]];
        let stack = RasterStack::new(vec![b0, b1], GeoTransform::default()).unwrap();

        assert_eq!(stack.band_count(), 2);
        assert_eq!(stack.shape(), (2, 2));
        assert_eq!(stack.band(1).unwrap()[(1, 0)], 7.0);
    }

    #[test]
    fn band_out_of_range() {
        let stack =
            RasterStack::new(vec![array![[0.0f64]]], GeoTransform::default()).unwrap();
        assert!(matches!(
            stack.band(3),
            Err(Error::BandOutOfRange { band: 3, count: 1 })
        ));
    }

    #[test]
    fn rejects_empty_stack() {
        let bands: Vec<Array2<f64>> = Vec::new();
        assert!(RasterStack::new(bands, GeoTransform::default()).is_err());
    }

    #[test]
    fn rejects_mismatched_shapes() {
        let b0 = Array2::<f64>::zeros((2, 2));
        let b1 = Array2::<f64>::zeros((3, 2));
        let err = RasterStack::new(vec![b0, b1], GeoTransform::default()).unwrap_err();
        assert!(matches!(err, Error::BandMismatch { band: 1, .. }));
    }

    #[test]
    fn bounds_follow_transform() {
        let band = Array2::<f64>::zeros((10, 20));
        let stack =
            RasterStack::new(vec![band], GeoTransform::new(5.0, 50.0, 0.1, -0.1)).unwrap();
        let b = stack.bounds();
        assert!((b.left - 5.0).abs() < 1e-10);
        assert!((b.right - 7.0).abs() < 1e-10);
        assert!((b.top - 50.0).abs() < 1e-10);
        assert!((b.bottom - 49.0).abs() < 1e-10);
    }
}
