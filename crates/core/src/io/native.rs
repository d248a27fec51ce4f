//! Native multi-band GeoTIFF reading (without GDAL dependency)
//!
//! Uses the `tiff` crate. Handles the two layouts flood-hazard products
//! ship in: one IFD per band, or a single IFD with interleaved samples.
//! For full GeoTIFF support (projections, exotic encodings), enable the
//! `gdal` feature.

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, RasterElement, RasterStack};
use ndarray::Array2;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

/// Read every band of a GeoTIFF file into a [`RasterStack`]
pub fn read_stack<T, P>(path: P) -> Result<RasterStack<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    decode_stack(file)
}

/// Read every band of a GeoTIFF held in an in-memory buffer.
///
/// Same as [`read_stack`] but operates on a byte slice instead of a file
/// path, for callers without filesystem access.
pub fn read_stack_from_buffer<T>(data: &[u8]) -> Result<RasterStack<T>>
where
    T: RasterElement,
{
    decode_stack(Cursor::new(data))
}

/// Internal: decode all IFDs from any `Read + Seek` source
fn decode_stack<T, R>(reader: R) -> Result<RasterStack<T>>
where
    T: RasterElement,
    R: std::io::Read + std::io::Seek,
{
    let mut decoder =
        Decoder::new(reader).map_err(|e| Error::Decode(format!("TIFF decode error: {}", e)))?;

    let mut bands: Vec<Array2<T>> = Vec::new();
    let mut transform: Option<GeoTransform> = None;

    loop {
        let (width, height) = decoder
            .dimensions()
            .map_err(|e| Error::Decode(format!("Cannot read dimensions: {}", e)))?;
        let rows = height as usize;
        let cols = width as usize;
        let cells = rows * cols;
        if cells == 0 {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        // Georeferencing tags live on the first IFD
        if transform.is_none() {
            transform = read_geotransform(&mut decoder).ok();
        }

        let image = decoder
            .read_image()
            .map_err(|e| Error::Decode(format!("Cannot read image data: {}", e)))?;
        let samples = cast_samples::<T>(image)?;

        if samples.len() % cells != 0 {
            return Err(Error::Decode(format!(
                "Sample count {} does not fill a {}x{} grid",
                samples.len(),
                rows,
                cols
            )));
        }

        let samples_per_pixel = samples.len() / cells;
        if samples_per_pixel == 1 {
            let band = Array2::from_shape_vec((rows, cols), samples)
                .map_err(|e| Error::Other(e.to_string()))?;
            bands.push(band);
        } else {
            bands.extend(deinterleave(&samples, rows, cols, samples_per_pixel));
        }

        if !decoder.more_images() {
            break;
        }
        decoder
            .next_image()
            .map_err(|e| Error::Decode(format!("Cannot advance to next band: {}", e)))?;
    }

    RasterStack::new(bands, transform.unwrap_or_default())
}

/// Cast a decoded sample buffer to the element type, falling back to the
/// element's no-data value for unrepresentable samples
fn cast_samples<T: RasterElement>(image: DecodingResult) -> Result<Vec<T>> {
    fn cast<T: RasterElement, S: Copy + num_traits::NumCast>(buf: Vec<S>) -> Vec<T> {
        buf.into_iter()
            .map(|v| num_traits::cast(v).unwrap_or(T::default_nodata()))
            .collect()
    }

    Ok(match image {
        DecodingResult::U8(buf) => cast(buf),
        DecodingResult::U16(buf) => cast(buf),
        DecodingResult::U32(buf) => cast(buf),
        DecodingResult::U64(buf) => cast(buf),
        DecodingResult::I8(buf) => cast(buf),
        DecodingResult::I16(buf) => cast(buf),
        DecodingResult::I32(buf) => cast(buf),
        DecodingResult::I64(buf) => cast(buf),
        DecodingResult::F32(buf) => cast(buf),
        DecodingResult::F64(buf) => cast(buf),
    })
}

/// Split a pixel-interleaved sample buffer into per-band grids
fn deinterleave<T: Copy>(
    samples: &[T],
    rows: usize,
    cols: usize,
    samples_per_pixel: usize,
) -> Vec<Array2<T>> {
    (0..samples_per_pixel)
        .map(|s| {
            Array2::from_shape_fn((rows, cols), |(r, c)| {
                samples[(r * cols + c) * samples_per_pixel + s]
            })
        })
        .collect()
}

/// Attempt to read a GeoTransform from TIFF tags
fn read_geotransform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Result<GeoTransform> {
    // ModelPixelScaleTag = 33550, ModelTiepointTag = 33922
    let scale = decoder
        .get_tag_f64_vec(Tag::ModelPixelScaleTag)
        .map_err(|_| Error::Other("No pixel scale tag".into()))?;
    let tiepoint = decoder
        .get_tag_f64_vec(Tag::ModelTiepointTag)
        .map_err(|_| Error::Other("No tiepoint tag".into()))?;

    if scale.len() >= 2 && tiepoint.len() >= 6 {
        // tiepoint: [I, J, K, X, Y, Z]; scale: [ScaleX, ScaleY, ScaleZ]
        let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
        let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
        let pixel_width = scale[0];
        let pixel_height = -scale[1]; // Negative for north-up

        return Ok(GeoTransform::new(origin_x, origin_y, pixel_width, pixel_height));
    }

    Err(Error::Other("Cannot determine geotransform".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiff::encoder::colortype::Gray32Float;
    use tiff::encoder::TiffEncoder;

    /// Encode one IFD per band, with geo tags on the first
    fn encode_fixture(bands: &[Vec<f32>], cols: u32, rows: u32) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        let mut encoder = TiffEncoder::new(&mut buf).unwrap();

        for (i, data) in bands.iter().enumerate() {
            let mut image = encoder.new_image::<Gray32Float>(cols, rows).unwrap();
            if i == 0 {
                let scale = [0.5f64, 0.5, 0.0];
                let tiepoint = [0.0f64, 0.0, 0.0, -5.0, 120.0, 0.0];
                image
                    .encoder()
                    .write_tag(Tag::Unknown(33550), &scale[..])
                    .unwrap();
                image
                    .encoder()
                    .write_tag(Tag::Unknown(33922), &tiepoint[..])
                    .unwrap();
            }
            image.write_data(data).unwrap();
        }

        buf.into_inner()
    }

    #[test]
    fn reads_multi_ifd_stack() {
        let bands = vec![
            vec![0.0f32, 100.0, 200.0, 300.0],
            vec![1.0f32, 2.0, 3.0, 4.0],
        ];
        let encoded = encode_fixture(&bands, 2, 2);

        let stack: RasterStack<f64> = read_stack_from_buffer(&encoded).unwrap();
        assert_eq!(stack.band_count(), 2);
        assert_eq!(stack.shape(), (2, 2));
        assert_eq!(stack.band(0).unwrap()[(0, 1)], 100.0);
        assert_eq!(stack.band(1).unwrap()[(1, 1)], 4.0);
    }

    #[test]
    fn reads_geotransform_tags() {
        let encoded = encode_fixture(&[vec![0.0f32; 4]], 2, 2);
        let stack: RasterStack<f64> = read_stack_from_buffer(&encoded).unwrap();

        let gt = stack.transform();
        assert!((gt.origin_x - -5.0).abs() < 1e-10);
        assert!((gt.origin_y - 120.0).abs() < 1e-10);
        assert!((gt.pixel_width - 0.5).abs() < 1e-10);
        assert!((gt.pixel_height - -0.5).abs() < 1e-10);

        let b = stack.bounds();
        assert!((b.left - -5.0).abs() < 1e-10);
        assert!((b.top - 120.0).abs() < 1e-10);
        assert!((b.right - -4.0).abs() < 1e-10);
        assert!((b.bottom - 119.0).abs() < 1e-10);
    }

    #[test]
    fn missing_geo_tags_keep_default_transform() {
        let mut buf = Cursor::new(Vec::new());
        let mut encoder = TiffEncoder::new(&mut buf).unwrap();
        encoder
            .write_image::<Gray32Float>(2, 2, &[1.0f32, 2.0, 3.0, 4.0])
            .unwrap();
        let encoded = buf.into_inner();

        let stack: RasterStack<f64> = read_stack_from_buffer(&encoded).unwrap();
        assert_eq!(*stack.transform(), GeoTransform::default());
    }

    #[test]
    fn deinterleave_splits_pixel_samples() {
        // 2x1 grid, 3 samples per pixel
        let samples = [1, 2, 3, 4, 5, 6];
        let bands = deinterleave(&samples, 1, 2, 3);

        assert_eq!(bands.len(), 3);
        assert_eq!(bands[0][(0, 0)], 1);
        assert_eq!(bands[0][(0, 1)], 4);
        assert_eq!(bands[2][(0, 0)], 3);
        assert_eq!(bands[2][(0, 1)], 6);
    }

    #[test]
    fn read_stack_from_disk() {
        let encoded = encode_fixture(&[vec![7.0f32; 4]], 2, 2);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("band.tif");
        std::fs::write(&path, &encoded).unwrap();

        let stack: RasterStack<f64> = read_stack(&path).unwrap();
        assert_eq!(stack.band_count(), 1);
        assert_eq!(stack.band(0).unwrap()[(1, 1)], 7.0);
    }
}
