//! Band-to-RGBA rendering for depth and risk layers

use crate::scheme::{blues, risk_color, Rgb};
use floodmap_core::raster::{RasterElement, RasterStack};
use ndarray::Array2;

/// Raw depth samples are centimeters; scale to meters before rendering.
pub const DEPTH_SCALE: f64 = 0.01;

/// Normalization range used when a file has no valid depth pixel at all.
pub const DEFAULT_DEPTH_RANGE: (f64, f64) = (0.01, 0.02);

/// Lower bound for the log normalization, in meters.
pub const LOG_FLOOR: f64 = 0.01;

/// Logarithmic normalizer mapping a value range onto [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct LogNorm {
    ln_min: f64,
    inv_ln_span: f64,
}

impl LogNorm {
    /// Build a normalizer over `[vmin, vmax]`; both must be positive.
    ///
    /// A degenerate range (equal endpoints) maps every value to 0.
    pub fn new(vmin: f64, vmax: f64) -> Self {
        let ln_min = vmin.ln();
        let span = vmax.ln() - ln_min;
        let inv_ln_span = if span.is_finite() && span.abs() > f64::EPSILON {
            1.0 / span
        } else {
            0.0
        };
        Self {
            ln_min,
            inv_ln_span,
        }
    }

    /// Normalizer for a file's shared depth range: the minimum is floored
    /// at [`LOG_FLOOR`]
    pub fn for_depth_range(range: (f64, f64)) -> Self {
        Self::new(range.0.max(LOG_FLOOR), range.1)
    }

    /// Normalized position of `v`; values outside the range fall outside
    /// [0, 1] and are clamped by the ramp
    pub fn position(&self, v: f64) -> f64 {
        (v.ln() - self.ln_min) * self.inv_ln_span
    }
}

/// Shared depth range of a file: min/max of the scaled, strictly positive
/// values across the first `max_bands` bands.
///
/// Falls back to [`DEFAULT_DEPTH_RANGE`] when no band holds a valid pixel.
pub fn depth_range<T: RasterElement>(stack: &RasterStack<T>, max_bands: usize) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for band in stack.bands().take(max_bands) {
        for &value in band.iter() {
            let Some(v) = value.to_f64() else { continue };
            let depth = v * DEPTH_SCALE;
            if depth.is_finite() && depth > 0.0 {
                if depth < min {
                    min = depth;
                }
                if depth > max {
                    max = depth;
                }
            }
        }
    }

    if min.is_finite() && max.is_finite() {
        (min, max)
    } else {
        DEFAULT_DEPTH_RANGE
    }
}

/// Render a depth band into an RGBA buffer (`rows * cols * 4`, row-major).
///
/// Valid pixels (finite, strictly positive after scaling) get the blue ramp
/// at their normalized depth, fully opaque; everything else is fully
/// transparent. Overlay-level opacity is the map renderer's concern.
pub fn depth_to_rgba<T: RasterElement>(band: &Array2<T>, norm: &LogNorm) -> Vec<u8> {
    let mut rgba = vec![0u8; band.len() * 4];

    for (i, &value) in band.iter().enumerate() {
        let Some(v) = value.to_f64() else { continue };
        let depth = v * DEPTH_SCALE;
        if !depth.is_finite() || depth <= 0.0 {
            continue;
        }

        let Rgb { r, g, b } = blues(norm.position(depth));
        let offset = i * 4;
        rgba[offset] = r;
        rgba[offset + 1] = g;
        rgba[offset + 2] = b;
        rgba[offset + 3] = 255;
    }

    rgba
}

/// Render the categorical risk band into an RGBA buffer.
///
/// Pixels are opaque iff their value lies in [2, 10]; the palette colors
/// exact category matches, so an in-range non-category value stays black.
/// Zero is no-data and stays transparent, as does category 1.
pub fn risk_to_rgba<T: RasterElement>(band: &Array2<T>) -> Vec<u8> {
    let mut rgba = vec![0u8; band.len() * 4];

    for (i, &value) in band.iter().enumerate() {
        let Some(v) = value.to_f64() else { continue };
        if !v.is_finite() || !(2.0..=10.0).contains(&v) {
            continue;
        }

        let color = if v.fract() == 0.0 {
            risk_color(v as u8).unwrap_or(Rgb::TRANSPARENT)
        } else {
            Rgb::TRANSPARENT
        };

        let offset = i * 4;
        rgba[offset] = color.r;
        rgba[offset + 1] = color.g;
        rgba[offset + 2] = color.b;
        rgba[offset + 3] = 255;
    }

    rgba
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use floodmap_core::GeoTransform;
    use ndarray::array;

    fn stack_of(bands: Vec<Array2<i32>>) -> RasterStack<i32> {
        RasterStack::new(bands, GeoTransform::default()).unwrap()
    }

    #[test]
    fn lognorm_midpoint() {
        let norm = LogNorm::new(0.01, 1.0);
        assert_relative_eq!(norm.position(0.1), 0.5, epsilon = 1e-12);
        assert_relative_eq!(norm.position(0.01), 0.0, epsilon = 1e-12);
        assert_relative_eq!(norm.position(1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn lognorm_degenerate_range() {
        let norm = LogNorm::new(0.5, 0.5);
        assert_relative_eq!(norm.position(0.5), 0.0);
        assert_relative_eq!(norm.position(2.0), 0.0);
    }

    #[test]
    fn depth_range_scales_and_ignores_nonpositive() {
        // 50 cm and 200 cm; zeros and negatives excluded
        let stack = stack_of(vec![array![[0, 50], [-30, 200]]]);
        let (min, max) = depth_range(&stack, 6);
        assert_relative_eq!(min, 0.5);
        assert_relative_eq!(max, 2.0);
    }

    #[test]
    fn depth_range_only_scans_leading_bands() {
        let depth = array![[100]];
        let risk = array![[900_000]];
        let stack = stack_of(vec![depth, risk]);
        let (min, max) = depth_range(&stack, 1);
        assert_relative_eq!(min, 1.0);
        assert_relative_eq!(max, 1.0);
    }

    #[test]
    fn depth_range_fallback_when_empty() {
        let stack = stack_of(vec![array![[0, 0], [0, -5]]]);
        assert_eq!(depth_range(&stack, 6), DEFAULT_DEPTH_RANGE);
    }

    #[test]
    fn all_zero_band_renders_fully_transparent() {
        let band = Array2::<i32>::zeros((3, 4));
        let norm = LogNorm::for_depth_range(DEFAULT_DEPTH_RANGE);
        let rgba = depth_to_rgba(&band, &norm);

        assert_eq!(rgba.len(), 3 * 4 * 4);
        assert!(rgba.chunks(4).all(|px| px[3] == 0));
    }

    #[test]
    fn valid_depth_pixels_are_opaque_blue() {
        let band = array![[0, 500]]; // 5 m
        let norm = LogNorm::new(0.01, 5.0);
        let rgba = depth_to_rgba(&band, &norm);

        // zero pixel transparent
        assert_eq!(&rgba[0..4], &[0, 0, 0, 0]);
        // max depth pixel: darkest ramp color, opaque
        assert_eq!(&rgba[4..8], &[8, 48, 107, 255]);
    }

    #[test]
    fn risk_zero_and_one_are_transparent() {
        let band = array![[0, 1]];
        let rgba = risk_to_rgba(&band);
        assert_eq!(&rgba[0..4], &[0, 0, 0, 0]);
        assert_eq!(&rgba[4..8], &[0, 0, 0, 0]);
    }

    #[test]
    fn risk_category_bounds_are_opaque_palette_colors() {
        let band = array![[2, 10]];
        let rgba = risk_to_rgba(&band);
        assert_eq!(&rgba[0..4], &[102, 189, 99, 255]);
        assert_eq!(&rgba[4..8], &[103, 0, 31, 255]);
    }

    #[test]
    fn risk_out_of_range_is_transparent() {
        let band = array![[11, -3]];
        let rgba = risk_to_rgba(&band);
        assert!(rgba.chunks(4).all(|px| px[3] == 0));
    }

    #[test]
    fn risk_in_range_noninteger_is_opaque_black() {
        let band = array![[2.5f64]];
        let rgba = risk_to_rgba(&band);
        assert_eq!(&rgba[0..4], &[0, 0, 0, 255]);
    }
}
