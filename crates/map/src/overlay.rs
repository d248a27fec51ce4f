//! Georeferenced image overlays

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use floodmap_core::{Bounds, Error, Result};
use image::{DynamicImage, RgbaImage};

/// Compositing opacity applied by the map renderer to every overlay.
pub const OVERLAY_OPACITY: f64 = 0.7;

/// Encode a raw RGBA buffer as PNG bytes
pub(crate) fn encode_png(rgba: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    let img = RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        Error::Encode(format!(
            "RGBA buffer does not match {}x{} dimensions",
            width, height
        ))
    })?;

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(png)
}

/// A rendered raster layer: PNG pixels pinned to a geographic bounding box.
///
/// Overlays start hidden; the layer control toggles them.
#[derive(Debug, Clone)]
pub struct ImageOverlay {
    name: String,
    png: Vec<u8>,
    bounds: Bounds,
    opacity: f64,
    show: bool,
}

impl ImageOverlay {
    /// Build an overlay from a raw RGBA buffer (`width * height * 4` bytes)
    pub fn from_rgba(
        name: impl Into<String>,
        rgba: Vec<u8>,
        width: u32,
        height: u32,
        bounds: Bounds,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            png: encode_png(rgba, width, height)?,
            bounds,
            opacity: OVERLAY_OPACITY,
            show: false,
        })
    }

    /// Display name shown in the layer control
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Geographic bounding box, equal to the source raster's bounds
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Whether the layer is attached to the map on load
    pub fn shown(&self) -> bool {
        self.show
    }

    /// Encoded PNG bytes
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Inline `data:` URI carrying the PNG
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds {
            left: -5.0,
            bottom: 119.0,
            right: -4.0,
            top: 120.0,
        }
    }

    #[test]
    fn encodes_png_signature() {
        let overlay =
            ImageOverlay::from_rgba("test", vec![0u8; 2 * 2 * 4], 2, 2, bounds()).unwrap();
        assert_eq!(&overlay.png()[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn data_uri_prefix() {
        let overlay =
            ImageOverlay::from_rgba("test", vec![255u8; 4], 1, 1, bounds()).unwrap();
        assert!(overlay.data_uri().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn rejects_short_buffer() {
        assert!(ImageOverlay::from_rgba("bad", vec![0u8; 3], 2, 2, bounds()).is_err());
    }

    #[test]
    fn starts_hidden_at_overlay_opacity() {
        let overlay =
            ImageOverlay::from_rgba("test", vec![0u8; 4], 1, 1, bounds()).unwrap();
        assert!(!overlay.shown());
        assert!((overlay.opacity() - OVERLAY_OPACITY).abs() < f64::EPSILON);
    }
}
