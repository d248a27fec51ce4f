//! Directory pipeline: GeoTIFFs in, finished map document out

use crate::document::MapDocument;
use crate::legend::{discrete_legend, gradient_legend};
use crate::overlay::ImageOverlay;
use floodmap_colormap::{depth_range, depth_to_rgba, risk_to_rgba, LogNorm};
use floodmap_core::io::read_stack;
use floodmap_core::region::region_id;
use floodmap_core::{RasterStack, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Flood-depth scenario return periods, in years, matched positionally to
/// the leading bands.
pub const RETURN_PERIODS: [u32; 6] = [10, 20, 50, 100, 200, 500];

/// 1-indexed band carrying the categorical risk score.
pub const RISK_BAND: usize = 8;

/// At most this many leading bands are treated as depth scenarios.
pub const MAX_DEPTH_BANDS: usize = RETURN_PERIODS.len();

/// Initial zoom of the assembled map.
pub const DEFAULT_ZOOM: u8 = 7;

/// Fixed range shown on the depth legend, in meters.
const LEGEND_DEPTH_RANGE: (f64, f64) = (0.01, 5.0);

/// Non-recursive scan of `dir` for `.tif` rasters, in directory-listing
/// order.
pub fn collect_rasters(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut rasters = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("tif") {
            rasters.push(path);
        }
    }
    Ok(rasters)
}

/// Render one raster file into its region identifier and overlay list.
///
/// Up to [`MAX_DEPTH_BANDS`] leading bands become depth overlays sharing one
/// log-normalized range; a file with at least [`RISK_BAND`] bands also gets
/// the risk overlay. All overlays start hidden.
pub fn layers_for_region(path: &Path) -> Result<(String, Vec<ImageOverlay>)> {
    let region = region_id(path);
    let stack: RasterStack<f64> = read_stack(path)?;

    let bounds = stack.bounds();
    let (rows, cols) = stack.shape();
    let (width, height) = (cols as u32, rows as u32);

    let depth_bands = stack.band_count().min(MAX_DEPTH_BANDS);
    let norm = LogNorm::for_depth_range(depth_range(&stack, depth_bands));

    let mut overlays = Vec::with_capacity(depth_bands + 1);

    for (band_idx, rp) in RETURN_PERIODS.iter().take(depth_bands).enumerate() {
        let rgba = depth_to_rgba(stack.band(band_idx)?, &norm);
        overlays.push(ImageOverlay::from_rgba(
            format!("Flood Depths → RP {rp} yr"),
            rgba,
            width,
            height,
            bounds,
        )?);
    }

    if stack.band_count() >= RISK_BAND {
        let rgba = risk_to_rgba(stack.band(RISK_BAND - 1)?);
        overlays.push(ImageOverlay::from_rgba(
            "Flood Risk → Score (2–10)",
            rgba,
            width,
            height,
            bounds,
        )?);
    }

    debug!(
        region = %region,
        bands = stack.band_count(),
        overlays = overlays.len(),
        "rendered raster"
    );

    Ok((region, overlays))
}

/// Assemble the full map for a directory of rasters.
///
/// Returns `Ok(None)` when the directory holds no `.tif` file: the normal
/// empty-input termination path, producing no output. The map is centered
/// on the first raster's bounds; every raster contributes one
/// `"Region <id>"` overlay group.
pub fn build_map(input_dir: &Path, zoom: u8) -> Result<Option<MapDocument>> {
    let rasters = collect_rasters(input_dir)?;
    if rasters.is_empty() {
        return Ok(None);
    }
    info!(count = rasters.len(), dir = %input_dir.display(), "found rasters");

    let center = {
        let first: RasterStack<f64> = read_stack(&rasters[0])?;
        first.bounds().center()
    };

    let mut doc = MapDocument::new(center, zoom);
    for path in &rasters {
        info!("processing {}", path.display());
        let (region, overlays) = layers_for_region(path)?;
        doc.add_group(format!("Region {region}"), overlays);
    }

    doc.add_legend(gradient_legend(
        "Flood Depth (m, log scale)",
        LEGEND_DEPTH_RANGE.0,
        LEGEND_DEPTH_RANGE.1,
    )?);
    doc.add_legend(discrete_legend("Flood Risk Score"));

    Ok(Some(doc))
}
