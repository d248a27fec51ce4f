//! Region identifiers derived from raster filenames

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Matches the lower-left tile coordinates embedded in flood raster names,
/// e.g. `depths.xll.-5.yll.120.tif`.
static COORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"xll\.(-?\d+)\.yll\.(-?\d+)").unwrap());

/// Derive a region identifier from a raster path.
///
/// A filename carrying an `xll.<int>.yll.<int>` coordinate pair yields
/// `x<int>y<int>`; anything else falls back to the filename stem. Always
/// produces a string.
pub fn region_id(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    if let Some(cap) = COORD_PATTERN.captures(name) {
        return format!("x{}y{}", &cap[1], &cap[2]);
    }

    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_pair_in_name() {
        let id = region_id(Path::new("data/flood.xll.-5.yll.120.tif"));
        assert_eq!(id, "x-5y120");
    }

    #[test]
    fn positive_coordinates() {
        let id = region_id(Path::new("xll.12.yll.7.tif"));
        assert_eq!(id, "x12y7");
    }

    #[test]
    fn fallback_to_stem() {
        let id = region_id(Path::new("data/coastal_levels.tif"));
        assert_eq!(id, "coastal_levels");
    }

    #[test]
    fn partial_pattern_falls_back() {
        let id = region_id(Path::new("xll.5.tif"));
        assert_eq!(id, "xll.5");
    }
}
