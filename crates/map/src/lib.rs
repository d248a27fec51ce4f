//! # Floodmap Map
//!
//! Assembles rendered flood overlays into a self-contained interactive
//! Leaflet map:
//!
//! - [`ImageOverlay`]: a PNG-encoded, georeferenced image layer
//! - legends for the depth ramp and the risk categories
//! - [`MapDocument`]: the HTML document with a grouped, collapsible layer
//!   control
//! - [`build_map`]: the directory pipeline turning a folder of GeoTIFFs
//!   into a finished document

mod builder;
mod document;
mod legend;
mod overlay;

pub use builder::{
    build_map, collect_rasters, layers_for_region, DEFAULT_ZOOM, MAX_DEPTH_BANDS,
    RETURN_PERIODS, RISK_BAND,
};
pub use document::MapDocument;
pub use legend::{discrete_legend, gradient_legend};
pub use overlay::{ImageOverlay, OVERLAY_OPACITY};
