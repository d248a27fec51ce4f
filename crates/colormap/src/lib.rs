//! # Floodmap Colormap
//!
//! Color mapping and band-to-RGBA rendering for flood rasters.
//!
//! Two palettes: a continuous blue ramp for log-scaled flood depths and a
//! fixed categorical palette for risk scores 2–10. The entry points are
//! [`depth_to_rgba`] and [`risk_to_rgba`], which turn one band into an RGBA
//! pixel buffer ready for PNG encoding.

mod render;
mod scheme;

pub use render::{
    depth_range, depth_to_rgba, risk_to_rgba, LogNorm, DEFAULT_DEPTH_RANGE, DEPTH_SCALE,
    LOG_FLOOR,
};
pub use scheme::{blues, risk_color, ColorStop, Rgb, RISK_CATEGORIES};
