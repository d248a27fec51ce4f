//! Fixed-position map legends

use crate::overlay::encode_png;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use floodmap_colormap::{blues, risk_color, RISK_CATEGORIES};
use floodmap_core::Result;
use std::fmt::Write;

const SWATCH_WIDTH: u32 = 256;

/// Continuous-gradient legend: title, a ramp swatch image and the value
/// range. Pinned bottom-left.
pub fn gradient_legend(title: &str, vmin: f64, vmax: f64) -> Result<String> {
    let mut rgba = Vec::with_capacity(SWATCH_WIDTH as usize * 4);
    for i in 0..SWATCH_WIDTH {
        let c = blues(i as f64 / (SWATCH_WIDTH - 1) as f64);
        rgba.extend_from_slice(&[c.r, c.g, c.b, 255]);
    }
    let png = encode_png(rgba, SWATCH_WIDTH, 1)?;
    let b64 = STANDARD.encode(&png);

    Ok(format!(
        r#"<div style="position: fixed; bottom: 50px; left: 50px; width: 220px;
            z-index:9999; background:white; padding:10px; border-radius:12px;
            box-shadow:0 1px 4px rgba(0,0,0,.3)">
  <b>{title}</b><br>
  <img src="data:image/png;base64,{b64}" style="width:190px;height:20px;"><br>
  <small>{vmin:.2} &ndash; {vmax:.2}</small>
</div>
"#
    ))
}

/// Discrete legend: one swatch+label row per risk category, ascending.
/// Pinned top-left.
pub fn discrete_legend(title: &str) -> String {
    let mut items = String::new();
    for category in RISK_CATEGORIES {
        let Some(color) = risk_color(category) else { continue };
        let _ = write!(
            items,
            concat!(
                r#"<div style="display:flex;align-items:center;margin:2px 0;">"#,
                r#"<span style="display:inline-block;width:14px;height:14px;background:{};"#,
                r#"border:1px solid #555;margin-right:8px;"></span>{}</div>"#
            ),
            color.to_hex(),
            category
        );
    }

    format!(
        r#"<div style="position: fixed; top: 10px; left: 10px;
            z-index:9999; background:white; padding:10px 12px; border-radius:12px;
            box-shadow:0 1px 4px rgba(0,0,0,.3); font-size:12px;">
  <div style="font-weight:700; margin-bottom:6px;">{title}</div>
  {items}
</div>
"#
    )
}
