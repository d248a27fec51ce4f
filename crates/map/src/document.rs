//! Leaflet HTML document assembly

use crate::overlay::ImageOverlay;
use floodmap_core::Result;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
  <title>Combined Flood Risk Map</title>
  <link
    rel="stylesheet"
    href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"
    integrity="sha256-p4NxAoJBhIIN+hmNHrzRCf9tD/miZyoHS5obTRR9BMY="
    crossorigin=""
  />
  <link
    rel="stylesheet"
    href="https://cdnjs.cloudflare.com/ajax/libs/leaflet-groupedlayercontrol/0.6.1/leaflet.groupedlayercontrol.min.css"
  />
  <style>
    html, body { height: 100%; margin: 0; padding: 0; }
    #map { height: 100%; width: 100%; }
  </style>
</head>
<body>
"#;

const SCRIPT_INCLUDES: &str = r#"  <script
    src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"
    integrity="sha256-20nQCchB9co0qIjJZRGuk2/Z9VM+kNiyxNV1lvTlZBo="
    crossorigin=""
  ></script>
  <script
    src="https://cdnjs.cloudflare.com/ajax/libs/leaflet-groupedlayercontrol/0.6.1/leaflet.groupedlayercontrol.min.js"
  ></script>
"#;

const TILE_LAYER: &str = r#"      L.tileLayer('https://{s}.basemaps.cartocdn.com/rastertiles/voyager/{z}/{x}/{y}{r}.png', {
        maxZoom: 20,
        subdomains: 'abcd',
        attribution: '&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors &copy; <a href="https://carto.com/attributions">CARTO</a>'
      }).addTo(map);
"#;

/// Makes each group label a click toggle over its layer checkboxes, forces
/// the control open and widens it. Groups start expanded; collapse state is
/// UI-only. The plugin renders the control after the map, hence the
/// deferred setup.
const COLLAPSIBLE_SCRIPT: &str = r#"  <script>
  document.addEventListener('DOMContentLoaded', function() {
    function setupCollapsible() {
      const layerList = document.querySelector('.leaflet-control-layers-list');
      if (!layerList) {
        setTimeout(setupCollapsible, 500);
        return;
      }

      layerList.querySelectorAll('.leaflet-control-layers-group').forEach(function(group) {
        if (group.dataset.collapsibleReady) return;
        group.dataset.collapsibleReady = 'true';

        const groupName = group.querySelector('.leaflet-control-layers-group-name');
        const groupLabel = group.querySelector('.leaflet-control-layers-group-label');
        if (!groupName || !groupLabel) return;

        const regionText = groupName.textContent.trim();
        const checkboxLabels = Array.from(group.querySelectorAll('label'))
          .filter(function(label) { return label !== groupLabel; });
        if (checkboxLabels.length === 0) return;

        const wrapper = document.createElement('div');
        wrapper.className = 'collapsible-content';
        wrapper.style.display = 'block';
        wrapper.style.paddingLeft = '10px';

        if (groupLabel.nextSibling) {
          group.insertBefore(wrapper, groupLabel.nextSibling);
        } else {
          group.appendChild(wrapper);
        }
        checkboxLabels.forEach(function(label) { wrapper.appendChild(label); });

        groupLabel.style.cursor = 'pointer';
        groupLabel.style.fontWeight = 'bold';
        groupLabel.style.userSelect = 'none';
        groupLabel.style.display = 'block';
        groupLabel.style.padding = '5px 0';
        groupLabel.style.marginTop = '8px';
        groupName.textContent = '▾ ' + regionText;

        groupLabel.addEventListener('click', function(e) {
          e.preventDefault();
          e.stopPropagation();
          if (wrapper.style.display === 'none') {
            wrapper.style.display = 'block';
            groupName.textContent = '▾ ' + regionText;
          } else {
            wrapper.style.display = 'none';
            groupName.textContent = '▸ ' + regionText;
          }
        });
      });
    }

    setTimeout(function() {
      const control = document.querySelector('.leaflet-control-layers');
      if (control) {
        control.classList.add('leaflet-control-layers-expanded');
        control.style.width = '320px';
      }
      const toggle = document.querySelector('.leaflet-control-layers-toggle');
      if (toggle) {
        toggle.style.display = 'none';
      }
    }, 500);

    const style = document.createElement('style');
    style.textContent = [
      '.leaflet-control-layers { width: 320px !important; }',
      '.leaflet-control-layers-list { max-height: 70vh; overflow-y: auto; padding: 10px; }',
      '.leaflet-control-layers-group { margin-bottom: 5px; }',
      '.collapsible-content label { display: block !important; margin: 3px 0 !important; }'
    ].join('\n');
    document.head.appendChild(style);

    setTimeout(setupCollapsible, 2500);
  });
  </script>
"#;

/// Escape a string for inclusion in a double-quoted JS literal
fn js_escape(s: &str) -> String {
    s.chars()
        .flat_map(|c| match c {
            '\\' => vec!['\\', '\\'],
            '"' => vec!['\\', '"'],
            '\n' => vec!['\\', 'n'],
            '\r' => vec!['\\', 'r'],
            c => vec![c],
        })
        .collect()
}

/// The assembled interactive map: base layer, grouped overlays, legends and
/// the layer control.
///
/// Rendering is deterministic: overlay variables are named by group and
/// layer index, so repeated runs over the same input produce byte-identical
/// documents.
#[derive(Debug, Default)]
pub struct MapDocument {
    center: (f64, f64),
    zoom: u8,
    groups: Vec<(String, Vec<ImageOverlay>)>,
    legends: Vec<String>,
}

impl MapDocument {
    /// Create a document centered at (lat, lon) with the given initial zoom
    pub fn new(center: (f64, f64), zoom: u8) -> Self {
        Self {
            center,
            zoom,
            groups: Vec::new(),
            legends: Vec::new(),
        }
    }

    /// Register a named overlay group for the layer control
    pub fn add_group(&mut self, name: impl Into<String>, overlays: Vec<ImageOverlay>) {
        self.groups.push((name.into(), overlays));
    }

    /// Attach a fixed-position legend
    pub fn add_legend(&mut self, html: String) {
        self.legends.push(html);
    }

    /// Number of registered groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Registered groups in insertion order
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[ImageOverlay])> {
        self.groups
            .iter()
            .map(|(name, overlays)| (name.as_str(), overlays.as_slice()))
    }

    /// Serialize the whole document to HTML
    pub fn render(&self) -> String {
        let mut html = String::from(HTML_HEAD);

        for legend in &self.legends {
            html.push_str(legend);
        }

        html.push_str("  <div id=\"map\"></div>\n\n");
        html.push_str(SCRIPT_INCLUDES);

        html.push_str("  <script>\n");
        let _ = writeln!(
            html,
            "      const map = L.map('map').setView([{}, {}], {});",
            self.center.0, self.center.1, self.zoom
        );
        html.push('\n');
        html.push_str(TILE_LAYER);
        html.push('\n');

        // One variable per overlay, named by position
        for (g, (_, overlays)) in self.groups.iter().enumerate() {
            for (l, overlay) in overlays.iter().enumerate() {
                let b = overlay.bounds();
                let _ = writeln!(
                    html,
                    "      const ov_{g}_{l} = L.imageOverlay(\n        \"{}\",\n        [[{}, {}], [{}, {}]],\n        {{opacity: {}}}\n      ){};",
                    overlay.data_uri(),
                    b.bottom,
                    b.left,
                    b.top,
                    b.right,
                    overlay.opacity(),
                    if overlay.shown() { ".addTo(map)" } else { "" }
                );
            }
        }

        html.push_str("\n      const groupedOverlays = {\n");
        for (g, (name, overlays)) in self.groups.iter().enumerate() {
            let _ = writeln!(html, "        \"{}\": {{", js_escape(name));
            for (l, overlay) in overlays.iter().enumerate() {
                let _ = writeln!(
                    html,
                    "          \"{}\": ov_{g}_{l},",
                    js_escape(overlay.name())
                );
            }
            html.push_str("        },\n");
        }
        html.push_str("      };\n\n");

        html.push_str(
            "      L.control.groupedLayers(null, groupedOverlays, {\n        collapsed: false,\n        exclusiveGroups: []\n      }).addTo(map);\n",
        );
        html.push_str("  </script>\n");

        html.push_str(COLLAPSIBLE_SCRIPT);
        html.push_str("</body>\n</html>\n");

        html
    }

    /// Write the rendered document to `path`, creating parent directories
    /// as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.render())?;
        Ok(())
    }
}
