//! Extruded 3D buildings from the base style's vector tiles.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::host::{MapHost, StyleLayer, StyleLayerKind};
use crate::layer::{LayerId, SourceId};
use crate::symbology::ExtrusionStyle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingsConfig {
    pub enabled: bool,
    pub layer_id: String,
    pub source: String,
    pub source_layer: String,
    pub min_zoom: f64,
    pub style: ExtrusionStyle,
}

impl Default for BuildingsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            layer_id: "3d-buildings".to_string(),
            source: "composite".to_string(),
            source_layer: "building".to_string(),
            min_zoom: 15.0,
            style: ExtrusionStyle::default(),
        }
    }
}

impl BuildingsConfig {
    pub fn style_layer(&self) -> StyleLayer {
        StyleLayer {
            id: LayerId::new(self.layer_id.clone()),
            source: SourceId::new(self.source.clone()),
            kind: StyleLayerKind::FillExtrusion {
                source_layer: self.source_layer.clone(),
                min_zoom: self.min_zoom,
                filter: json!(["==", "extrude", "true"]),
                style: self.style.clone(),
            },
        }
    }
}

/// Adds the extrusion layer beneath the first text label layer so labels stay
/// readable; appends on top when the style has no label layer.
pub fn add_buildings_layer(host: &mut dyn MapHost, config: &BuildingsConfig) {
    if !config.enabled {
        return;
    }
    let layer = config.style_layer();
    if host.has_layer(&layer.id) {
        return;
    }
    let before = host.first_label_layer();
    if before.is_none() {
        warn!(layer = %layer.id, "no label layer in style; adding buildings on top");
    }
    info!(layer = %layer.id, before = ?before.as_ref().map(LayerId::as_str), "buildings layer added");
    host.add_style_layer(layer, before.as_ref());
}

#[cfg(test)]
mod tests {
    use super::{BuildingsConfig, add_buildings_layer};
    use crate::host::{RecordingMap, StyleLayerKind};
    use crate::layer::LayerId;
    use serde_json::json;
    use pretty_assertions::assert_eq;

    fn ids(map: &RecordingMap) -> Vec<String> {
        map.layer_ids().into_iter().map(|l| l.0).collect()
    }

    #[test]
    fn goes_beneath_first_text_label() {
        let mut map = RecordingMap::dark_style();
        add_buildings_layer(&mut map, &BuildingsConfig::default());
        assert_eq!(
            ids(&map),
            vec!["land", "water", "road", "3d-buildings", "road-label", "poi-label"]
        );
        let layer = map.style_layer(&LayerId::new("3d-buildings")).expect("layer");
        let StyleLayerKind::FillExtrusion { min_zoom, filter, style, .. } = &layer.kind else {
            panic!("expected fill-extrusion");
        };
        assert_eq!(*min_zoom, 15.0);
        assert_eq!(filter, &json!(["==", "extrude", "true"]));
        assert_eq!(style.color, "#666");
        assert!(map.errors().is_empty());
    }

    #[test]
    fn without_label_layer_goes_on_top() {
        let mut map = RecordingMap::with_base_layers([("land", false), ("road", false)])
            .with_base_source("composite");
        add_buildings_layer(&mut map, &BuildingsConfig::default());
        assert_eq!(ids(&map), vec!["land", "road", "3d-buildings"]);
        assert!(map.errors().is_empty());
    }

    #[test]
    fn adding_twice_is_a_no_op() {
        let mut map = RecordingMap::dark_style();
        add_buildings_layer(&mut map, &BuildingsConfig::default());
        add_buildings_layer(&mut map, &BuildingsConfig::default());
        assert!(map.errors().is_empty());
    }
}
