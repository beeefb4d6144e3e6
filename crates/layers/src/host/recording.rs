use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use foundation::math::Mat4;
use gpu::{RecordingBackend, RenderBackend, RenderLog};
use serde_json::Value;
use tracing::warn;

use super::{
    CustomLayer, FlyTo, LayerHost, MapHost, MarkerId, MarkerKind, MarkerSpec, StyleLayer,
};
use crate::layer::{LayerId, SourceId};

enum LayerEntry {
    /// Layer that came with the base style.
    Base { id: LayerId, has_text: bool },
    Style(StyleLayer),
    Custom(Box<dyn CustomLayer>),
}

impl LayerEntry {
    fn id(&self) -> LayerId {
        match self {
            LayerEntry::Base { id, .. } => id.clone(),
            LayerEntry::Style(layer) => layer.id.clone(),
            LayerEntry::Custom(layer) => layer.id(),
        }
    }
}

#[derive(Default)]
struct Surface {
    renderers: Vec<Rc<RefCell<RenderLog>>>,
    repaint_requests: u64,
}

impl LayerHost for Surface {
    fn create_renderer(&mut self) -> Box<dyn RenderBackend> {
        let backend = RecordingBackend::new();
        self.renderers.push(backend.log());
        Box::new(backend)
    }

    fn trigger_repaint(&mut self) {
        self.repaint_requests += 1;
    }
}

/// In-memory `MapHost` that records every call.
///
/// Misuse a real host would reject (duplicate ids, updating a missing source)
/// is collected in `errors()` instead of failing.
pub struct RecordingMap {
    layers: Vec<LayerEntry>,
    surface: Surface,
    sources: BTreeMap<SourceId, Value>,
    markers: BTreeMap<MarkerId, MarkerSpec>,
    next_marker: u64,
    removed_markers: u64,
    fly_tos: Vec<FlyTo>,
    zoom: f64,
    errors: Vec<String>,
}

impl Default for RecordingMap {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingMap {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            surface: Surface::default(),
            sources: BTreeMap::new(),
            markers: BTreeMap::new(),
            next_marker: 0,
            removed_markers: 0,
            fly_tos: Vec::new(),
            zoom: 15.0,
            errors: Vec::new(),
        }
    }

    /// Seeds the base style. `has_text` marks symbol layers that render labels.
    pub fn with_base_layers<'a>(layers: impl IntoIterator<Item = (&'a str, bool)>) -> Self {
        let mut map = Self::new();
        for (id, has_text) in layers {
            map.layers.push(LayerEntry::Base {
                id: LayerId::new(id),
                has_text,
            });
        }
        map
    }

    /// Registers a source that ships with the base style (e.g. vector tiles).
    pub fn with_base_source(mut self, id: &str) -> Self {
        self.sources.insert(SourceId::new(id), Value::Null);
        self
    }

    /// A dark basemap: buildings in a `composite` source and two text label layers.
    pub fn dark_style() -> Self {
        Self::with_base_layers([
            ("land", false),
            ("water", false),
            ("road", false),
            ("road-label", true),
            ("poi-label", true),
        ])
        .with_base_source("composite")
    }

    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.layers.iter().map(LayerEntry::id).collect()
    }

    pub fn style_layer(&self, id: &LayerId) -> Option<&StyleLayer> {
        self.layers.iter().find_map(|entry| match entry {
            LayerEntry::Style(layer) if &layer.id == id => Some(layer),
            _ => None,
        })
    }

    pub fn custom_layer<T: 'static>(&self, id: &LayerId) -> Option<&T> {
        self.layers.iter().find_map(|entry| match entry {
            LayerEntry::Custom(layer) if &layer.id() == id => layer.as_any().downcast_ref::<T>(),
            _ => None,
        })
    }

    pub fn source(&self, id: &SourceId) -> Option<&Value> {
        self.sources.get(id)
    }

    pub fn marker(&self, id: MarkerId) -> Option<&MarkerSpec> {
        self.markers.get(&id)
    }

    pub fn markers(&self) -> impl Iterator<Item = (MarkerId, &MarkerSpec)> + '_ {
        self.markers.iter().map(|(id, spec)| (*id, spec))
    }

    pub fn markers_of(&self, kind: MarkerKind) -> Vec<(MarkerId, &MarkerSpec)> {
        self.markers()
            .filter(|(_, spec)| spec.element.kind == kind)
            .collect()
    }

    pub fn removed_marker_count(&self) -> u64 {
        self.removed_markers
    }

    pub fn fly_tos(&self) -> &[FlyTo] {
        &self.fly_tos
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    pub fn repaint_requests(&self) -> u64 {
        self.surface.repaint_requests
    }

    /// One log per renderer ever created, in creation order.
    pub fn render_logs(&self) -> &[Rc<RefCell<RenderLog>>] {
        &self.surface.renderers
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Runs one host frame: every custom layer renders with `projection`.
    pub fn render_frame(&mut self, projection: &Mat4) {
        for entry in &mut self.layers {
            if let LayerEntry::Custom(layer) = entry {
                layer.render(&mut self.surface, projection);
            }
        }
    }

    fn index_of(&self, id: &LayerId) -> Option<usize> {
        self.layers.iter().position(|entry| &entry.id() == id)
    }

    fn insert_layer(&mut self, entry: LayerEntry, before: Option<&LayerId>) {
        let id = entry.id();
        if self.index_of(&id).is_some() {
            self.errors.push(format!("layer {id} already exists"));
            return;
        }
        let index = match before {
            Some(before) => match self.index_of(before) {
                Some(index) => index,
                None => {
                    self.errors.push(format!("before-layer {before} does not exist"));
                    self.layers.len()
                }
            },
            None => self.layers.len(),
        };
        self.layers.insert(index, entry);
    }
}

impl MapHost for RecordingMap {
    fn add_custom_layer(&mut self, mut layer: Box<dyn CustomLayer>, before: Option<&LayerId>) {
        if self.index_of(&layer.id()).is_some() {
            self.errors.push(format!("layer {} already exists", layer.id()));
            return;
        }
        layer.attach(&mut self.surface);
        self.insert_layer(LayerEntry::Custom(layer), before);
    }

    fn add_style_layer(&mut self, layer: StyleLayer, before: Option<&LayerId>) {
        if !self.sources.contains_key(&layer.source) {
            self.errors.push(format!(
                "layer {} references missing source {}",
                layer.id, layer.source
            ));
        }
        self.insert_layer(LayerEntry::Style(layer), before);
    }

    fn has_layer(&self, id: &LayerId) -> bool {
        self.index_of(id).is_some()
    }

    fn remove_layer(&mut self, id: &LayerId) {
        let Some(index) = self.index_of(id) else {
            self.errors.push(format!("cannot remove missing layer {id}"));
            return;
        };
        if let LayerEntry::Custom(mut layer) = self.layers.remove(index) {
            layer.detach(&mut self.surface);
        }
    }

    fn first_label_layer(&self) -> Option<LayerId> {
        self.layers.iter().find_map(|entry| match entry {
            LayerEntry::Base { id, has_text: true } => Some(id.clone()),
            _ => None,
        })
    }

    fn has_source(&self, id: &SourceId) -> bool {
        self.sources.contains_key(id)
    }

    fn add_geojson_source(&mut self, id: SourceId, data: Value) {
        if self.sources.contains_key(&id) {
            self.errors.push(format!("source {id} already exists"));
            return;
        }
        self.sources.insert(id, data);
    }

    fn set_geojson_data(&mut self, id: &SourceId, data: Value) {
        match self.sources.get_mut(id) {
            Some(slot) => *slot = data,
            None => self.errors.push(format!("cannot update missing source {id}")),
        }
    }

    fn remove_source(&mut self, id: &SourceId) {
        let still_used = self.layers.iter().any(|entry| {
            matches!(entry, LayerEntry::Style(layer) if &layer.source == id)
        });
        if still_used {
            warn!(source = %id, "removing a source that layers still reference");
            self.errors.push(format!("source {id} is still in use"));
        }
        if self.sources.remove(id).is_none() {
            self.errors.push(format!("cannot remove missing source {id}"));
        }
    }

    fn add_marker(&mut self, marker: MarkerSpec) -> MarkerId {
        self.next_marker += 1;
        let id = MarkerId(self.next_marker);
        self.markers.insert(id, marker);
        id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        if self.markers.remove(&id).is_some() {
            self.removed_markers += 1;
        } else {
            self.errors.push(format!("cannot remove missing marker {}", id.0));
        }
    }

    fn fly_to(&mut self, options: FlyTo) {
        self.fly_tos.push(options);
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn release(&mut self) {
        for entry in self.layers.drain(..) {
            if let LayerEntry::Custom(mut layer) = entry {
                layer.detach(&mut self.surface);
            }
        }
        self.sources.clear();
        self.removed_markers += self.markers.len() as u64;
        self.markers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::RecordingMap;
    use crate::host::{MapHost, MarkerElement, MarkerKind, MarkerSpec, StyleLayer, StyleLayerKind};
    use crate::layer::{LayerId, SourceId};
    use crate::symbology::LineStyle;
    use foundation::math::LngLat;
    use serde_json::json;

    fn line(id: &str) -> StyleLayer {
        StyleLayer {
            id: LayerId::new(id),
            source: SourceId::new("src"),
            kind: StyleLayerKind::Line(LineStyle::new("#fff", 1.0, 1.0)),
        }
    }

    #[test]
    fn inserts_before_named_layer() {
        let mut map = RecordingMap::with_base_layers([("water", false), ("road-label", true)]);
        map.add_geojson_source(SourceId::new("src"), json!({}));
        map.add_style_layer(line("a"), map.first_label_layer().as_ref());
        let ids: Vec<String> = map.layer_ids().into_iter().map(|l| l.0).collect();
        assert_eq!(ids, vec!["water", "a", "road-label"]);
        assert!(map.errors().is_empty());
    }

    #[test]
    fn duplicate_layer_is_reported() {
        let mut map = RecordingMap::new();
        map.add_geojson_source(SourceId::new("src"), json!({}));
        map.add_style_layer(line("a"), None);
        map.add_style_layer(line("a"), None);
        assert_eq!(map.layer_ids().len(), 1);
        assert_eq!(map.errors().len(), 1);
    }

    #[test]
    fn markers_are_filtered_by_kind() {
        let mut map = RecordingMap::new();
        let at = LngLat::new(0.0, 0.0);
        let a = map.add_marker(MarkerSpec::new(MarkerElement::new(MarkerKind::LabelBadge), at));
        map.add_marker(MarkerSpec::new(MarkerElement::new(MarkerKind::PhotoCard), at));
        assert_eq!(map.markers_of(MarkerKind::LabelBadge).len(), 1);
        map.remove_marker(a);
        assert!(map.markers_of(MarkerKind::LabelBadge).is_empty());
        assert_eq!(map.removed_marker_count(), 1);
    }

    #[test]
    fn release_drops_layers_sources_and_markers() {
        let mut map = RecordingMap::dark_style();
        map.add_geojson_source(SourceId::new("src"), json!({}));
        map.add_style_layer(line("a"), None);
        map.add_marker(MarkerSpec::new(
            MarkerElement::new(MarkerKind::StartMarker),
            LngLat::new(0.0, 0.0),
        ));
        map.release();
        assert!(map.layer_ids().is_empty());
        assert!(!map.has_source(&SourceId::new("composite")));
        assert_eq!(map.markers().count(), 0);
        assert_eq!(map.removed_marker_count(), 1);
        assert!(map.errors().is_empty());
    }
}
