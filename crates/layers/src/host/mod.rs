//! Contract with the host map renderer.
//!
//! Everything the overlay needs from the basemap goes through these traits so
//! the host can be swapped or replaced by `RecordingMap` in tests.

use std::any::Any;

use foundation::math::{LngLat, Mat4};
use gpu::RenderBackend;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::layer::{Layer, LayerId, SourceId};
use crate::symbology::{ExtrusionStyle, LineStyle};

pub mod recording;

pub use recording::RecordingMap;

/// Services a custom layer may use while attached.
pub trait LayerHost {
    /// Renderer bound to the host's existing canvas and graphics context.
    fn create_renderer(&mut self) -> Box<dyn RenderBackend>;
    fn trigger_repaint(&mut self);
}

/// A caller-supplied renderer drawing into the host's frame.
pub trait CustomLayer: Layer {
    fn attach(&mut self, host: &mut dyn LayerHost);
    /// Called once per host frame with the host camera's projection matrix.
    fn render(&mut self, host: &mut dyn LayerHost, projection: &Mat4);
    fn detach(&mut self, host: &mut dyn LayerHost);
    fn as_any(&self) -> &dyn Any;
}

#[derive(Debug, Clone, PartialEq)]
pub enum StyleLayerKind {
    Line(LineStyle),
    FillExtrusion {
        source_layer: String,
        min_zoom: f64,
        filter: Value,
        style: ExtrusionStyle,
    },
}

/// A declarative style layer drawn by the host itself.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleLayer {
    pub id: LayerId,
    pub source: SourceId,
    pub kind: StyleLayerKind,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(pub u64);

/// Which overlay set a marker belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerKind {
    ClickTarget,
    LabelBadge,
    PhotoCard,
    StartMarker,
    CurrentLocation,
    DurationBadge,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

/// Description of the DOM element a host creates for a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerElement {
    pub kind: MarkerKind,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub size_px: Option<[f64; 2]>,
    /// Receives pointer events (a button rather than a passive label).
    pub interactive: bool,
}

impl MarkerElement {
    pub fn new(kind: MarkerKind) -> Self {
        Self {
            kind,
            text: None,
            image_url: None,
            size_px: None,
            interactive: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size_px = Some([width, height]);
        self
    }

    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub element: MarkerElement,
    pub position: LngLat,
    pub anchor: Anchor,
    /// Pixel offset from the anchor point.
    pub offset: [f64; 2],
}

impl MarkerSpec {
    pub fn new(element: MarkerElement, position: LngLat) -> Self {
        Self {
            element,
            position,
            anchor: Anchor::Center,
            offset: [0.0, 0.0],
        }
    }

    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_offset(mut self, offset: [f64; 2]) -> Self {
        self.offset = offset;
        self
    }
}

/// Animated camera transition.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlyTo {
    pub center: LngLat,
    pub zoom: f64,
    pub duration_ms: u32,
    /// Zoom curve of the flight path (host easing parameter).
    pub curve: f64,
    /// Run even when the user prefers reduced motion.
    pub essential: bool,
}

/// Events the host reports back to the hosting view.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MapEvent {
    StyleLoaded,
    MarkerClicked(MarkerId),
    DragStart,
    /// `user_initiated` is false for zooms caused by our own camera animations.
    ZoomStart { user_initiated: bool },
}

/// The basemap renderer's imperative API.
pub trait MapHost {
    /// Adds a custom layer below `before`, or on top when `before` is `None`.
    /// The host calls `CustomLayer::attach` before returning.
    fn add_custom_layer(&mut self, layer: Box<dyn CustomLayer>, before: Option<&LayerId>);
    fn add_style_layer(&mut self, layer: StyleLayer, before: Option<&LayerId>);
    fn has_layer(&self, id: &LayerId) -> bool;
    /// Removes a layer; custom layers are detached first.
    fn remove_layer(&mut self, id: &LayerId);
    /// First symbol layer of the base style that renders text, if any.
    fn first_label_layer(&self) -> Option<LayerId>;

    fn has_source(&self, id: &SourceId) -> bool;
    fn add_geojson_source(&mut self, id: SourceId, data: Value);
    fn set_geojson_data(&mut self, id: &SourceId, data: Value);
    fn remove_source(&mut self, id: &SourceId);

    fn add_marker(&mut self, marker: MarkerSpec) -> MarkerId;
    fn remove_marker(&mut self, id: MarkerId);

    fn fly_to(&mut self, options: FlyTo);
    fn zoom(&self) -> f64;

    /// Releases the map instance: custom layers are detached and every
    /// source and marker is dropped.
    fn release(&mut self);
}
