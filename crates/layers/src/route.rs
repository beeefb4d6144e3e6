//! Route line and per-segment duration badges.

use foundation::math::LngLat;
use formats::route_feature;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::host::{MapHost, MarkerElement, MarkerKind, MarkerSpec, StyleLayer, StyleLayerKind};
use crate::labels::duration_label;
use crate::layer::{LayerId, SourceId};
use crate::markers::MarkerGroup;
use crate::symbology::RouteStyle;

pub const ROUTE_SOURCE_ID: &str = "route";
pub const ROUTE_GLOW_LAYER_ID: &str = "route-glow";
pub const ROUTE_CORE_LAYER_ID: &str = "route-core";

/// Travel metadata for the gap between two consecutive route coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteSegmentMeta {
    pub duration_minutes: Option<f64>,
    pub transport_mode: Option<String>,
    pub walk_minutes: Option<f64>,
    pub drive_minutes: Option<f64>,
}

/// Whether a coordinate sequence can be drawn as a line.
pub fn is_renderable(route: &[LngLat]) -> bool {
    route.len() >= 2
}

/// Owns the route source, its two stroke layers and the duration badges.
#[derive(Debug)]
pub struct RouteOverlay {
    style: RouteStyle,
    badges: MarkerGroup,
}

impl Default for RouteOverlay {
    fn default() -> Self {
        Self::new(RouteStyle::default())
    }
}

impl RouteOverlay {
    pub fn new(style: RouteStyle) -> Self {
        Self {
            style,
            badges: MarkerGroup::new(MarkerKind::DurationBadge),
        }
    }

    pub fn badge_count(&self) -> usize {
        self.badges.len()
    }

    pub fn badges(&self) -> &MarkerGroup {
        &self.badges
    }

    /// Brings the line and badges in line with `route`.
    ///
    /// `segments[i]` describes the gap between `route[i]` and `route[i + 1]`.
    pub fn sync(&mut self, host: &mut dyn MapHost, route: &[LngLat], segments: &[RouteSegmentMeta]) {
        if !is_renderable(route) {
            self.clear(host);
            return;
        }

        let source = SourceId::new(ROUTE_SOURCE_ID);
        let feature = route_feature(route);
        if host.has_source(&source) {
            host.set_geojson_data(&source, feature);
            debug!(points = route.len(), "route geometry updated");
        } else {
            host.add_geojson_source(source.clone(), feature);
            host.add_style_layer(
                StyleLayer {
                    id: LayerId::new(ROUTE_GLOW_LAYER_ID),
                    source: source.clone(),
                    kind: StyleLayerKind::Line(self.style.glow.clone()),
                },
                None,
            );
            host.add_style_layer(
                StyleLayer {
                    id: LayerId::new(ROUTE_CORE_LAYER_ID),
                    source,
                    kind: StyleLayerKind::Line(self.style.core.clone()),
                },
                None,
            );
            info!(points = route.len(), "route layers added");
        }

        self.sync_badges(host, route, segments);
    }

    /// Removes every route visual. Safe to call when nothing is shown.
    pub fn clear(&mut self, host: &mut dyn MapHost) {
        for id in [ROUTE_CORE_LAYER_ID, ROUTE_GLOW_LAYER_ID] {
            let id = LayerId::new(id);
            if host.has_layer(&id) {
                host.remove_layer(&id);
            }
        }
        let source = SourceId::new(ROUTE_SOURCE_ID);
        if host.has_source(&source) {
            host.remove_source(&source);
            info!("route removed");
        }
        self.badges.clear(host);
    }

    fn sync_badges(&mut self, host: &mut dyn MapHost, route: &[LngLat], segments: &[RouteSegmentMeta]) {
        let specs: Vec<MarkerSpec> = route
            .windows(2)
            .zip(segments)
            .filter_map(|(ends, meta)| {
                let text = duration_label(meta)?;
                Some(MarkerSpec::new(
                    MarkerElement::new(MarkerKind::DurationBadge).with_text(text),
                    ends[0].midpoint(ends[1]),
                ))
            })
            .collect();
        self.badges.rebuild(host, specs);
    }
}
