//! The hosting view: wires pins, route and live location into one map.

use std::collections::HashMap;
use std::rc::Rc;

use foundation::math::LngLat;
use layers::buildings::add_buildings_layer;
use layers::host::{MapEvent, MapHost};
use layers::markers::MarkerLifecycleManager;
use layers::pins::{AssetSource, PinsLayer};
use layers::route::{RouteOverlay, RouteSegmentMeta};
use layers::LayerId;
use runtime::{LocationEvent, LocationSource, LocationTracker};
use scene::{Pin, PinId};
use tracing::{debug, info};

use crate::config::ViewConfig;

/// Receives the pin id of a confirmed (second) click.
pub type PinClickHandler = Box<dyn FnMut(PinId)>;

/// One mounted map with its overlays.
///
/// Setters may be called before the base style finishes loading; the latest
/// values are applied once it does.
pub struct RouteMapView<H: MapHost> {
    host: H,
    config: ViewConfig,
    assets: Rc<dyn AssetSource>,
    location_source: Option<Box<dyn LocationSource>>,
    ready: bool,
    pins: Vec<Pin>,
    route: Vec<LngLat>,
    segments: Vec<RouteSegmentMeta>,
    photos: HashMap<String, String>,
    location: LocationTracker,
    markers: MarkerLifecycleManager,
    route_overlay: RouteOverlay,
    on_pin_click: Option<PinClickHandler>,
}

impl<H: MapHost> RouteMapView<H> {
    pub fn mount(host: H, config: ViewConfig, assets: Rc<dyn AssetSource>) -> Self {
        info!(
            style = %config.style_url,
            center = ?config.camera.center.as_array(),
            zoom = config.camera.zoom,
            "route map mounted"
        );
        Self {
            host,
            markers: MarkerLifecycleManager::new(config.markers.clone()),
            route_overlay: RouteOverlay::new(config.route.clone()),
            config,
            assets,
            location_source: None,
            ready: false,
            pins: Vec::new(),
            route: Vec::new(),
            segments: Vec::new(),
            photos: HashMap::new(),
            location: LocationTracker::new(),
            on_pin_click: None,
        }
    }

    /// Subscribes to device location for the lifetime of the view.
    pub fn with_location_source(mut self, mut source: Box<dyn LocationSource>) -> Self {
        self.location.start(source.as_mut());
        self.location_source = Some(source);
        self
    }

    pub fn set_on_pin_click(&mut self, handler: impl FnMut(PinId) + 'static) {
        self.on_pin_click = Some(Box::new(handler));
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn markers(&self) -> &MarkerLifecycleManager {
        &self.markers
    }

    pub fn route_overlay(&self) -> &RouteOverlay {
        &self.route_overlay
    }

    pub fn current_location(&self) -> Option<LngLat> {
        self.location.current()
    }

    pub fn handle_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::StyleLoaded => self.on_style_loaded(),
            MapEvent::MarkerClicked(marker) => {
                if let Some(pin) = self.markers.handle_click(&mut self.host, marker) {
                    info!(%pin, "pin selected");
                    if let Some(handler) = self.on_pin_click.as_mut() {
                        handler(pin);
                    }
                }
            }
            MapEvent::DragStart | MapEvent::ZoomStart { .. } => self.markers.on_map_event(&event),
        }
    }

    pub fn set_pins(&mut self, pins: Vec<Pin>) {
        self.pins = pins;
        if self.ready {
            self.sync_pins();
        }
    }

    pub fn set_photos(&mut self, photos: HashMap<String, String>) {
        self.photos = photos;
        if self.ready {
            self.markers.sync_photos(&mut self.host, &self.pins, &self.photos);
        }
    }

    pub fn set_route(&mut self, route: Vec<LngLat>) {
        self.route = route;
        if self.ready {
            self.sync_route();
        }
    }

    pub fn set_segments(&mut self, segments: Vec<RouteSegmentMeta>) {
        self.segments = segments;
        if self.ready {
            self.sync_route();
        }
    }

    /// Applies one update from the location subscription. Errors and invalid
    /// fixes are dropped and the last marker stays.
    pub fn on_location_event(&mut self, event: LocationEvent) {
        if self.location.on_event(event) && self.ready {
            self.markers.sync_location(&mut self.host, self.location.current());
        }
    }

    /// Tears down every overlay and releases the map.
    pub fn unmount(mut self) -> H {
        if let Some(source) = self.location_source.as_mut() {
            self.location.stop(source.as_mut());
        }
        self.markers.clear_all(&mut self.host);
        self.route_overlay.clear(&mut self.host);
        self.host.release();
        info!("route map unmounted");
        self.host
    }

    fn on_style_loaded(&mut self) {
        if self.ready {
            debug!("style reloaded; overlays already in place");
            return;
        }
        self.sync_pins_layer();
        add_buildings_layer(&mut self.host, &self.config.buildings);
        self.ready = true;

        self.sync_route();
        self.markers.sync_pins(&mut self.host, &self.pins);
        self.markers.sync_photos(&mut self.host, &self.pins, &self.photos);
        self.markers.sync_location(&mut self.host, self.location.current());
        info!(pins = self.pins.len(), route_points = self.route.len(), "overlays ready");
    }

    fn sync_pins(&mut self) {
        self.sync_pins_layer();
        self.markers.sync_pins(&mut self.host, &self.pins);
        self.markers.sync_photos(&mut self.host, &self.pins, &self.photos);
    }

    /// Replaces the 3D pin layer wholesale.
    fn sync_pins_layer(&mut self) {
        let id = LayerId::new(self.config.pins.layer_id.clone());
        if self.host.has_layer(&id) {
            self.host.remove_layer(&id);
        }
        let layer = PinsLayer::new(self.pins.clone(), self.config.pins.clone(), self.assets.clone());
        self.host.add_custom_layer(Box::new(layer), None);
    }

    fn sync_route(&mut self) {
        self.route_overlay.sync(&mut self.host, &self.route, &self.segments);
        self.markers.sync_start(&mut self.host, &self.route);
    }
}
