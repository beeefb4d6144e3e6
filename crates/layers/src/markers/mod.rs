//! DOM overlay markers kept in step with the pin list, route and live location.
//!
//! Each set is rebuilt from scratch whenever its input changes: every old
//! marker is removed before the replacements are created.

use std::collections::HashMap;

use foundation::math::LngLat;
use scene::{Pin, PinId, renderable_pins};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::host::{Anchor, FlyTo, MapEvent, MapHost, MarkerElement, MarkerId, MarkerKind, MarkerSpec};
use crate::labels::pin_label;
use crate::route::is_renderable;

pub mod focus;
pub mod set;

pub use focus::{ClickOutcome, FocusState};
pub use set::MarkerGroup;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Minimum zoom a focus fly-to ends at.
    pub focus_zoom: f64,
    pub fly_duration_ms: u32,
    pub fly_curve: f64,
    pub click_target_px: f64,
    pub label_offset: [f64; 2],
    pub photo_card_px: f64,
    pub photo_offset: [f64; 2],
    pub location_px: f64,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            focus_zoom: 17.0,
            fly_duration_ms: 1200,
            fly_curve: 1.42,
            click_target_px: 28.0,
            label_offset: [0.0, -34.0],
            photo_card_px: 88.0,
            photo_offset: [14.0, -40.0],
            location_px: 18.0,
        }
    }
}

/// Owns the click-target, label, photo, start and current-location marker sets.
#[derive(Debug)]
pub struct MarkerLifecycleManager {
    config: MarkerConfig,
    click_targets: MarkerGroup,
    labels: MarkerGroup,
    photos: MarkerGroup,
    start: MarkerGroup,
    location: MarkerGroup,
    pin_targets: HashMap<MarkerId, (PinId, LngLat)>,
    start_target: Option<(MarkerId, LngLat)>,
    focus: FocusState,
}

impl Default for MarkerLifecycleManager {
    fn default() -> Self {
        Self::new(MarkerConfig::default())
    }
}

impl MarkerLifecycleManager {
    pub fn new(config: MarkerConfig) -> Self {
        Self {
            config,
            click_targets: MarkerGroup::new(MarkerKind::ClickTarget),
            labels: MarkerGroup::new(MarkerKind::LabelBadge),
            photos: MarkerGroup::new(MarkerKind::PhotoCard),
            start: MarkerGroup::new(MarkerKind::StartMarker),
            location: MarkerGroup::new(MarkerKind::CurrentLocation),
            pin_targets: HashMap::new(),
            start_target: None,
            focus: FocusState::Idle,
        }
    }

    pub fn focus(&self) -> &FocusState {
        &self.focus
    }

    pub fn group(&self, kind: MarkerKind) -> Option<&MarkerGroup> {
        match kind {
            MarkerKind::ClickTarget => Some(&self.click_targets),
            MarkerKind::LabelBadge => Some(&self.labels),
            MarkerKind::PhotoCard => Some(&self.photos),
            MarkerKind::StartMarker => Some(&self.start),
            MarkerKind::CurrentLocation => Some(&self.location),
            // Owned by the route overlay.
            MarkerKind::DurationBadge => None,
        }
    }

    /// Rebuilds click targets and numbered label badges.
    pub fn sync_pins(&mut self, host: &mut dyn MapHost, pins: &[Pin]) {
        let pins = renderable_pins(pins);

        let targets: Vec<MarkerSpec> = pins
            .iter()
            .map(|pin| {
                let px = self.config.click_target_px;
                MarkerSpec::new(
                    MarkerElement::new(MarkerKind::ClickTarget)
                        .with_size(px, px)
                        .interactive(),
                    pin.lng_lat(),
                )
                .anchored(Anchor::Bottom)
            })
            .collect();
        let ids = self.click_targets.rebuild(host, targets);
        self.pin_targets = ids
            .iter()
            .zip(&pins)
            .map(|(id, pin)| (*id, (pin.id.clone(), pin.lng_lat())))
            .collect();

        let labels = pins.iter().enumerate().map(|(i, pin)| {
            MarkerSpec::new(
                MarkerElement::new(MarkerKind::LabelBadge).with_text(pin_label(i)),
                pin.lng_lat(),
            )
            .anchored(Anchor::Bottom)
            .with_offset(self.config.label_offset)
        });
        self.labels.rebuild(host, labels);

        if let Some(focused) = self.focus.focused()
            && !pins.iter().any(|p| &p.id == focused)
        {
            self.focus.disengage();
        }
    }

    /// Rebuilds photo cards for pins that have a photo.
    ///
    /// `photos` is keyed by place id when the pin has one, else by pin id.
    pub fn sync_photos(&mut self, host: &mut dyn MapHost, pins: &[Pin], photos: &HashMap<String, String>) {
        let px = self.config.photo_card_px;
        let offset = self.config.photo_offset;
        let cards = renderable_pins(pins).into_iter().filter_map(|pin| {
            let url = photos.get(&pin.photo_key()).filter(|url| !url.is_empty())?;
            Some(
                MarkerSpec::new(
                    MarkerElement::new(MarkerKind::PhotoCard)
                        .with_image(url.clone())
                        .with_size(px, px),
                    pin.lng_lat(),
                )
                .anchored(Anchor::Left)
                .with_offset(offset),
            )
        });
        self.photos.rebuild(host, cards);
    }

    /// Places the start marker on the route's first coordinate.
    pub fn sync_start(&mut self, host: &mut dyn MapHost, route: &[LngLat]) {
        let start = route.first().copied().filter(|_| is_renderable(route));
        let spec = start.map(|at| {
            MarkerSpec::new(
                MarkerElement::new(MarkerKind::StartMarker)
                    .with_text("START")
                    .interactive(),
                at,
            )
            .anchored(Anchor::Bottom)
        });
        let ids = self.start.rebuild(host, spec);
        self.start_target = ids.first().copied().zip(start);
    }

    pub fn sync_location(&mut self, host: &mut dyn MapHost, location: Option<LngLat>) {
        let px = self.config.location_px;
        let spec = location.filter(LngLat::is_valid).map(|at| {
            MarkerSpec::new(
                MarkerElement::new(MarkerKind::CurrentLocation).with_size(px, px),
                at,
            )
        });
        self.location.rebuild(host, spec);
    }

    /// Handles a click on one of our markers. Returns the pin to report to the
    /// hosting view, which only happens for a click on the already-focused pin.
    pub fn handle_click(&mut self, host: &mut dyn MapHost, marker: MarkerId) -> Option<PinId> {
        if let Some((pin, at)) = self.pin_targets.get(&marker).cloned() {
            return match self.focus.click(&pin) {
                ClickOutcome::FlyTo(_) => {
                    self.fly_to(host, at);
                    None
                }
                ClickOutcome::Select(pin) => Some(pin),
            };
        }
        if let Some((id, at)) = self.start_target
            && id == marker
        {
            self.fly_to(host, at);
            return None;
        }
        trace!(marker = marker.0, "click on a marker without an action");
        None
    }

    /// Map gestures: a user pan or zoom clears the focused pin.
    pub fn on_map_event(&mut self, event: &MapEvent) {
        match event {
            MapEvent::DragStart | MapEvent::ZoomStart { user_initiated: true } => {
                self.focus.disengage();
            }
            _ => {}
        }
    }

    pub fn clear_all(&mut self, host: &mut dyn MapHost) {
        for group in [
            &mut self.click_targets,
            &mut self.labels,
            &mut self.photos,
            &mut self.start,
            &mut self.location,
        ] {
            group.clear(host);
        }
        self.pin_targets.clear();
        self.start_target = None;
        self.focus = FocusState::Idle;
        debug!("all overlay markers removed");
    }

    fn fly_to(&self, host: &mut dyn MapHost, center: LngLat) {
        host.fly_to(FlyTo {
            center,
            zoom: host.zoom().max(self.config.focus_zoom),
            duration_ms: self.config.fly_duration_ms,
            curve: self.config.fly_curve,
            essential: true,
        });
    }
}
