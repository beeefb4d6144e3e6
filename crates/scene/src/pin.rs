use std::collections::HashSet;

use foundation::math::LngLat;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Identity of a pin within one rendering pass.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(pub String);

impl PinId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PinId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    pub id: PinId,
    pub lng: f64,
    pub lat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<u32>,
}

impl Pin {
    pub fn new(id: impl Into<String>, lng: f64, lat: f64) -> Self {
        Self {
            id: PinId::new(id),
            lng,
            lat,
            place_id: None,
        }
    }

    pub fn with_place_id(mut self, place_id: u32) -> Self {
        self.place_id = Some(place_id);
        self
    }

    pub fn lng_lat(&self) -> LngLat {
        LngLat::new(self.lng, self.lat)
    }

    pub fn has_valid_coordinates(&self) -> bool {
        self.lng_lat().is_valid()
    }

    /// Key used to look up a pin's photo: the place id when present, else the pin id.
    pub fn photo_key(&self) -> String {
        match self.place_id {
            Some(place_id) => place_id.to_string(),
            None => self.id.0.clone(),
        }
    }
}

/// Pins that can be placed on the map, in list order.
///
/// Pins with invalid coordinates are skipped. When an id repeats, the later
/// pin wins and takes the later position in the list.
pub fn renderable_pins(pins: &[Pin]) -> Vec<&Pin> {
    let mut seen = HashSet::new();
    let mut kept: Vec<&Pin> = Vec::with_capacity(pins.len());
    for pin in pins.iter().rev() {
        if !pin.has_valid_coordinates() {
            warn!(pin = %pin.id, lng = pin.lng, lat = pin.lat, "skipping pin with invalid coordinates");
            continue;
        }
        if !seen.insert(&pin.id) {
            warn!(pin = %pin.id, "duplicate pin id; keeping the later pin");
            continue;
        }
        kept.push(pin);
    }
    kept.reverse();
    kept
}
