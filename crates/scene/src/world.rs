use std::collections::BTreeMap;

use foundation::bounds::Aabb3;
use tracing::warn;

use crate::components::{Drawable3D, Transform};
use crate::lights::Light;
use crate::pin::PinId;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    /// Recentered clone of the loaded pin asset.
    AssetClone,
    /// Procedural stand-in for a missing or degenerate asset.
    FallbackCone,
}

/// A 3D visual bound 1:1 to a pin.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub pin_id: PinId,
    pub kind: ObjectKind,
    pub transform: Transform,
    pub drawable: Drawable3D,
}

impl SceneObject {
    /// Bounds in map world space.
    pub fn world_bounds(&self) -> Aabb3 {
        self.drawable
            .shape
            .local_bounds()
            .transformed(&self.transform.matrix())
    }
}

/// Persistent scene owned by the pins layer: lights plus one object per pin id.
#[derive(Debug, Default)]
pub struct PinScene {
    lights: Vec<Light>,
    objects: BTreeMap<PinId, SceneObject>,
}

impl PinScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Inserts an object, replacing any previous object for the same pin.
    pub fn insert(&mut self, object: SceneObject) -> Option<SceneObject> {
        let replaced = self.objects.insert(object.pin_id.clone(), object);
        if let Some(old) = &replaced {
            warn!(pin = %old.pin_id, "duplicate pin id in scene; keeping the later object");
        }
        replaced
    }

    /// Drops every pin object; lights stay.
    pub fn clear_pins(&mut self) {
        self.objects.clear();
    }

    /// Clears all pin objects, then populates from `objects`.
    pub fn replace_pins(&mut self, objects: impl IntoIterator<Item = SceneObject>) {
        self.clear_pins();
        for object in objects {
            self.insert(object);
        }
    }

    pub fn get(&self, pin: &PinId) -> Option<&SceneObject> {
        self.objects.get(pin)
    }

    pub fn contains(&self, pin: &PinId) -> bool {
        self.objects.contains_key(pin)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> + '_ {
        self.objects.values()
    }

    pub fn pin_ids(&self) -> impl Iterator<Item = &PinId> + '_ {
        self.objects.keys()
    }
}
