//! 3D pin layer drawn inside the host map's frame.

use std::any::Any;
use std::rc::Rc;
use std::task::{Context, Poll};

use foundation::math::{CoordinateProjector, Mat4, MercatorProjector, Vec3};
use futures_util::FutureExt;
use futures_util::task::noop_waker_ref;
use gpu::{Camera, RenderBackend, RenderFrame};
use runtime::Frame;
use scene::lights::Light;
use scene::{Pin, PinScene, SceneObject, renderable_pins};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::host::{CustomLayer, LayerHost};
use crate::layer::{Layer, LayerId};

pub mod asset;

pub use asset::{
    AssetLoad, AssetSource, FileAssetSource, StaticAssetSource, fallback_object, instantiate,
    load_base_asset,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinsLayerConfig {
    pub layer_id: String,
    pub asset_url: String,
    /// Real-world height every pin is scaled to, in meters.
    pub pin_height_m: f64,
    /// Native height assumed for the procedural cone.
    pub fallback_native_height: f64,
    /// Assets whose bounding-box height is below this are treated as unusable.
    pub degenerate_epsilon: f64,
    pub render_order: i32,
    pub ambient_intensity: f32,
    pub directional_intensity: f32,
    pub directional_position: [f64; 3],
}

impl Default for PinsLayerConfig {
    fn default() -> Self {
        Self {
            layer_id: "three-pins".to_string(),
            asset_url: "/models/pin.glb".to_string(),
            pin_height_m: 35.0,
            fallback_native_height: scene::prefabs::FALLBACK_CONE_HEIGHT,
            degenerate_epsilon: 1e-6,
            render_order: 10,
            ambient_intensity: 0.9,
            directional_intensity: 0.6,
            directional_position: [0.0, 10.0, 10.0],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AssetState {
    /// Attached; the load is still pending and the scene has no pins yet.
    Pending,
    Loaded,
    /// The load failed; every pin uses the procedural cone.
    Fallback,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayerState {
    Uninitialized,
    Attached(AssetState),
    TornDown,
}

/// Custom layer owning the persistent pin scene and its renderer.
///
/// The pin list is fixed for the layer's lifetime; a changed list means the
/// layer is removed and a new one added.
pub struct PinsLayer {
    config: PinsLayerConfig,
    pins: Vec<Pin>,
    source: Rc<dyn AssetSource>,
    projector: MercatorProjector,
    scene: PinScene,
    renderer: Option<Box<dyn RenderBackend>>,
    pending: Option<AssetLoad>,
    state: LayerState,
    frame: Frame,
}

impl PinsLayer {
    pub fn new(pins: Vec<Pin>, config: PinsLayerConfig, source: Rc<dyn AssetSource>) -> Self {
        Self {
            config,
            pins,
            source,
            projector: MercatorProjector,
            scene: PinScene::new(),
            renderer: None,
            pending: None,
            state: LayerState::Uninitialized,
            frame: Frame::default(),
        }
    }

    pub fn state(&self) -> LayerState {
        self.state
    }

    pub fn scene(&self) -> &PinScene {
        &self.scene
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Host frames rendered so far.
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Checks the pending asset load without blocking; populates the scene once it resolves.
    fn poll_asset(&mut self, host: &mut dyn LayerHost) {
        let Some(load) = self.pending.as_mut() else {
            return;
        };
        let mut cx = Context::from_waker(noop_waker_ref());
        let Poll::Ready(result) = load.poll_unpin(&mut cx) else {
            return;
        };
        self.pending = None;

        match result {
            Ok(asset) => {
                info!(asset = asset.label(), pins = self.pins.len(), "pin asset loaded");
                self.rebuild(|pin, config, projector| instantiate(&asset, pin, config, projector));
                self.state = LayerState::Attached(AssetState::Loaded);
            }
            Err(err) => {
                warn!(%err, url = %self.config.asset_url, "pin asset failed to load; using fallback pins");
                self.rebuild(fallback_object);
                self.state = LayerState::Attached(AssetState::Fallback);
            }
        }
        host.trigger_repaint();
    }

    fn rebuild(
        &mut self,
        make: impl Fn(&Pin, &PinsLayerConfig, &dyn CoordinateProjector) -> SceneObject,
    ) {
        let projector: &dyn CoordinateProjector = &self.projector;
        let objects: Vec<_> = renderable_pins(&self.pins)
            .into_iter()
            .map(|pin| make(pin, &self.config, projector))
            .collect();
        self.scene.replace_pins(objects);
        debug!(objects = self.scene.len(), "pin scene rebuilt");
    }
}

impl Layer for PinsLayer {
    fn id(&self) -> LayerId {
        LayerId::new(self.config.layer_id.clone())
    }
}

impl CustomLayer for PinsLayer {
    fn attach(&mut self, host: &mut dyn LayerHost) {
        if self.state != LayerState::Uninitialized {
            warn!(layer = %self.config.layer_id, state = ?self.state, "pins layer attached twice");
            return;
        }
        self.renderer = Some(host.create_renderer());

        let [x, y, z] = self.config.directional_position;
        self.scene
            .add_light(Light::ambient(0xffffff, self.config.ambient_intensity));
        self.scene.add_light(Light::directional(
            0xffffff,
            self.config.directional_intensity,
            Vec3::new(x, y, z),
        ));

        self.pending = Some(load_base_asset(
            self.source.as_ref(),
            &self.config.asset_url,
        ));
        self.state = LayerState::Attached(AssetState::Pending);
        info!(layer = %self.config.layer_id, pins = self.pins.len(), "pins layer attached");

        self.poll_asset(host);
    }

    fn render(&mut self, host: &mut dyn LayerHost, projection: &Mat4) {
        let LayerState::Attached(_) = self.state else {
            return;
        };
        self.poll_asset(host);

        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let frame = RenderFrame::collect(&self.scene, Camera::from_host_matrix(*projection));
        renderer.reset_state();
        renderer.clear_depth();
        renderer.draw(&frame);
        trace!(frame = self.frame.index, draws = frame.commands.len(), "pins frame");
        self.frame = self.frame.next();

        host.trigger_repaint();
    }

    fn detach(&mut self, _host: &mut dyn LayerHost) {
        if self.pending.take().is_some() {
            debug!(layer = %self.config.layer_id, "pin asset load cancelled");
        }
        if let Some(mut renderer) = self.renderer.take() {
            renderer.dispose();
        }
        self.scene.clear_pins();
        self.state = LayerState::TornDown;
        info!(layer = %self.config.layer_id, "pins layer detached");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
