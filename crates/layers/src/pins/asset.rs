//! Pin model loading and per-pin instantiation.
//!
//! The base asset is loaded once per layer. Each pin gets its own recentered
//! clone, scaled so every pin stands the same real-world height. Anything
//! unusable degrades to a procedural cone.

use std::collections::HashMap;
use std::f64::consts::FRAC_PI_2;
use std::path::PathBuf;

use formats::{AssetError, AssetHandle};
use foundation::math::{CoordinateProjector, lifted_position, render_scale};
use futures_util::FutureExt;
use futures_util::future::{self, LocalBoxFuture};
use scene::components::{Drawable3D, Material, Shape3D, Transform};
use scene::prefabs::fallback_cone_with_height;
use scene::{ObjectKind, Pin, SceneObject};
use tracing::{debug, warn};

use super::PinsLayerConfig;

/// A single in-flight asset load.
pub type AssetLoad = LocalBoxFuture<'static, Result<AssetHandle, AssetError>>;

/// Where pin models come from (network, disk, memory).
pub trait AssetSource {
    fn load(&self, url: &str) -> AssetLoad;
}

/// Starts loading the base pin asset. Resolution is observed by polling.
pub fn load_base_asset(source: &dyn AssetSource, url: &str) -> AssetLoad {
    debug!(url, "loading pin asset");
    source.load(url)
}

/// Reads glTF/GLB files from a directory, treating URLs as relative paths.
#[derive(Debug, Clone)]
pub struct FileAssetSource {
    root: PathBuf,
}

impl FileAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for FileAssetSource {
    fn load(&self, url: &str) -> AssetLoad {
        let path = self.root.join(url.trim_start_matches('/'));
        let url = url.to_string();
        let result = std::fs::read(&path)
            .map_err(|e| AssetError::Fetch {
                url: url.clone(),
                reason: e.to_string(),
            })
            .and_then(|bytes| AssetHandle::from_slice(url, &bytes));
        future::ready(result).boxed_local()
    }
}

/// Serves pre-parsed assets; unknown URLs fail like a 404.
#[derive(Debug, Clone, Default)]
pub struct StaticAssetSource {
    assets: HashMap<String, AssetHandle>,
}

impl StaticAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, url: impl Into<String>, asset: AssetHandle) -> Self {
        self.assets.insert(url.into(), asset);
        self
    }
}

impl AssetSource for StaticAssetSource {
    fn load(&self, url: &str) -> AssetLoad {
        let result = self.assets.get(url).cloned().ok_or_else(|| AssetError::Fetch {
            url: url.to_string(),
            reason: "not found".to_string(),
        });
        future::ready(result).boxed_local()
    }
}

/// Clones `asset` for `pin`, or falls back to a cone when the clone is degenerate.
pub fn instantiate(
    asset: &AssetHandle,
    pin: &Pin,
    config: &PinsLayerConfig,
    projector: &dyn CoordinateProjector,
) -> SceneObject {
    let bounds = asset.bounds();
    let size = bounds.size();
    if bounds.is_empty() || size.y < config.degenerate_epsilon {
        warn!(
            pin = %pin.id,
            asset = asset.label(),
            height = size.y,
            "asset bounds too small; using fallback pin"
        );
        return fallback_object(pin, config, projector);
    }

    // Recenter so the bounding-box center is the pivot.
    let shape = Shape3D::Mesh {
        meshes: asset.meshes().clone(),
        offset: -bounds.center(),
    };
    let native_height = size.y;
    let point = projector.project(pin.lng_lat());
    let scale = render_scale(config.pin_height_m, point.meters_to_world_unit, native_height);

    SceneObject {
        pin_id: pin.id.clone(),
        kind: ObjectKind::AssetClone,
        transform: upright(lifted_position(&point, native_height, scale), scale),
        drawable: Drawable3D::new(shape, Material::pin_highlight())
            .force_foreground(config.render_order),
    }
}

/// Procedural cone standing in for `pin`, placed by the same projector formula.
pub fn fallback_object(
    pin: &Pin,
    config: &PinsLayerConfig,
    projector: &dyn CoordinateProjector,
) -> SceneObject {
    let native_height = config.fallback_native_height;
    let point = projector.project(pin.lng_lat());
    let scale = render_scale(config.pin_height_m, point.meters_to_world_unit, native_height);

    SceneObject {
        pin_id: pin.id.clone(),
        kind: ObjectKind::FallbackCone,
        transform: upright(lifted_position(&point, native_height, scale), scale),
        drawable: fallback_cone_with_height(native_height).force_foreground(config.render_order),
    }
}

// Models are authored Y-up; map world space is Z-up.
fn upright(position: foundation::math::Vec3, scale: f64) -> Transform {
    Transform::translate(position)
        .with_rotation_x(FRAC_PI_2)
        .with_scale(scale)
}
