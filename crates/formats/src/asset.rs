//! Pin model assets.
//!
//! An `AssetHandle` is the parsed, immutable form of one glTF/GLB file: every
//! primitive's positions flattened into asset-local space with node transforms
//! applied. Cloning a handle is cheap; all clones share the same meshes.

use std::sync::Arc;

use foundation::bounds::Aabb3;
use foundation::math::{Mat4, Vec3};
use scene::components::{Mesh, SharedMeshes, meshes_bounds};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to fetch asset {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("failed to parse asset: {0}")]
    Parse(#[from] gltf::Error),
}

#[derive(Debug)]
struct AssetData {
    label: String,
    meshes: SharedMeshes,
    bounds: Aabb3,
}

#[derive(Debug, Clone)]
pub struct AssetHandle {
    inner: Arc<AssetData>,
}

impl AssetHandle {
    pub fn from_meshes(label: impl Into<String>, meshes: Vec<Mesh>) -> Self {
        let bounds = meshes_bounds(&meshes);
        Self {
            inner: Arc::new(AssetData {
                label: label.into(),
                meshes: Arc::new(meshes),
                bounds,
            }),
        }
    }

    /// Parses `.glb` or `.gltf` bytes (embedded or data-URI buffers only).
    pub fn from_slice(label: impl Into<String>, bytes: &[u8]) -> Result<Self, AssetError> {
        let label = label.into();
        let (doc, buffers, _images) = gltf::import_slice(bytes)?;

        let mut meshes = Vec::new();
        if let Some(scene) = doc.default_scene().or_else(|| doc.scenes().next()) {
            for node in scene.nodes() {
                collect_node(&node, &Mat4::IDENTITY, &buffers, &mut meshes);
            }
        }

        debug!(asset = %label, meshes = meshes.len(), "parsed asset");
        Ok(Self::from_meshes(label, meshes))
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn meshes(&self) -> &SharedMeshes {
        &self.inner.meshes
    }

    /// Bounds of all geometry in asset-local space; empty when nothing parsed.
    pub fn bounds(&self) -> Aabb3 {
        self.inner.bounds
    }

    pub fn same_asset(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

fn collect_node(
    node: &gltf::Node<'_>,
    parent: &Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<Mesh>,
) {
    let world = parent.mul(&Mat4::from(node.transform().matrix()));

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<Vec3> = positions
                .map(|p| world.transform_point(Vec3::from(p)))
                .collect();
            let indices: Vec<u32> = reader
                .read_indices()
                .map(|ix| ix.into_u32().collect())
                .unwrap_or_default();
            out.push(Mesh::new(positions, indices));
        }
    }

    for child in node.children() {
        collect_node(&child, &world, buffers, out);
    }
}
