use std::sync::Arc;

use foundation::bounds::Aabb3;
use foundation::math::Vec3;

/// Triangle mesh in asset-local space (node transforms already applied).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    pub fn bounds(&self) -> Aabb3 {
        Aabb3::from_points(self.positions.iter().copied())
    }

    pub fn triangle_count(&self) -> usize {
        if self.indices.is_empty() {
            self.positions.len() / 3
        } else {
            self.indices.len() / 3
        }
    }
}

/// Meshes shared between every clone of one loaded asset.
pub type SharedMeshes = Arc<Vec<Mesh>>;

pub fn meshes_bounds(meshes: &[Mesh]) -> Aabb3 {
    meshes
        .iter()
        .map(Mesh::bounds)
        .filter(|b| !b.is_empty())
        .fold(Aabb3::empty(), |acc, b| acc.union(&b))
}
