use foundation::bounds::Aabb3;
use foundation::math::Vec3;

use super::mesh::{SharedMeshes, meshes_bounds};
use super::material::Material;

#[derive(Debug, Clone, PartialEq)]
pub enum Shape3D {
    /// Loaded meshes drawn with a local offset (used to recenter the pivot).
    Mesh { meshes: SharedMeshes, offset: Vec3 },
    /// Y-axis cone centered on its own bounding box.
    Cone { radius: f64, height: f64, segments: u32 },
}

impl Shape3D {
    /// Bounds in the shape's own space, offset included.
    pub fn local_bounds(&self) -> Aabb3 {
        match self {
            Shape3D::Mesh { meshes, offset } => {
                let b = meshes_bounds(meshes);
                if b.is_empty() {
                    return b;
                }
                Aabb3::new(b.min + *offset, b.max + *offset)
            }
            Shape3D::Cone {
                radius, height, ..
            } => Aabb3::new(
                Vec3::new(-radius, -height * 0.5, -radius),
                Vec3::new(*radius, height * 0.5, *radius),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drawable3D {
    pub shape: Shape3D,
    pub material: Material,
    pub render_order: i32,
    pub frustum_culled: bool,
}

impl Drawable3D {
    pub fn new(shape: Shape3D, material: Material) -> Self {
        Self {
            shape,
            material,
            render_order: 0,
            frustum_culled: true,
        }
    }

    pub fn cone(radius: f64, height: f64, segments: u32, material: Material) -> Self {
        Self::new(
            Shape3D::Cone {
                radius,
                height,
                segments,
            },
            material,
        )
    }

    /// Draws on top of everything: no depth test/write, late order, never culled.
    pub fn force_foreground(mut self, render_order: i32) -> Self {
        self.material = self.material.without_depth();
        self.render_order = render_order;
        self.frustum_culled = false;
        self
    }
}
