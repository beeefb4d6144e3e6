use foundation::math::Vec3;

use crate::components::{Drawable3D, Material, Mesh};

pub const FALLBACK_CONE_RADIUS: f64 = 0.4;
/// Native height the projector scales from when the fallback cone stands in for a pin.
pub const FALLBACK_CONE_HEIGHT: f64 = 1.2;
pub const FALLBACK_CONE_SEGMENTS: u32 = 12;

pub fn fallback_cone() -> Drawable3D {
    fallback_cone_with_height(FALLBACK_CONE_HEIGHT)
}

pub fn fallback_cone_with_height(height: f64) -> Drawable3D {
    Drawable3D::cone(
        FALLBACK_CONE_RADIUS,
        height,
        FALLBACK_CONE_SEGMENTS,
        Material::fallback_pin(),
    )
}

/// Triangulates a Y-axis cone centered on its bounding box: apex at `+h/2`,
/// base ring and base center at `-h/2`.
pub fn cone_mesh(radius: f64, height: f64, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let half = height * 0.5;

    let mut positions = Vec::with_capacity(segments as usize + 2);
    positions.push(Vec3::new(0.0, half, 0.0));
    positions.push(Vec3::new(0.0, -half, 0.0));
    for i in 0..segments {
        let theta = (i as f64 / segments as f64) * std::f64::consts::TAU;
        positions.push(Vec3::new(radius * theta.sin(), -half, radius * theta.cos()));
    }

    let mut indices = Vec::with_capacity(segments as usize * 6);
    for i in 0..segments {
        let a = 2 + i;
        let b = 2 + (i + 1) % segments;
        // Side.
        indices.extend_from_slice(&[0, a, b]);
        // Base.
        indices.extend_from_slice(&[1, b, a]);
    }

    Mesh::new(positions, indices)
}

#[cfg(test)]
mod tests {
    use super::{FALLBACK_CONE_HEIGHT, cone_mesh, fallback_cone};
    use crate::components::Shape3D;

    #[test]
    fn fallback_cone_uses_fixed_native_height() {
        let cone = fallback_cone();
        let Shape3D::Cone { height, segments, .. } = cone.shape else {
            panic!("expected cone shape");
        };
        assert_eq!(height, FALLBACK_CONE_HEIGHT);
        assert_eq!(segments, 12);
    }

    #[test]
    fn cone_mesh_matches_local_bounds() {
        let mesh = cone_mesh(0.4, 1.2, 12);
        assert_eq!(mesh.positions.len(), 14);
        assert_eq!(mesh.triangle_count(), 24);
        let size = mesh.bounds().size();
        assert!((size.y - 1.2).abs() < 1e-12);
        assert!((mesh.bounds().center().y).abs() < 1e-12);
    }
}
