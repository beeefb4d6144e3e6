use foundation::math::{Mat4, Vec3};

/// Translation, rotation about X, then uniform scale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation_x_rad: f64,
    pub scale: f64,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation_x_rad: 0.0,
            scale: 1.0,
        }
    }

    pub fn translate(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    pub fn with_rotation_x(mut self, angle_rad: f64) -> Self {
        self.rotation_x_rad = angle_rad;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::translation(self.position)
            .mul(&Mat4::rotation_x(self.rotation_x_rad))
            .mul(&Mat4::scale(Vec3::splat(self.scale)))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::Transform;
    use foundation::math::Vec3;

    #[test]
    fn identity_is_origin() {
        let transform = Transform::identity();
        assert_eq!(transform.position, Vec3::ZERO);
        assert_eq!(transform.matrix().transform_point(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn scale_applies_before_translation() {
        let t = Transform::translate(Vec3::new(10.0, 0.0, 0.0)).with_scale(2.0);
        assert_eq!(t.matrix().transform_point(Vec3::new(1.0, 1.0, 1.0)), Vec3::new(12.0, 2.0, 2.0));
    }
}
