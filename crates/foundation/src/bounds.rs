use crate::math::{Mat4, Vec3};

/// Axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb3 {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Aabb3 { min, max }
    }

    /// Inverted box; the identity for `extend`.
    pub fn empty() -> Self {
        Aabb3 {
            min: Vec3::splat(f64::INFINITY),
            max: Vec3::splat(f64::NEG_INFINITY),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut b = Self::empty();
        for p in points {
            b.extend(p);
        }
        b
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn extend(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Self) -> Self {
        Aabb3::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Extent per axis; zero for an empty box.
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        (self.min + self.max).scale(0.5)
    }

    /// Bounds of the eight transformed corners.
    pub fn transformed(&self, m: &Mat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        let mut out = Self::empty();
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            out.extend(m.transform_point(corner));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb3;
    use crate::math::{Mat4, Vec3};

    #[test]
    fn empty_box_has_zero_size() {
        let b = Aabb3::from_points(std::iter::empty());
        assert!(b.is_empty());
        assert_eq!(b.size(), Vec3::ZERO);
    }

    #[test]
    fn size_and_center_from_points() {
        let b = Aabb3::from_points([Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 4.0, 2.0)]);
        assert_eq!(b.size(), Vec3::new(4.0, 4.0, 0.0));
        assert_eq!(b.center(), Vec3::new(1.0, 2.0, 2.0));
    }

    #[test]
    fn transformed_translates_bounds() {
        let b = Aabb3::new(Vec3::ZERO, Vec3::splat(1.0));
        let t = b.transformed(&Mat4::translation(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(t.min, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.max, Vec3::new(2.0, 3.0, 4.0));
    }
}
