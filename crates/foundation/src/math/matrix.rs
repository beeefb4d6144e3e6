use super::Vec3;

/// 4x4 matrix stored column-major, the layout host maps hand to custom layers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4(pub [f64; 16]);

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub fn from_cols_array(m: [f64; 16]) -> Self {
        Self(m)
    }

    /// Builds a matrix from a host-provided slice; `None` unless exactly 16 values.
    pub fn from_slice(m: &[f64]) -> Option<Self> {
        let arr: [f64; 16] = m.try_into().ok()?;
        Some(Self(arr))
    }

    pub fn translation(t: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.0[12] = t.x;
        m.0[13] = t.y;
        m.0[14] = t.z;
        m
    }

    pub fn scale(s: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.0[0] = s.x;
        m.0[5] = s.y;
        m.0[10] = s.z;
        m
    }

    pub fn rotation_x(angle_rad: f64) -> Self {
        let (s, c) = angle_rad.sin_cos();
        let mut m = Self::IDENTITY;
        m.0[5] = c;
        m.0[6] = s;
        m.0[9] = -s;
        m.0[10] = c;
        m
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[col * 4 + row]
    }

    /// Column-major multiply: `self * rhs`.
    pub fn mul(&self, rhs: &Self) -> Self {
        let mut out = [0.0f64; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = (0..4).map(|k| self.get(row, k) * rhs.get(k, col)).sum();
            }
        }
        Self(out)
    }

    /// Transforms a point (w = 1) without perspective division.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            self.get(0, 0) * p.x + self.get(0, 1) * p.y + self.get(0, 2) * p.z + self.get(0, 3),
            self.get(1, 0) * p.x + self.get(1, 1) * p.y + self.get(1, 2) * p.z + self.get(1, 3),
            self.get(2, 0) * p.x + self.get(2, 1) * p.y + self.get(2, 2) * p.z + self.get(2, 3),
        )
    }

    pub fn to_f32(&self) -> [f32; 16] {
        self.0.map(|v| v as f32)
    }
}

impl From<[[f32; 4]; 4]> for Mat4 {
    fn from(cols: [[f32; 4]; 4]) -> Self {
        let mut out = [0.0f64; 16];
        for (c, col) in cols.iter().enumerate() {
            for (r, v) in col.iter().enumerate() {
                out[c * 4 + r] = *v as f64;
            }
        }
        Self(out)
    }
}
