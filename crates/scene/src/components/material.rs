/// Standard PBR-ish material with explicit depth state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    /// Base color as `0xRRGGBB`.
    pub color: u32,
    pub emissive: u32,
    pub emissive_intensity: f32,
    pub metalness: f32,
    pub roughness: f32,
    pub depth_test: bool,
    pub depth_write: bool,
}

impl Material {
    pub const fn standard(color: u32) -> Self {
        Self {
            color,
            emissive: 0x000000,
            emissive_intensity: 1.0,
            metalness: 0.0,
            roughness: 1.0,
            depth_test: true,
            depth_write: true,
        }
    }

    /// Uniform glowing style forced onto every loaded pin model.
    pub const fn pin_highlight() -> Self {
        Self {
            color: 0xffffff,
            emissive: 0x2cfffe,
            emissive_intensity: 0.9,
            metalness: 0.2,
            roughness: 0.3,
            depth_test: true,
            depth_write: true,
        }
    }

    /// Style of the procedural cone used when the pin model is unusable.
    pub const fn fallback_pin() -> Self {
        Self {
            color: 0xff4d4f,
            emissive: 0x550000,
            emissive_intensity: 1.0,
            metalness: 0.2,
            roughness: 0.4,
            depth_test: true,
            depth_write: true,
        }
    }

    pub fn without_depth(mut self) -> Self {
        self.depth_test = false;
        self.depth_write = false;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::standard(0xffffff)
    }
}

/// Splits `0xRRGGBB` into linear-ish `[r, g, b]` in `0..=1`.
pub fn rgb_f32(color: u32) -> [f32; 3] {
    [
        ((color >> 16) & 0xff) as f32 / 255.0,
        ((color >> 8) & 0xff) as f32 / 255.0,
        (color & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::{Material, rgb_f32};

    #[test]
    fn without_depth_clears_both_flags() {
        let m = Material::pin_highlight().without_depth();
        assert!(!m.depth_test);
        assert!(!m.depth_write);
        assert_eq!(m.emissive, 0x2cfffe);
    }

    #[test]
    fn rgb_split() {
        assert_eq!(rgb_f32(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(rgb_f32(0x00ff00), [0.0, 1.0, 0.0]);
    }
}
