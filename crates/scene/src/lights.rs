use foundation::math::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Light {
    Ambient { color: u32, intensity: f32 },
    Directional { color: u32, intensity: f32, position: Vec3 },
}

impl Light {
    pub fn ambient(color: u32, intensity: f32) -> Self {
        Light::Ambient { color, intensity }
    }

    pub fn directional(color: u32, intensity: f32, position: Vec3) -> Self {
        Light::Directional {
            color,
            intensity,
            position,
        }
    }
}
