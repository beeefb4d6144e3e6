use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Bevel,
    #[default]
    Round,
    Miter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
    pub opacity: f64,
    #[serde(default)]
    pub cap: LineCap,
    #[serde(default)]
    pub join: LineJoin,
}

impl LineStyle {
    pub fn new(color: impl Into<String>, width: f64, opacity: f64) -> Self {
        Self {
            color: color.into(),
            width,
            opacity,
            cap: LineCap::Round,
            join: LineJoin::Round,
        }
    }
}

/// Two stacked strokes: a wide faint glow under a narrow bright core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteStyle {
    pub glow: LineStyle,
    pub core: LineStyle,
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self {
            glow: LineStyle::new("#00f6ff", 10.0, 0.25),
            core: LineStyle::new("#a9ffff", 3.0, 0.95),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtrusionStyle {
    pub color: String,
    pub opacity: f64,
    /// Feature property holding the extrusion top (meters).
    pub height_property: String,
    /// Feature property holding the extrusion base (meters).
    pub base_property: String,
}

impl Default for ExtrusionStyle {
    fn default() -> Self {
        Self {
            color: "#666".to_string(),
            opacity: 0.9,
            height_property: "height".to_string(),
            base_property: "min_height".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LineCap, LineJoin, RouteStyle};

    #[test]
    fn route_glow_is_wider_and_fainter_than_core() {
        let style = RouteStyle::default();
        assert!(style.glow.width > style.core.width);
        assert!(style.glow.opacity < style.core.opacity);
        assert_eq!(style.core.cap, LineCap::Round);
        assert_eq!(style.glow.join, LineJoin::Round);
    }
}
