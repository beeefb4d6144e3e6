use std::path::{Path, PathBuf};

use foundation::math::LngLat;
use layers::buildings::BuildingsConfig;
use layers::markers::MarkerConfig;
use layers::pins::PinsLayerConfig;
use layers::symbology::RouteStyle;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid view config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid view config: {0}")]
    Invalid(String),
}

/// Camera the map is created with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOptions {
    pub center: LngLat,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    pub antialias: bool,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            center: LngLat::new(127.3845, 36.3504),
            zoom: 15.2,
            pitch: 60.0,
            bearing: -20.0,
            antialias: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub style_url: String,
    pub camera: CameraOptions,
    pub pins: PinsLayerConfig,
    pub route: RouteStyle,
    pub markers: MarkerConfig,
    pub buildings: BuildingsConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            style_url: "mapbox://styles/mapbox/dark-v11".to_string(),
            camera: CameraOptions::default(),
            pins: PinsLayerConfig::default(),
            route: RouteStyle::default(),
            markers: MarkerConfig::default(),
            buildings: BuildingsConfig::default(),
        }
    }
}

impl ViewConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.camera.center.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "camera center {:?} is not a valid coordinate",
                self.camera.center.as_array()
            )));
        }
        if !(self.pins.pin_height_m > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "pin height must be positive, got {}",
                self.pins.pin_height_m
            )));
        }
        if !(self.pins.fallback_native_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "fallback native height must be positive, got {}",
                self.pins.fallback_native_height
            )));
        }
        if self.pins.asset_url.is_empty() {
            return Err(ConfigError::Invalid("asset url is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ViewConfig};
    use foundation::math::LngLat;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ViewConfig::from_json_str(
            r#"{"camera": {"zoom": 14.0}, "pins": {"pin_height_m": 50.0}, "buildings": {"enabled": false}}"#,
        )
        .expect("config");
        assert_eq!(config.camera.zoom, 14.0);
        assert_eq!(config.camera.center, LngLat::new(127.3845, 36.3504));
        assert_eq!(config.camera.pitch, 60.0);
        assert_eq!(config.pins.pin_height_m, 50.0);
        assert_eq!(config.pins.render_order, 10);
        assert!(!config.buildings.enabled);
        assert_eq!(config.route.glow.color, "#00f6ff");
    }

    #[test]
    fn empty_object_is_the_default() {
        assert_eq!(ViewConfig::from_json_str("{}").expect("config"), ViewConfig::default());
    }

    #[test]
    fn rejects_bad_values() {
        let err = ViewConfig::from_json_str(r#"{"pins": {"pin_height_m": 0.0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = ViewConfig::from_json_str(r#"{"camera": {"center": {"lng": 0.0, "lat": 91.0}}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = ViewConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ViewConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
