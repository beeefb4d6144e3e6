pub mod config;
pub mod view;

pub use config::{CameraOptions, ConfigError, ViewConfig};
pub use view::{PinClickHandler, RouteMapView};
