pub mod asset;
pub mod geojson;

pub use asset::*;
pub use geojson::*;
