pub mod buildings;
pub mod host;
pub mod labels;
pub mod layer;
pub mod markers;
pub mod pins;
pub mod route;
pub mod symbology;

pub use layer::*;
