pub mod frame;
pub mod location;

pub use frame::*;
pub use location::*;
