pub mod matrix;
pub mod projection;
pub mod vec;

pub use matrix::*;
pub use projection::*;
pub use vec::*;
