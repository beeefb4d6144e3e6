pub mod drawable3d;
pub mod material;
pub mod mesh;
pub mod transform;

pub use drawable3d::*;
pub use material::*;
pub use mesh::*;
pub use transform::*;
