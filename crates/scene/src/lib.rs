pub mod components;
pub mod lights;
pub mod pin;
pub mod prefabs;
pub mod world;

pub use pin::*;
pub use world::*;
