pub mod recording;
pub mod renderer;

pub use recording::*;
pub use renderer::*;
