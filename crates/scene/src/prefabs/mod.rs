pub mod cone;

pub use cone::*;
