mod component;
mod render;

pub use component::Graph3dCanvas;
