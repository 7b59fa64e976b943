//! wgpu pipelines: the point-expander compute pass and the sprite
//! render pass that consumes its output.

pub mod expander;
pub mod sprite;
