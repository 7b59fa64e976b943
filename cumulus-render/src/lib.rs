//! # cumulus-render
//!
//! GPU point-sprite rendering backend for Cumulus, built on `wgpu`.
//!
//! ## Architecture
//!
//! ```text
//!  PointCloud (cumulus-cloud)
//!       │
//!       ▼
//!  bridge::collect_sprites()         ◀─── converts Point → SpriteVertex
//!       │
//!       ▼
//!  Renderer.upload_points()          ◀─── uploads source buffer, sizes sink = 3N
//!       │
//!       ▼
//!  Renderer.prepare(frame)           ◀─── per-frame camera uniforms
//!       │
//!       ▼
//!  Renderer.render_to_surface()      ◀─── compute expansion, then one draw call
//! ```
//!
//! The heart of the crate is the point-expander compute pass: every source
//! point becomes three triangle vertices forming a screen-facing
//! equilateral sprite of fixed pixel size. The render pass then consumes
//! the expanded buffer directly as a triangle list.
//!
//! ## Crate modules
//!
//! - [`context`] — GPU device/queue/surface initialisation
//! - [`vertex`] — GPU vertex and uniform data types
//! - [`camera`] — perspective camera and cloud framing
//! - [`expand`] — CPU reference of the expansion, used by tests and benches
//! - [`pipelines`] — wgpu pipelines (point expander, sprite rasterizer)
//! - [`renderer`] — high-level frame orchestration
//! - [`bridge`] — point cloud → GPU vertex conversion

pub mod bridge;
pub mod camera;
pub mod context;
pub mod expand;
pub mod pipelines;
pub mod renderer;
pub mod vertex;

// Re-exports for convenience
pub use bridge::{collect_sprites, collect_sprites_direct};
pub use camera::Camera;
pub use context::GpuContext;
pub use renderer::{FrameStats, Renderer};
pub use vertex::{FrameUniforms, SpriteVertex};
