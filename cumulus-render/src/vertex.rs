//! GPU vertex and uniform data types for the Cumulus renderer.
//!
//! All types derive `bytemuck::Pod` + `Zeroable` for zero-copy upload
//! to GPU buffers, and their byte layout is pinned by tests because the
//! same bytes cross three boundaries: the storage binding read by the
//! expander, the storage binding it writes, and the vertex input of the
//! sprite pipeline.

use bytemuck::{Pod, Zeroable};
use wgpu::{BufferAddress, VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

// ───────────────────────────────────────────────────────────────────
// Sprite vertex
// ───────────────────────────────────────────────────────────────────

/// One vertex record, shared by every stage of the pipeline.
///
/// The expander reads an array of these (one per source point) and
/// writes an array three times as long (one triangle per point). A
/// single type serves both bindings; the read-only vs. read-write
/// distinction lives in the bind group layout, not in the data.
///
/// Stride is exactly 32 bytes: each `vec3` is padded to 16-byte
/// alignment to match the WGSL storage layout.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    /// Position: world space in the source buffer, NDC in the sink.
    pub position: [f32; 3],
    pub _pad0: f32,
    /// Linear RGB, each channel in [0.0, 1.0].
    pub color: [f32; 3],
    pub _pad1: f32,
}

impl SpriteVertex {
    pub fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            position,
            _pad0: 0.0,
            color,
            _pad1: 0.0,
        }
    }

    /// Vertex-buffer view of the sink buffer, for the sprite pipeline.
    ///
    /// Attribute offsets must track the struct layout above: the sink
    /// storage buffer is bound directly as vertex input, byte for byte.
    pub fn layout() -> VertexBufferLayout<'static> {
        static ATTRS: &[VertexAttribute] = &[
            // location(0) = position
            VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: VertexFormat::Float32x3,
            },
            // location(1) = color
            VertexAttribute {
                offset: 16,
                shader_location: 1,
                format: VertexFormat::Float32x3,
            },
        ];
        VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: ATTRS,
        }
    }
}

// ───────────────────────────────────────────────────────────────────
// Frame uniforms
// ───────────────────────────────────────────────────────────────────

/// Per-frame uniform block read by the expander.
///
/// 80 bytes (std140). Built fresh from the camera every frame and
/// passed to `Renderer::prepare` — never held as ambient global state,
/// so multiple frames in flight each carry their own value.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    /// Combined view-projection matrix (column-major).
    pub projection: [[f32; 4]; 4],
    /// Sprite circumradius in NDC units.
    pub pixel_size: f32,
    pub _pad: [f32; 3],
}

impl FrameUniforms {
    pub fn new(projection: [[f32; 4]; 4], pixel_size: f32) -> Self {
        // A non-positive size is not an error downstream (the expander
        // happily emits degenerate triangles) but it is always a caller
        // bug, so catch it in debug builds.
        debug_assert!(pixel_size > 0.0, "pixel_size must be positive");
        Self {
            projection,
            pixel_size,
            _pad: [0.0; 3],
        }
    }

    /// Identity projection. Points pass through untransformed; mainly
    /// useful for tests and demos that author positions in NDC.
    pub fn identity(pixel_size: f32) -> Self {
        let mut projection = [[0.0; 4]; 4];
        for i in 0..4 {
            projection[i][i] = 1.0;
        }
        Self::new(projection, pixel_size)
    }
}

// ===================================================================
// Tests
// ===================================================================
