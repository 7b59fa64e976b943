//! CPU reference implementation of the point-expander compute shader.
//!
//! Mirrors `shaders/point_expander.wgsl` operation for operation so the
//! shader's contract can be verified without a GPU: same projection,
//! same perspective divide, same corner offsets, same emission order.
//! The GPU readback test in `pipelines::expander` compares the real
//! dispatch against this function within float tolerance.

use glam::{Mat4, Vec4};

use crate::vertex::{FrameUniforms, SpriteVertex};

/// 2D corners of an equilateral triangle with circumradius 1, centered
/// on the origin. `sin(60°) = 0.86602540378`.
pub const CORNERS: [[f32; 2]; 3] = [
    [0.0, -1.0],
    [-0.86602540378, 0.5],
    [0.86602540378, 0.5],
];

/// Expand one source point into its three sprite corners.
///
/// The position is treated as a homogeneous point (`w = 1`), projected,
/// and perspective-divided; the corners are laid out around the result
/// in the NDC xy-plane at the projected depth.
pub fn expand_point(frame: &FrameUniforms, point: &SpriteVertex) -> [SpriteVertex; 3] {
    let projection = Mat4::from_cols_array_2d(&frame.projection);
    let clip = projection * Vec4::new(point.position[0], point.position[1], point.position[2], 1.0);
    let center = [clip.x / clip.w, clip.y / clip.w, clip.z / clip.w];

    CORNERS.map(|corner| {
        SpriteVertex::new(
            [
                center[0] + corner[0] * frame.pixel_size,
                center[1] + corner[1] * frame.pixel_size,
                center[2],
            ],
            point.color,
        )
    })
}

/// Expand a whole source array, preserving index order: source `i`
/// produces sink `3i, 3i+1, 3i+2`.
pub fn expand_points(frame: &FrameUniforms, points: &[SpriteVertex]) -> Vec<SpriteVertex> {
    let mut sink = Vec::with_capacity(points.len() * 3);
    for point in points {
        sink.extend_from_slice(&expand_point(frame, point));
    }
    sink
}

// ===================================================================
// Tests
// ===================================================================
