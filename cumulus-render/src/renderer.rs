//! High-level renderer: runs the expansion compute pass and the sprite
//! render pass back to back in one command submission.
//!
//! Submission order is the synchronization contract: the compute pass
//! finishes before the render pass reads the sink buffer, so the two
//! stages never need barriers of their own.

use log::debug;
use thiserror::Error;
use wgpu::{
    Color, CommandEncoderDescriptor, ComputePassDescriptor, LoadOp, Operations,
    RenderPassColorAttachment, RenderPassDescriptor, StoreOp, TextureViewDescriptor,
};

use crate::context::GpuContext;
use crate::pipelines::expander::ExpanderPipeline;
use crate::pipelines::sprite::SpritePipeline;
use crate::vertex::{FrameUniforms, SpriteVertex};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("No surface configured (headless mode)")]
    NoSurface,
}

/// Frame statistics returned after each render.
#[derive(Clone, Copy, Debug)]
pub struct FrameStats {
    /// Source points expanded this frame.
    pub point_count: u32,
    /// Vertices rasterized (always 3 × point_count).
    pub triangle_vertices: u32,
    /// Draw calls issued.
    pub draw_calls: u32,
}

/// Main renderer for Cumulus point clouds.
///
/// # Usage
///
/// ```ignore
/// let mut renderer = Renderer::new(&gpu);
/// renderer.upload_points(&gpu, &collect_sprites(&cloud));
/// renderer.prepare(&gpu, &camera.frame_uniforms(3.0, height));
/// let stats = renderer.render_to_surface(&gpu)?;
/// ```
pub struct Renderer {
    expander: ExpanderPipeline,
    sprite: SpritePipeline,
    clear_color: Color,
}

impl Renderer {
    pub fn new(gpu: &GpuContext) -> Self {
        Self {
            expander: ExpanderPipeline::new(&gpu.device),
            sprite: SpritePipeline::new(&gpu.device, gpu.surface_format),
            clear_color: Color {
                r: 0.02,
                g: 0.02,
                b: 0.03,
                a: 1.0,
            },
        }
    }

    /// Set the background clear color.
    pub fn set_clear_color(&mut self, r: f64, g: f64, b: f64, a: f64) {
        self.clear_color = Color { r, g, b, a };
    }

    /// Replace the rendered point set. Call on import, not per frame;
    /// the buffers are reused until the next upload.
    pub fn upload_points(&mut self, gpu: &GpuContext, vertices: &[SpriteVertex]) {
        debug!("Uploading {} points", vertices.len());
        self.expander.upload_points(&gpu.device, vertices);
    }

    /// Upload this frame's camera uniforms. Call once per frame before
    /// rendering; the value is owned by the caller, never cached here.
    pub fn prepare(&self, gpu: &GpuContext, frame: &FrameUniforms) {
        self.expander.upload_uniforms(&gpu.queue, frame);
    }

    /// Render to the window surface. Returns frame statistics.
    pub fn render_to_surface(&self, gpu: &GpuContext) -> Result<FrameStats, RenderError> {
        let surface = gpu.surface.as_ref().ok_or(RenderError::NoSurface)?;
        let output = surface.get_current_texture()?;
        let view = output.texture.create_view(&TextureViewDescriptor::default());

        let mut encoder = gpu.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("cumulus_frame_encoder"),
        });
        self.encode_frame(&mut encoder, &view);
        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(self.stats())
    }

    /// Render to an off-screen texture view (headless mode).
    pub fn render_to_texture(&self, gpu: &GpuContext, target: &wgpu::TextureView) -> FrameStats {
        let mut encoder = gpu.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("cumulus_offscreen_encoder"),
        });
        self.encode_frame(&mut encoder, target);
        gpu.queue.submit(std::iter::once(encoder.finish()));

        self.stats()
    }

    /// Record both passes. The compute pass is closed before the render
    /// pass opens, which orders the sink-buffer write before its read.
    fn encode_frame(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        {
            let mut pass = encoder.begin_compute_pass(&ComputePassDescriptor {
                label: Some("cumulus_expand_pass"),
                timestamp_writes: None,
            });
            self.expander.dispatch(&mut pass);
        }

        {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("cumulus_sprite_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.sprite.draw(
                &mut pass,
                self.expander.sink_buffer(),
                self.expander.triangle_vertex_count(),
            );
        }
    }

    fn stats(&self) -> FrameStats {
        let point_count = self.expander.point_count();
        FrameStats {
            point_count,
            triangle_vertices: point_count * 3,
            draw_calls: if point_count > 0 { 1 } else { 0 },
        }
    }

    /// Access the expander pipeline (for advanced usage).
    pub fn expander(&self) -> &ExpanderPipeline {
        &self.expander
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::collect_sprites_direct;

    fn offscreen_target(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("test_target"),
            size: wgpu::Extent3d {
                width: 64,
                height: 64,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: gpu.surface_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&TextureViewDescriptor::default())
    }

    #[test]
    fn test_render_to_surface_headless_fails() {
        if let Ok(gpu) = pollster::block_on(GpuContext::new_headless()) {
            let renderer = Renderer::new(&gpu);
            assert!(matches!(
                renderer.render_to_surface(&gpu),
                Err(RenderError::NoSurface)
            ));
        }
    }

    #[test]
    fn test_empty_frame_renders_zero_stats() {
        if let Ok(gpu) = pollster::block_on(GpuContext::new_headless()) {
            let renderer = Renderer::new(&gpu);
            renderer.prepare(&gpu, &FrameUniforms::identity(0.01));
            let stats = renderer.render_to_texture(&gpu, &offscreen_target(&gpu));
            assert_eq!(stats.point_count, 0);
            assert_eq!(stats.triangle_vertices, 0);
            assert_eq!(stats.draw_calls, 0);
        }
    }

    #[test]
    fn test_frame_with_points() {
        if let Ok(gpu) = pollster::block_on(GpuContext::new_headless()) {
            let mut renderer = Renderer::new(&gpu);
            let sprites = collect_sprites_direct(&[
                ([0.0, 0.0, 0.5], [1.0, 0.0, 0.0]),
                ([0.25, 0.25, 0.5], [0.0, 1.0, 0.0]),
                ([-0.25, -0.25, 0.5], [0.0, 0.0, 1.0]),
            ]);
            renderer.upload_points(&gpu, &sprites);
            renderer.prepare(&gpu, &FrameUniforms::identity(0.05));

            let stats = renderer.render_to_texture(&gpu, &offscreen_target(&gpu));
            assert_eq!(stats.point_count, 3);
            assert_eq!(stats.triangle_vertices, 9);
            assert_eq!(stats.draw_calls, 1);
        }
    }
}
