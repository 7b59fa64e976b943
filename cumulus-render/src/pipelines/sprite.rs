//! Sprite render pipeline — rasterizes the expanded triangle list.
//!
//! The sink buffer is bound directly as the vertex buffer: every three
//! consecutive vertices form one sprite, in the exact order the
//! expander emitted them. Positions are already in NDC, so the shader
//! passes them through and interpolates color.

use wgpu::{
    BlendState, Buffer, ColorTargetState, ColorWrites, Device, FragmentState, FrontFace,
    MultisampleState, PipelineCompilationOptions, PipelineLayoutDescriptor, PolygonMode,
    PrimitiveState, PrimitiveTopology, RenderPass, RenderPipeline, RenderPipelineDescriptor,
    ShaderModuleDescriptor, TextureFormat, VertexState,
};

use crate::vertex::SpriteVertex;

pub struct SpritePipeline {
    pipeline: RenderPipeline,
}

impl SpritePipeline {
    pub fn new(device: &Device, target_format: TextureFormat) -> Self {
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("point_sprite_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/point_sprite.wgsl").into()),
        });

        // No bind groups: everything the shader needs rides in the
        // vertex stream.
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("sprite_pipeline_layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("sprite_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: PipelineCompilationOptions::default(),
                buffers: &[SpriteVertex::layout()],
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: PipelineCompilationOptions::default(),
                targets: &[Some(ColorTargetState {
                    format: target_format,
                    blend: Some(BlendState::REPLACE),
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None, // sprites are screen-facing either way
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self { pipeline }
    }

    /// Record the sprite draw: `vertex_count` must be the expander's
    /// triangle vertex count (3 per point). No-op when zero.
    pub fn draw<'a>(&'a self, pass: &mut RenderPass<'a>, sink: &'a Buffer, vertex_count: u32) {
        if vertex_count == 0 {
            return;
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, sink.slice(..));
        pass.draw(0..vertex_count, 0..1);
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GpuContext;

    #[test]
    fn test_pipeline_creation() {
        if let Ok(gpu) = pollster::block_on(GpuContext::new_headless()) {
            let _ = SpritePipeline::new(&gpu.device, gpu.surface_format);
        }
    }
}
