//! Point-expander compute pipeline.
//!
//! Consumes N source vertices and writes 3N triangle vertices: each
//! point is projected, perspective-divided, and surrounded by an
//! equilateral triangle of fixed pixel size. Invocations are fully
//! independent — invocation `i` owns sink slots `3i..3i+3` and touches
//! nothing else — so the dispatch needs no barriers or atomics.
//!
//! Bindings:
//! - group 0, binding 0: `FrameUniforms` (uniform)
//! - group 1, binding 0: source vertices (storage, read-only)
//! - group 1, binding 1: sink vertices (storage, read-write; also
//!   bound as the sprite pipeline's vertex buffer)

use wgpu::util::DeviceExt;
use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout,
    BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType, Buffer, BufferBindingType,
    BufferDescriptor, BufferUsages, ComputePass, ComputePipeline, ComputePipelineDescriptor,
    Device, PipelineCompilationOptions, PipelineLayoutDescriptor, Queue,
    ShaderModuleDescriptor, ShaderStages,
};

use crate::vertex::{FrameUniforms, SpriteVertex};

/// Invocations per workgroup; must match `@workgroup_size` in
/// `point_expander.wgsl`.
pub const WORKGROUP_SIZE: u32 = 64;

/// Workgroups needed to cover `point_count` invocations.
///
/// The last workgroup of a non-multiple dispatch has invocations past
/// the end of the source array; the shader bounds-checks those away.
pub fn workgroup_count(point_count: u32) -> u32 {
    point_count.div_ceil(WORKGROUP_SIZE)
}

/// Owns the compute pipeline and the source/sink buffer pair.
pub struct ExpanderPipeline {
    pipeline: ComputePipeline,

    // Per-frame uniforms (group 0)
    uniform_buffer: Buffer,
    uniform_bind_group: BindGroup,

    // Source + sink (group 1); recreated whenever points are uploaded
    vertices_bgl: BindGroupLayout,
    vertices_bind_group: BindGroup,
    source_buffer: Buffer,
    sink_buffer: Buffer,
    point_count: u32,
}

impl ExpanderPipeline {
    pub fn new(device: &Device) -> Self {
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("point_expander_shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../shaders/point_expander.wgsl").into(),
            ),
        });

        // ── Uniform bind group layout (group 0) ─────────────────
        let uniform_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("expander_uniform_bgl"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::COMPUTE,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        // ── Vertex buffers bind group layout (group 1) ──────────
        // Same record type behind both entries; only the access mode
        // differs: the source is immutable, the sink write-partitioned.
        let vertices_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("expander_vertices_bgl"),
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::COMPUTE,
                    ty: BindingType::Buffer {
                        ty: BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::COMPUTE,
                    ty: BindingType::Buffer {
                        ty: BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        // ── Pipeline ────────────────────────────────────────────
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("expander_pipeline_layout"),
            bind_group_layouts: &[&uniform_bgl, &vertices_bgl],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&ComputePipelineDescriptor {
            label: Some("expander_pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: PipelineCompilationOptions::default(),
            cache: None,
        });

        // ── Uniform buffer ──────────────────────────────────────
        let uniform_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("frame_uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("expander_uniform_bg"),
            layout: &uniform_bgl,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // ── Placeholder vertex buffers ──────────────────────────
        // wgpu forbids zero-sized bindings, so start with one dummy
        // record per buffer; point_count == 0 keeps them undispatched.
        let (source_buffer, sink_buffer) =
            create_vertex_buffers(device, &[SpriteVertex::new([0.0; 3], [0.0; 3])]);
        let vertices_bind_group =
            create_vertices_bind_group(device, &vertices_bgl, &source_buffer, &sink_buffer);

        Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            vertices_bgl,
            vertices_bind_group,
            source_buffer,
            sink_buffer,
            point_count: 0,
        }
    }

    // ───────────────────── Upload ─────────────────────────────────

    /// Replace the source points.
    ///
    /// Allocates a fresh source buffer plus a sink buffer of exactly
    /// three records per point, so `len(sink) == 3 * len(source)` holds
    /// by construction and can never be violated from outside.
    pub fn upload_points(&mut self, device: &Device, vertices: &[SpriteVertex]) {
        self.point_count = vertices.len() as u32;
        if vertices.is_empty() {
            return; // keep the placeholder buffers; nothing dispatches
        }

        let (source, sink) = create_vertex_buffers(device, vertices);
        self.vertices_bind_group =
            create_vertices_bind_group(device, &self.vertices_bgl, &source, &sink);
        self.source_buffer = source;
        self.sink_buffer = sink;
    }

    /// Upload this frame's uniforms.
    pub fn upload_uniforms(&self, queue: &Queue, frame: &FrameUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(frame));
    }

    // ───────────────────── Dispatch ───────────────────────────────

    /// Record the expansion dispatch: one invocation per source point,
    /// in workgroups of [`WORKGROUP_SIZE`]. No-op when empty.
    pub fn dispatch<'a>(&'a self, pass: &mut ComputePass<'a>) {
        if self.point_count == 0 {
            return;
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_bind_group(1, &self.vertices_bind_group, &[]);
        pass.dispatch_workgroups(workgroup_count(self.point_count), 1, 1);
    }

    // ───────────────────── Accessors ──────────────────────────────

    /// The expanded triangle-vertex buffer, for the sprite pipeline.
    pub fn sink_buffer(&self) -> &Buffer {
        &self.sink_buffer
    }

    pub fn point_count(&self) -> u32 {
        self.point_count
    }

    /// Vertices the sprite pipeline should draw: three per point.
    pub fn triangle_vertex_count(&self) -> u32 {
        self.point_count * 3
    }
}

fn create_vertex_buffers(device: &Device, vertices: &[SpriteVertex]) -> (Buffer, Buffer) {
    let source = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("expander_source"),
        contents: bytemuck::cast_slice(vertices),
        usage: BufferUsages::STORAGE,
    });

    // COPY_SRC admits debugging readback; the render path never copies.
    let sink = device.create_buffer(&BufferDescriptor {
        label: Some("expander_sink"),
        size: (vertices.len() * 3 * std::mem::size_of::<SpriteVertex>()) as u64,
        usage: BufferUsages::STORAGE | BufferUsages::VERTEX | BufferUsages::COPY_SRC,
        mapped_at_creation: false,
    });

    (source, sink)
}

fn create_vertices_bind_group(
    device: &Device,
    layout: &BindGroupLayout,
    source: &Buffer,
    sink: &Buffer,
) -> BindGroup {
    device.create_bind_group(&BindGroupDescriptor {
        label: Some("expander_vertices_bg"),
        layout,
        entries: &[
            BindGroupEntry {
                binding: 0,
                resource: source.as_entire_binding(),
            },
            BindGroupEntry {
                binding: 1,
                resource: sink.as_entire_binding(),
            },
        ],
    })
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GpuContext;
    use crate::expand::expand_points;
    use wgpu::{CommandEncoderDescriptor, ComputePassDescriptor};

    #[test]
    fn test_workgroup_count() {
        assert_eq!(workgroup_count(0), 0);
        assert_eq!(workgroup_count(1), 1);
        assert_eq!(workgroup_count(64), 1);
        // 65 points: a second workgroup whose invocation 64 is the last
        // valid index and 65..127 must no-op.
        assert_eq!(workgroup_count(65), 2);
        assert_eq!(workgroup_count(128), 2);
        assert_eq!(workgroup_count(129), 3);
    }

    #[test]
    fn test_pipeline_creation() {
        if let Ok(gpu) = pollster::block_on(GpuContext::new_headless()) {
            let expander = ExpanderPipeline::new(&gpu.device);
            assert_eq!(expander.point_count(), 0);
            assert_eq!(expander.triangle_vertex_count(), 0);
        }
    }

    #[test]
    fn test_upload_sizes_sink_to_three_n() {
        if let Ok(gpu) = pollster::block_on(GpuContext::new_headless()) {
            let mut expander = ExpanderPipeline::new(&gpu.device);
            let vertices = vec![SpriteVertex::new([0.0; 3], [1.0; 3]); 10];
            expander.upload_points(&gpu.device, &vertices);

            assert_eq!(expander.point_count(), 10);
            assert_eq!(expander.triangle_vertex_count(), 30);
            assert_eq!(
                expander.sink_buffer().size(),
                (30 * std::mem::size_of::<SpriteVertex>()) as u64
            );
        }
    }

    /// Run the real dispatch and compare the sink buffer against the
    /// CPU reference, byte for byte. 65 points forces two workgroups,
    /// exercising the global index and the bounds check on hardware.
    #[test]
    fn test_gpu_expansion_matches_cpu_reference() {
        let Ok(gpu) = pollster::block_on(GpuContext::new_headless()) else {
            return; // no adapter in this environment
        };

        let points: Vec<SpriteVertex> = (0..65)
            .map(|i| {
                let t = i as f32 / 65.0;
                SpriteVertex::new([t, 1.0 - t, t * 0.5], [t, 0.5, 1.0 - t])
            })
            .collect();
        let frame = FrameUniforms::new(
            glam::Mat4::perspective_rh(1.0, 1.5, 0.1, 100.0).to_cols_array_2d(),
            0.02,
        );

        let mut expander = ExpanderPipeline::new(&gpu.device);
        expander.upload_points(&gpu.device, &points);
        expander.upload_uniforms(&gpu.queue, &frame);

        let sink_size = expander.sink_buffer().size();
        let readback = gpu.device.create_buffer(&BufferDescriptor {
            label: Some("expander_readback"),
            size: sink_size,
            usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = gpu
            .device
            .create_command_encoder(&CommandEncoderDescriptor { label: None });
        {
            let mut pass = encoder.begin_compute_pass(&ComputePassDescriptor {
                label: Some("test_expand_pass"),
                timestamp_writes: None,
            });
            expander.dispatch(&mut pass);
        }
        encoder.copy_buffer_to_buffer(expander.sink_buffer(), 0, &readback, 0, sink_size);
        gpu.queue.submit(std::iter::once(encoder.finish()));

        let slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).unwrap();
        });
        let _ = gpu.device.poll(wgpu::Maintain::Wait);
        rx.recv().unwrap().unwrap();

        let data = slice.get_mapped_range();
        let gpu_sink: &[SpriteVertex] = bytemuck::cast_slice(&data);
        let cpu_sink = expand_points(&frame, &points);

        assert_eq!(gpu_sink.len(), cpu_sink.len());
        for (i, (gpu_v, cpu_v)) in gpu_sink.iter().zip(&cpu_sink).enumerate() {
            for axis in 0..3 {
                assert!(
                    (gpu_v.position[axis] - cpu_v.position[axis]).abs() < 1e-5,
                    "sink[{i}] position differs: {gpu_v:?} vs {cpu_v:?}"
                );
            }
            assert_eq!(gpu_v.color, cpu_v.color, "sink[{i}] color differs");
        }
    }
}
