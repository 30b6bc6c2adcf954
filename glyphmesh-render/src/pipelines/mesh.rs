//! Mesh-text render pipeline — depth-tested triangle-list rendering of
//! glyph ranges from the shared vertex buffer.
//!
//! Each glyph draw carries its own model transform + color, stored in one
//! uniform buffer and selected per draw via a dynamic offset.

use bytemuck::{Pod, Zeroable};
use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout,
    BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingResource, BindingType,
    BlendState, Buffer, BufferAddress, BufferBinding, BufferBindingType,
    BufferDescriptor, BufferSize, BufferUsages, ColorTargetState, ColorWrites,
    CompareFunction, DepthBiasState, DepthStencilState, Device, FragmentState,
    FrontFace, MultisampleState, PipelineCompilationOptions,
    PipelineLayoutDescriptor, PolygonMode, PrimitiveState, PrimitiveTopology,
    Queue, RenderPass, RenderPipeline, RenderPipelineDescriptor,
    ShaderModuleDescriptor, ShaderStages, StencilState, TextureFormat,
    VertexAttribute, VertexBufferLayout, VertexFormat, VertexState,
    VertexStepMode,
};

use crate::gpu::CameraUniform;

/// Maximum glyph draws per frame (4096 × 256 B = 1 MB of uniform memory).
pub const MAX_DRAWS: usize = 4096;

/// Dynamic-offset stride: the WebGPU guaranteed uniform alignment.
pub const MODEL_STRIDE: u64 = 256;

/// Depth buffer format used by the mesh pipeline.
pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Per-draw uniform: model transform + flat color. 80 bytes, padded to
/// [`MODEL_STRIDE`] in the buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ModelUniform {
    /// Column-major model matrix.
    pub model: [[f32; 4]; 4],
    /// RGBA color, each channel in [0.0, 1.0].
    pub color: [f32; 4],
}

/// Vertex layout of the shared glyph buffer: 24-byte stride, position at
/// offset 0, area-weighted normal at offset 12.
pub fn mesh_vertex_layout() -> VertexBufferLayout<'static> {
    static ATTRS: &[VertexAttribute] = &[
        // location(0) = position
        VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: VertexFormat::Float32x3,
        },
        // location(1) = normal
        VertexAttribute {
            offset: 12,
            shader_location: 1,
            format: VertexFormat::Float32x3,
        },
    ];
    VertexBufferLayout {
        array_stride: (glyphmesh_core::VERTEX_STRIDE_FLOATS * std::mem::size_of::<f32>())
            as BufferAddress,
        step_mode: VertexStepMode::Vertex,
        attributes: ATTRS,
    }
}

/// Owns the wgpu pipeline, uniform buffers, and bind groups for mesh-text
/// rendering.
pub struct MeshPipeline {
    pipeline: RenderPipeline,
    camera_buffer: Buffer,
    camera_bind_group: BindGroup,
    model_buffer: Buffer,
    model_bind_group: BindGroup,
}

impl MeshPipeline {
    /// Create the pipeline and allocate uniform buffers.
    pub fn new(device: &Device, surface_format: TextureFormat) -> Self {
        // ── Shader ──────────────────────────────────────────────
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("mesh_text_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/mesh.wgsl").into()),
        });

        // ── Camera bind group layout ────────────────────────────
        let camera_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("mesh_camera_bgl"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        // ── Model bind group layout (dynamic offset per draw) ───
        let model_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("mesh_model_bgl"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX_FRAGMENT,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: BufferSize::new(
                        std::mem::size_of::<ModelUniform>() as u64
                    ),
                },
                count: None,
            }],
        });

        // ── Pipeline layout ─────────────────────────────────────
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[&camera_bgl, &model_bgl],
            push_constant_ranges: &[],
        });

        // ── Render pipeline ─────────────────────────────────────
        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: PipelineCompilationOptions::default(),
                buffers: &[mesh_vertex_layout()],
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: PipelineCompilationOptions::default(),
                targets: &[Some(ColorTargetState {
                    format: surface_format,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None, // glyph meshes have no guaranteed winding
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: CompareFunction::Less,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // ── Camera uniform buffer ───────────────────────────────
        let camera_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("mesh_camera_ub"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("mesh_camera_bg"),
            layout: &camera_bgl,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // ── Model uniform buffer (one slot per draw) ────────────
        let model_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("mesh_model_ub"),
            size: MAX_DRAWS as u64 * MODEL_STRIDE,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let model_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("mesh_model_bg"),
            layout: &model_bgl,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: BindingResource::Buffer(BufferBinding {
                    buffer: &model_buffer,
                    offset: 0,
                    size: BufferSize::new(std::mem::size_of::<ModelUniform>() as u64),
                }),
            }],
        });

        Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            model_buffer,
            model_bind_group,
        }
    }

    // ───────────────────── Upload ─────────────────────────────────

    /// Upload the camera uniform for this frame.
    pub fn upload_camera(&self, queue: &Queue, camera: &CameraUniform) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(camera));
    }

    /// Upload per-draw model uniforms, padded to [`MODEL_STRIDE`].
    ///
    /// Returns the number of draws that fit (truncated at [`MAX_DRAWS`]).
    pub fn upload_models(&self, queue: &Queue, models: &[ModelUniform]) -> u32 {
        let count = models.len().min(MAX_DRAWS);
        if count == 0 {
            return 0;
        }

        let mut bytes = vec![0u8; count * MODEL_STRIDE as usize];
        for (i, model) in models[..count].iter().enumerate() {
            let offset = i * MODEL_STRIDE as usize;
            let raw = bytemuck::bytes_of(model);
            bytes[offset..offset + raw.len()].copy_from_slice(raw);
        }
        queue.write_buffer(&self.model_buffer, 0, &bytes);

        if models.len() > MAX_DRAWS {
            log::warn!(
                "mesh pipeline: {} draws truncated to {MAX_DRAWS}",
                models.len(),
            );
        }
        count as u32
    }

    // ───────────────────── Draw ───────────────────────────────────

    /// Bind the pipeline and camera. Call once per pass.
    pub fn bind<'a>(&'a self, pass: &mut RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
    }

    /// Draw one glyph range using the model uniform at `draw_index`.
    pub fn draw_range<'a>(
        &'a self,
        pass: &mut RenderPass<'a>,
        draw_index: u32,
        start: u32,
        vertex_count: u32,
    ) {
        pass.set_bind_group(
            1,
            &self.model_bind_group,
            &[draw_index * MODEL_STRIDE as u32],
        );
        pass.draw(start..start + vertex_count, 0..1);
    }
}
