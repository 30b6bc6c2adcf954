//! wgpu backend — implements both seams over a [`GpuContext`].
//!
//! `Text::draw` runs against this backend like against any other: it
//! pushes transforms and emits glyph draws. The backend records them as
//! pending `(buffer, range, model, color)` tuples; `render_to_surface`
//! (or `render_to_texture`) then uploads the uniforms and replays the
//! draws into one depth-tested render pass.
//!
//! The window surface, when one exists, is owned here too:
//! [`WgpuMeshBackend::for_window`] creates and configures it, and
//! [`WgpuMeshBackend::resize`] keeps it in step with the host window.

use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix4, Orthographic3, Perspective3, Point3, Vector3};
use wgpu::util::{BufferInitDescriptor, DeviceExt};
use wgpu::{
    Buffer, BufferUsages, Color, CommandEncoderDescriptor, Extent3d, Instance,
    InstanceDescriptor, LoadOp, Operations, RenderPass,
    RenderPassColorAttachment, RenderPassDepthStencilAttachment,
    RenderPassDescriptor, StoreOp, Surface, SurfaceConfiguration, Texture,
    TextureDescriptor, TextureDimension, TextureFormat, TextureUsages,
    TextureView, TextureViewDescriptor,
};

use glyphmesh_core::{BufferHandle, MeshBackend, TransformStack};

use crate::context::{GpuContext, GpuError};
use crate::pipelines::mesh::{MeshPipeline, ModelUniform, DEPTH_FORMAT};
use crate::transform::MatrixStack;

/// Camera/view-projection uniform, uploaded once per frame.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    /// Column-major view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Right-handed perspective camera looking from `eye` at `target`,
    /// Y up, 45° vertical field of view.
    pub fn perspective(eye: [f32; 3], target: [f32; 3], aspect: f32) -> Self {
        let view = Matrix4::look_at_rh(
            &Point3::from(eye),
            &Point3::from(target),
            &Vector3::y(),
        );
        let proj = Perspective3::new(aspect, std::f32::consts::FRAC_PI_4, 0.1, 1000.0)
            .to_homogeneous();
        Self {
            view_proj: (proj * view).into(),
        }
    }

    /// Orthographic camera centered on the origin.
    pub fn orthographic(half_width: f32, half_height: f32) -> Self {
        let proj = Orthographic3::new(
            -half_width,
            half_width,
            -half_height,
            half_height,
            -1000.0,
            1000.0,
        )
        .to_homogeneous();
        Self {
            view_proj: proj.into(),
        }
    }
}

/// Frame statistics returned after each render.
#[derive(Clone, Copy, Debug)]
pub struct FrameStats {
    /// Number of glyph draw calls issued.
    pub draw_calls: u32,
    /// Total vertices drawn.
    pub vertices: u32,
}

/// One recorded glyph draw awaiting the next frame flush.
struct PendingDraw {
    buffer: u32,
    start: u32,
    vertex_count: u32,
    model: ModelUniform,
}

/// Cached depth texture, recreated whenever the frame size changes.
struct DepthTarget {
    size: (u32, u32),
    texture: Texture,
}

/// GPU-backed implementation of [`MeshBackend`] + [`TransformStack`].
pub struct WgpuMeshBackend {
    gpu: GpuContext,
    pipeline: MeshPipeline,
    stack: MatrixStack,
    latched: [[f32; 4]; 4],
    color: [f32; 4],
    buffers: Vec<Buffer>,
    bound: Option<BufferHandle>,
    draws: Vec<PendingDraw>,
    surface: Option<Surface<'static>>,
    surface_config: Option<SurfaceConfiguration>,
    surface_format: TextureFormat,
    depth: Option<DepthTarget>,
    clear_color: Color,
}

impl WgpuMeshBackend {
    /// Headless backend over an existing context. Renders to textures
    /// whose format matches [`Self::surface_format`].
    pub fn new(gpu: GpuContext) -> Self {
        // Bgra8UnormSrgb is the most universally supported format.
        Self::with_format(gpu, TextureFormat::Bgra8UnormSrgb)
    }

    /// Create a surface on `window`, request a compatible device, and
    /// build the backend around them.
    ///
    /// The window handles must remain valid for the life of the backend.
    pub async fn for_window<W>(window: W, width: u32, height: u32) -> Result<Self, GpuError>
    where
        W: wgpu::WasmNotSendSync + Into<wgpu::SurfaceTarget<'static>>,
    {
        let instance = Instance::new(&InstanceDescriptor::default());
        let surface = instance
            .create_surface(window)
            .map_err(|e| GpuError::Surface(e.to_string()))?;
        let gpu = GpuContext::from_instance(instance, Some(&surface)).await?;

        let caps = surface.get_capabilities(&gpu.adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(caps.formats[0]);

        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo, // VSync
            desired_maximum_frame_latency: 2,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&gpu.device, &config);

        let mut backend = Self::with_format(gpu, format);
        backend.surface = Some(surface);
        backend.surface_config = Some(config);
        Ok(backend)
    }

    fn with_format(gpu: GpuContext, format: TextureFormat) -> Self {
        let pipeline = MeshPipeline::new(&gpu.device, format);
        Self {
            gpu,
            pipeline,
            stack: MatrixStack::new(),
            latched: Matrix4::identity().into(),
            color: [1.0, 1.0, 1.0, 1.0],
            buffers: Vec::new(),
            bound: None,
            draws: Vec::new(),
            surface: None,
            surface_config: None,
            surface_format: format,
            depth: None,
            clear_color: Color {
                r: 0.05,
                g: 0.05,
                b: 0.07,
                a: 1.0,
            },
        }
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    pub fn gpu_mut(&mut self) -> &mut GpuContext {
        &mut self.gpu
    }

    /// Color target format the pipeline renders to.
    pub fn surface_format(&self) -> TextureFormat {
        self.surface_format
    }

    /// Reconfigure the surface after a window resize. No-op when headless
    /// or when either dimension is zero.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let (Some(surface), Some(config)) = (&self.surface, &mut self.surface_config) {
            config.width = width;
            config.height = height;
            surface.configure(&self.gpu.device, config);
        }
    }

    /// Current surface dimensions, or `(0, 0)` when headless.
    pub fn surface_size(&self) -> (u32, u32) {
        self.surface_config
            .as_ref()
            .map(|c| (c.width, c.height))
            .unwrap_or((0, 0))
    }

    /// Set the background clear color.
    pub fn set_clear_color(&mut self, r: f64, g: f64, b: f64, a: f64) {
        self.clear_color = Color { r, g, b, a };
    }

    /// Number of glyph draws recorded since the last flush.
    pub fn pending_draws(&self) -> usize {
        self.draws.len()
    }

    /// Drop recorded draws without rendering them.
    pub fn discard_frame(&mut self) {
        self.draws.clear();
    }

    /// Render the recorded draws to the window surface and present.
    pub fn render_to_surface(&mut self, camera: &CameraUniform) -> Result<FrameStats, GpuError> {
        let (width, height) = self.surface_size();
        let output = self
            .surface
            .as_ref()
            .ok_or(GpuError::NoSurface)?
            .get_current_texture()?;
        let view = output
            .texture
            .create_view(&TextureViewDescriptor::default());

        let depth_view = self.depth_view(width.max(1), height.max(1));
        let count = self.upload_frame(camera);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("glyphmesh_frame_encoder"),
            });

        {
            let mut pass = Self::begin_pass(&mut encoder, &view, &depth_view, self.clear_color);
            self.record(&mut pass, count);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(self.finish_frame(count))
    }

    /// Render the recorded draws to an off-screen color target.
    ///
    /// The target view must match [`Self::surface_format`];
    /// `width`/`height` size the internally managed depth buffer and must
    /// match the target view.
    pub fn render_to_texture(
        &mut self,
        target_view: &TextureView,
        width: u32,
        height: u32,
        camera: &CameraUniform,
    ) -> Result<FrameStats, GpuError> {
        let depth_view = self.depth_view(width.max(1), height.max(1));
        let count = self.upload_frame(camera);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("glyphmesh_offscreen_encoder"),
            });

        {
            let mut pass =
                Self::begin_pass(&mut encoder, target_view, &depth_view, self.clear_color);
            self.record(&mut pass, count);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));

        Ok(self.finish_frame(count))
    }

    // ---------------------------------------------------------------
    // Internal helpers
    // ---------------------------------------------------------------

    /// Upload camera + model uniforms; returns the draw count that fit.
    fn upload_frame(&mut self, camera: &CameraUniform) -> usize {
        self.pipeline.upload_camera(&self.gpu.queue, camera);
        let models: Vec<ModelUniform> = self.draws.iter().map(|d| d.model).collect();
        self.pipeline.upload_models(&self.gpu.queue, &models) as usize
    }

    fn begin_pass<'a>(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a TextureView,
        depth_view: &'a TextureView,
        clear_color: Color,
    ) -> RenderPass<'a> {
        encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("glyphmesh_pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(clear_color),
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(Operations {
                    load: LoadOp::Clear(1.0),
                    store: StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }

    /// Replay the first `count` recorded draws into the pass.
    fn record<'a>(&'a self, pass: &mut RenderPass<'a>, count: usize) {
        if count == 0 {
            return;
        }
        self.pipeline.bind(pass);
        for (i, draw) in self.draws.iter().take(count).enumerate() {
            if let Some(buffer) = self.buffers.get(draw.buffer as usize) {
                pass.set_vertex_buffer(0, buffer.slice(..));
                self.pipeline
                    .draw_range(pass, i as u32, draw.start, draw.vertex_count);
            }
        }
    }

    fn finish_frame(&mut self, count: usize) -> FrameStats {
        let vertices = self
            .draws
            .iter()
            .take(count)
            .map(|d| d.vertex_count)
            .sum();
        self.draws.clear();
        FrameStats {
            draw_calls: count as u32,
            vertices,
        }
    }

    /// View of the cached depth texture, recreating it on size change.
    fn depth_view(&mut self, width: u32, height: u32) -> TextureView {
        match &self.depth {
            Some(d) if d.size == (width, height) => {
                d.texture.create_view(&TextureViewDescriptor::default())
            }
            _ => {
                let texture = self.gpu.device.create_texture(&TextureDescriptor {
                    label: Some("glyphmesh_depth"),
                    size: Extent3d {
                        width,
                        height,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: TextureDimension::D2,
                    format: DEPTH_FORMAT,
                    usage: TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                });
                let view = texture.create_view(&TextureViewDescriptor::default());
                self.depth = Some(DepthTarget {
                    size: (width, height),
                    texture,
                });
                view
            }
        }
    }
}

impl MeshBackend for WgpuMeshBackend {
    fn create_vertex_buffer(&mut self, data: &[f32]) -> BufferHandle {
        let buffer = self.gpu.device.create_buffer_init(&BufferInitDescriptor {
            label: Some("glyph_atlas_vb"),
            contents: bytemuck::cast_slice(data),
            usage: BufferUsages::VERTEX,
        });
        self.buffers.push(buffer);
        BufferHandle((self.buffers.len() - 1) as u32)
    }

    fn bind_buffer(&mut self, handle: BufferHandle) {
        self.bound = Some(handle);
    }

    fn draw_triangles(&mut self, start: u32, vertex_count: u32) {
        if vertex_count == 0 {
            return; // whitespace glyph
        }
        let Some(bound) = self.bound else {
            log::warn!("draw with no bound buffer ignored");
            return;
        };
        self.draws.push(PendingDraw {
            buffer: bound.0,
            start,
            vertex_count,
            model: ModelUniform {
                model: self.latched,
                color: self.color,
            },
        });
    }

    fn set_color(&mut self, rgba: [f32; 4]) {
        self.color = rgba;
    }
}

impl TransformStack for WgpuMeshBackend {
    fn push(&mut self) {
        self.stack.push();
    }

    fn pop(&mut self) {
        self.stack.pop();
    }

    fn translate(&mut self, v: [f32; 3]) {
        self.stack.translate(v);
    }

    fn rotate(&mut self, axis: [f32; 3], radians: f32) {
        self.stack.rotate(axis, radians);
    }

    fn scale(&mut self, v: [f32; 3]) {
        self.stack.scale(v);
    }

    fn apply(&mut self) {
        self.latched = self.stack.current_array();
    }
}

// ===================================================================
// Tests
// ===================================================================
