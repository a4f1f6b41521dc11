//! WebGPU backend for the draw-device abstraction
//!
//! Draws are recorded CPU-side during dispatch: vertices are appended to one
//! frame buffer and every draw gets its own 256-aligned uniform block bound
//! with a dynamic offset. Fan/loop/point primitives are lowered to the
//! topologies the GPU supports.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use wgpu::util::DeviceExt;

use super::draw::{DrawDevice, LightRig, Primitive};
use super::shapes::{self, Geometry};
use super::vertex::Vertex;
use crate::sim::state::{GeometryId, TextureId};

/// Resource-acquisition failures during backend setup. These abort the
/// affected demo's initialization; they never reach scene state.
#[derive(Debug)]
pub enum GfxError {
    /// No compatible adapter was offered by the instance
    AdapterUnavailable,
    DeviceRequest(String),
}

impl std::fmt::Display for GfxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GfxError::AdapterUnavailable => write!(f, "no compatible GPU adapter"),
            GfxError::DeviceRequest(err) => write!(f, "device request failed: {}", err),
        }
    }
}

impl std::error::Error for GfxError {}

/// Per-draw uniform block (std140-friendly, 256-aligned in the buffer)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct DrawUniforms {
    mvp: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    normal_mat: [[f32; 4]; 4],
    base_color: [f32; 4],
    ambient: [f32; 4],
    /// xyz = directional light direction, w = lit flag
    light_dir: [f32; 4],
    light_color: [f32; 4],
    point_pos: [[f32; 4]; 2],
    point_color: [[f32; 4]; 2],
    /// x = use base_color instead of vertex colors
    flags: [f32; 4],
}

/// One recorded draw: a vertex range, a uniform offset and a texture
struct RenderOp {
    topology: wgpu::PrimitiveTopology,
    vertex_start: u32,
    vertex_count: u32,
    uniform_offset: u32,
    texture: Option<TextureId>,
}

/// wgpu implementation of [`DrawDevice`]
pub struct WgpuDevice {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipelines: Vec<(wgpu::PrimitiveTopology, wgpu::RenderPipeline)>,
    uniform_layout: wgpu::BindGroupLayout,
    texture_binds: HashMap<TextureId, wgpu::BindGroup>,
    white_bind: wgpu::BindGroup,
    geometries: HashMap<GeometryId, Geometry>,
    uniform_stride: u32,

    // Frame accumulation
    frame_verts: Vec<Vertex>,
    uniform_bytes: Vec<u8>,
    ops: Vec<RenderOp>,

    // Current bind state (reset per entity by the dispatcher)
    cur_geometry: Option<GeometryId>,
    cur_texture: Option<TextureId>,
    cur_view_proj: Mat4,
    cur_model: Mat4,
    cur_color: Option<[f32; 4]>,
    cur_lights: Option<LightRig>,
    point_size: f32,

    pub size: (u32, u32),
    clear_color: wgpu::Color,
}

impl WgpuDevice {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, GfxError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tug-of-rps-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| GfxError::DeviceRequest(e.to_string()))?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let uniform_size = std::mem::size_of::<DrawUniforms>() as u32;
        let uniform_stride = uniform_size.div_ceil(256) * 256;

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(uniform_size as u64),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            immediate_size: 0,
        });

        let topologies = [
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::PrimitiveTopology::TriangleStrip,
            wgpu::PrimitiveTopology::LineList,
            wgpu::PrimitiveTopology::LineStrip,
        ];
        let pipelines = topologies
            .into_iter()
            .map(|topology| {
                let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("render_pipeline"),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: Some("vs_main"),
                        buffers: &[Vertex::desc()],
                        compilation_options: Default::default(),
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &shader,
                        entry_point: Some("fs_main"),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: config.format,
                            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                        compilation_options: Default::default(),
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology,
                        strip_index_format: None,
                        front_face: wgpu::FrontFace::Ccw,
                        cull_mode: None,
                        polygon_mode: wgpu::PolygonMode::Fill,
                        unclipped_depth: false,
                        conservative: false,
                    },
                    depth_stencil: None,
                    multisample: wgpu::MultisampleState::default(),
                    multiview_mask: None,
                    cache: None,
                });
                (topology, pipeline)
            })
            .collect();

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let mut texture_binds = HashMap::new();
        for id in [
            TextureId::Grass,
            TextureId::Burlap,
            TextureId::BlueCloth,
            TextureId::RedCloth,
        ] {
            let (size, pixels) = texture_pixels(id);
            let bind = make_texture_bind(&device, &queue, &texture_layout, &sampler, size, &pixels);
            texture_binds.insert(id, bind);
        }
        let white_bind =
            make_texture_bind(&device, &queue, &texture_layout, &sampler, 1, &[255; 4]);

        let geometries = [
            GeometryId::Floor,
            GeometryId::Mud,
            GeometryId::Rope,
            GeometryId::Person,
            GeometryId::Cube,
            GeometryId::Pyramid,
        ]
        .into_iter()
        .map(|id| (id, shapes::build(id)))
        .collect();

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipelines,
            uniform_layout,
            texture_binds,
            white_bind,
            geometries,
            uniform_stride,
            frame_verts: Vec::new(),
            uniform_bytes: Vec::new(),
            ops: Vec::new(),
            cur_geometry: None,
            cur_texture: None,
            cur_view_proj: Mat4::IDENTITY,
            cur_model: Mat4::IDENTITY,
            cur_color: None,
            cur_lights: None,
            point_size: 0.05,
            size: (width, height),
            clear_color: wgpu::Color::BLACK,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn aspect(&self) -> f32 {
        self.size.0 as f32 / self.size.1.max(1) as f32
    }

    /// Background color for the active demo
    pub fn set_clear_color(&mut self, rgba: [f64; 4]) {
        self.clear_color = wgpu::Color {
            r: rgba[0],
            g: rgba[1],
            b: rgba[2],
            a: rgba[3],
        };
    }

    /// Drop anything recorded since the last frame
    pub fn begin_frame(&mut self) {
        self.frame_verts.clear();
        self.uniform_bytes.clear();
        self.ops.clear();
    }

    /// Snapshot the current bind state into a uniform block
    fn current_uniforms(&self) -> DrawUniforms {
        let lit = self.cur_lights.is_some();
        let rig = self.cur_lights.unwrap_or(LightRig {
            direction: glam::Vec3::ONE,
            directional_color: [0.0; 3],
            ambient: [0.0; 3],
            points: [
                super::draw::PointLight {
                    position: glam::Vec3::ZERO,
                    color: [0.0; 3],
                },
                super::draw::PointLight {
                    position: glam::Vec3::ZERO,
                    color: [0.0; 3],
                },
            ],
        });
        let d = rig.direction;
        DrawUniforms {
            mvp: (self.cur_view_proj * self.cur_model).to_cols_array_2d(),
            model: self.cur_model.to_cols_array_2d(),
            normal_mat: self.cur_model.inverse().transpose().to_cols_array_2d(),
            base_color: self.cur_color.unwrap_or([1.0; 4]),
            ambient: [rig.ambient[0], rig.ambient[1], rig.ambient[2], 0.0],
            light_dir: [d.x, d.y, d.z, if lit { 1.0 } else { 0.0 }],
            light_color: [
                rig.directional_color[0],
                rig.directional_color[1],
                rig.directional_color[2],
                0.0,
            ],
            point_pos: [
                rig.points[0].position.extend(0.0).to_array(),
                rig.points[1].position.extend(0.0).to_array(),
            ],
            point_color: [
                [rig.points[0].color[0], rig.points[0].color[1], rig.points[0].color[2], 0.0],
                [rig.points[1].color[0], rig.points[1].color[1], rig.points[1].color[2], 0.0],
            ],
            flags: [if self.cur_color.is_some() { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }

    /// Lower a demo primitive to a supported topology, expanding as needed
    fn lower(&self, vertices: &[Vertex], primitive: Primitive) -> (wgpu::PrimitiveTopology, Vec<Vertex>) {
        match primitive {
            Primitive::Triangles => (wgpu::PrimitiveTopology::TriangleList, vertices.to_vec()),
            Primitive::TriangleStrip => (wgpu::PrimitiveTopology::TriangleStrip, vertices.to_vec()),
            Primitive::TriangleFan => {
                let mut out = Vec::new();
                if let Some((first, rest)) = vertices.split_first() {
                    for pair in rest.windows(2) {
                        out.push(*first);
                        out.push(pair[0]);
                        out.push(pair[1]);
                    }
                }
                (wgpu::PrimitiveTopology::TriangleList, out)
            }
            Primitive::Lines => (wgpu::PrimitiveTopology::LineList, vertices.to_vec()),
            Primitive::LineStrip => (wgpu::PrimitiveTopology::LineStrip, vertices.to_vec()),
            Primitive::LineLoop => {
                let mut out = vertices.to_vec();
                if let Some(first) = vertices.first() {
                    out.push(*first);
                }
                (wgpu::PrimitiveTopology::LineStrip, out)
            }
            Primitive::Points => {
                let mut out = Vec::with_capacity(vertices.len() * 6);
                for v in vertices {
                    out.extend(shapes::point_quad(
                        v.position[0],
                        v.position[1],
                        self.point_size,
                        v.color,
                    ));
                }
                (wgpu::PrimitiveTopology::TriangleList, out)
            }
        }
    }

    fn record(&mut self, vertices: &[Vertex], primitive: Primitive) {
        let (topology, lowered) = self.lower(vertices, primitive);
        if lowered.is_empty() {
            return;
        }

        let vertex_start = self.frame_verts.len() as u32;
        self.frame_verts.extend_from_slice(&lowered);

        let uniform_offset = self.uniform_bytes.len() as u32;
        let block = self.current_uniforms();
        self.uniform_bytes.extend_from_slice(bytemuck::bytes_of(&block));
        self.uniform_bytes.resize(
            (uniform_offset + self.uniform_stride) as usize,
            0,
        );

        self.ops.push(RenderOp {
            topology,
            vertex_start,
            vertex_count: lowered.len() as u32,
            uniform_offset,
            texture: self.cur_texture,
        });
    }

    /// Submit everything recorded since `begin_frame`
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Per-frame buffers; recreated each frame, simple and small enough
        let vertex_buffer = if self.frame_verts.is_empty() {
            None
        } else {
            Some(
                self.device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("frame_vertices"),
                        contents: bytemuck::cast_slice(&self.frame_verts),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
            )
        };
        let uniform_buffer = if self.uniform_bytes.is_empty() {
            None
        } else {
            Some(
                self.device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("frame_uniforms"),
                        contents: &self.uniform_bytes,
                        usage: wgpu::BufferUsages::UNIFORM,
                    }),
            )
        };
        let uniform_bind = uniform_buffer.as_ref().map(|buffer| {
            self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("frame_uniform_bind"),
                layout: &self.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer,
                        offset: 0,
                        size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
                    }),
                }],
            })
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let (Some(vertex_buffer), Some(uniform_bind)) = (&vertex_buffer, &uniform_bind) {
                pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                for op in &self.ops {
                    let pipeline = self
                        .pipelines
                        .iter()
                        .find(|(topology, _)| *topology == op.topology)
                        .map(|(_, pipeline)| pipeline);
                    let Some(pipeline) = pipeline else { continue };

                    pass.set_pipeline(pipeline);
                    pass.set_bind_group(0, uniform_bind, &[op.uniform_offset]);
                    let texture_bind = op
                        .texture
                        .and_then(|id| self.texture_binds.get(&id))
                        .unwrap_or(&self.white_bind);
                    pass.set_bind_group(1, texture_bind, &[]);
                    pass.draw(op.vertex_start..op.vertex_start + op.vertex_count, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl DrawDevice for WgpuDevice {
    fn bind_geometry(&mut self, geometry: GeometryId) {
        self.cur_geometry = Some(geometry);
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.cur_texture = texture;
    }

    fn set_view_proj(&mut self, view_proj: Mat4) {
        self.cur_view_proj = view_proj;
    }

    fn set_transform(&mut self, model: Mat4) {
        self.cur_model = model;
    }

    fn set_color(&mut self, color: Option<[f32; 4]>) {
        self.cur_color = color;
    }

    fn set_lights(&mut self, rig: Option<&LightRig>) {
        self.cur_lights = rig.copied();
    }

    fn set_point_size(&mut self, size: f32) {
        self.point_size = size;
    }

    fn draw_bound(&mut self) {
        let Some(id) = self.cur_geometry else {
            log::warn!("draw without bound geometry");
            return;
        };
        let geometry = match self.geometries.get(&id) {
            Some(g) => g.clone(),
            None => return,
        };
        self.record(&geometry.vertices, geometry.primitive);
    }

    fn draw_slice(&mut self, vertices: &[Vertex], primitive: Primitive) {
        self.record(vertices, primitive);
    }
}

/// Upload a square RGBA texture and produce its bind group
fn make_texture_bind(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    size: u32,
    pixels: &[u8],
) -> wgpu::BindGroup {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("demo_texture"),
        size: wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * size),
            rows_per_image: Some(size),
        },
        wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("texture_bind"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

/// Procedural texture pixels: base color plus seeded per-pixel noise
fn texture_pixels(id: TextureId) -> (u32, Vec<u8>) {
    let (base, jitter, seed): ([u8; 3], i16, u64) = match id {
        TextureId::Grass => ([44, 122, 40], 36, 1),
        TextureId::Burlap => ([164, 126, 82], 24, 2),
        TextureId::BlueCloth => ([40, 70, 200], 30, 3),
        TextureId::RedCloth => ([200, 60, 40], 30, 4),
    };
    let size = 32u32;
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for _ in 0..size * size {
        for channel in base {
            let offset: i16 = rng.random_range(-jitter..=jitter);
            pixels.push((i16::from(channel) + offset).clamp(0, 255) as u8);
        }
        pixels.push(255);
    }
    (size, pixels)
}
