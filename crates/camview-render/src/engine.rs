//! Headless render engine.

use camview_core::{CameraParameters, PointSet, Scene};
use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::error::{RenderError, RenderResult};
use crate::point_render::{PointRenderData, PointUniforms};
use crate::target::{OffscreenTarget, DEPTH_FORMAT, TARGET_FORMAT};

const NEAR_PLANE: f32 = 0.01;
const FAR_PLANE: f32 = 1000.0;

/// Per-frame scene uniforms, shared by every draw in a pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct SceneUniforms {
    /// View matrix (world to eye).
    pub view: [[f32; 4]; 4],
    /// Projection matrix (eye to clip).
    pub proj: [[f32; 4]; 4],
    /// Camera position in world space (w unused).
    pub camera_pos: [f32; 4],
    /// Tone mapping exposure multiplier.
    pub exposure: f32,
    /// Tone mapping gamma.
    pub gamma: f32,
    pub _padding: [f32; 2],
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            view: glam::Mat4::IDENTITY.to_cols_array_2d(),
            proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            camera_pos: [0.0; 4],
            exposure: 1.0,
            gamma: 1.0,
            _padding: [0.0; 2],
        }
    }
}

/// Tone mapping settings mirrored from the host renderer.
///
/// The sRGB target format already applies the transfer encoding, so gamma
/// here is a host-matching adjustment on top of it and defaults to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct ToneSettings {
    /// Exposure multiplier applied before gamma.
    pub exposure: f32,
    /// Extra output gamma adjustment.
    pub gamma: f32,
}

impl Default for ToneSettings {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            gamma: 1.0,
        }
    }
}

/// The headless render engine: device, queue, and the point pipeline.
pub struct RenderEngine {
    /// The wgpu device.
    pub device: wgpu::Device,
    /// The wgpu queue.
    pub queue: wgpu::Queue,
    /// Background clear color.
    pub background_color: Vec3,
    tone: ToneSettings,
    point_pipeline: wgpu::RenderPipeline,
    point_bind_group_layout: wgpu::BindGroupLayout,
    scene_uniform_buffer: wgpu::Buffer,
    point_data: Vec<PointRenderData>,
}

impl RenderEngine {
    /// Creates a new headless render engine.
    ///
    /// No surface is created; all rendering goes to [`OffscreenTarget`]s.
    /// Tone settings are captured once at creation so exports match the host
    /// renderer's encoding.
    pub async fn new_headless(tone: ToneSettings) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::AdapterCreationFailed)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("camview device (headless)"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let scene_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("scene uniforms"),
            contents: bytemuck::cast_slice(&[SceneUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let (point_pipeline, point_bind_group_layout) = Self::create_point_pipeline(&device);

        Ok(Self {
            device,
            queue,
            background_color: Vec3::new(0.1, 0.1, 0.12),
            tone,
            point_pipeline,
            point_bind_group_layout,
            scene_uniform_buffer,
            point_data: Vec::new(),
        })
    }

    fn create_point_pipeline(device: &wgpu::Device) -> (wgpu::RenderPipeline, wgpu::BindGroupLayout) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("point billboard shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/points.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("point bind group layout"),
            entries: &[
                // Scene uniforms
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Point uniforms
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Position storage buffer
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("point pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("point billboard pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TARGET_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // Don't cull billboards
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group_layout)
    }

    /// Rebuilds GPU buffers for the scene's point sets.
    ///
    /// Called before rendering whenever scene content may have changed.
    pub fn sync_scene(&mut self, scene: &Scene) {
        self.point_data.clear();
        for (_, point_set) in scene.point_sets() {
            self.point_data.push(self.upload_point_set(point_set));
        }
        log::trace!("synced {} point set(s) to GPU", self.point_data.len());
    }

    fn upload_point_set(&self, point_set: &PointSet) -> PointRenderData {
        let positions: Vec<[f32; 4]> = point_set
            .points
            .iter()
            .map(|p| [p.x, p.y, p.z, 1.0])
            .collect();

        let position_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("point positions"),
                contents: bytemuck::cast_slice(&positions),
                usage: wgpu::BufferUsages::STORAGE,
            });

        let uniforms = PointUniforms {
            base_color: [point_set.color.x, point_set.color.y, point_set.color.z, 1.0],
            point_radius: point_set.radius,
            _padding: [0.0; 3],
        };
        let uniform_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("point uniforms"),
                contents: bytemuck::cast_slice(&[uniforms]),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("point bind group"),
            layout: &self.point_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.scene_uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: position_buffer.as_entire_binding(),
                },
            ],
        });

        PointRenderData {
            position_buffer,
            uniform_buffer,
            bind_group,
            num_points: u32::try_from(point_set.points.len()).unwrap_or(u32::MAX),
        }
    }

    /// Renders the synced scene into the target through the given camera.
    pub fn render_to_target(&self, target: &OffscreenTarget, camera: &CameraParameters) {
        let aspect = target.width as f32 / target.height as f32;
        let mut params = *camera;
        params.intrinsics.aspect_ratio = aspect;

        let pos = params.position();
        let uniforms = SceneUniforms {
            view: params.view_matrix().to_cols_array_2d(),
            proj: params.projection_matrix(NEAR_PLANE, FAR_PLANE).to_cols_array_2d(),
            camera_pos: [pos.x, pos.y, pos.z, 1.0],
            exposure: self.tone.exposure,
            gamma: self.tone.gamma,
            _padding: [0.0; 2],
        };
        self.queue
            .write_buffer(&self.scene_uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("offscreen render encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("offscreen render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(self.background_color.x),
                            g: f64::from(self.background_color.y),
                            b: f64::from(self.background_color.z),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: target.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            render_pass.set_pipeline(&self.point_pipeline);
            for data in &self.point_data {
                render_pass.set_bind_group(0, &data.bind_group, &[]);
                // 6 vertices per point billboard
                render_pass.draw(0..data.num_points * 6, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Renders the synced scene and reads the pixels back.
    pub fn render_and_read(
        &self,
        target: &OffscreenTarget,
        camera: &CameraParameters,
    ) -> RenderResult<Vec<u8>> {
        self.render_to_target(target, camera);
        target.read_pixels(&self.device, &self.queue)
    }

    /// The tone settings the engine was created with.
    #[must_use]
    pub fn tone(&self) -> ToneSettings {
        self.tone
    }
}
