use std::collections::HashMap;

use wgpu::util::DeviceExt;

use loupe_engine::render::{uniform_binding_size, QuadVertex, QUAD_INDICES, QUAD_VERTICES};

use crate::error::{LensError, Result};
use crate::uniforms::{AntialiasUniforms, LensUniforms};

use super::GpuBuffer;

/// Long-lived GPU objects for the lens and antialias passes.
///
/// Pipelines are built lazily, one per output format: the lens pass writes
/// either an offscreen buffer or the surface depending on antialiasing.
#[derive(Default)]
pub struct LensPasses {
    lens: PassKind,
    antialias: PassKind,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,
}

#[derive(Default)]
struct PassKind {
    layout: Option<wgpu::BindGroupLayout>,
    pipeline_layout: Option<wgpu::PipelineLayout>,
    shader: Option<wgpu::ShaderModule>,
    pipelines: HashMap<wgpu::TextureFormat, wgpu::RenderPipeline>,
    ubo: Option<wgpu::Buffer>,
}

/// Where a full-target pass writes.
pub(super) struct PassOutput<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub view: &'a wgpu::TextureView,
    pub format: wgpu::TextureFormat,
    pub load: wgpu::LoadOp<wgpu::Color>,
}

impl LensPasses {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn draw_lens(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        out: PassOutput<'_>,
        original: &GpuBuffer,
        zoomed: &GpuBuffer,
        uniforms: &LensUniforms,
    ) -> Result<()> {
        self.ensure_static_buffers(device);
        self.lens.ensure(device, out.format, &LENS_DESC)?;

        let (layout, ubo) = self.lens.bindings(LENS_DESC.name)?;
        queue.write_buffer(ubo, 0, bytemuck::bytes_of(uniforms));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("loupe lens bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(original.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(original.sampler()),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(zoomed.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(zoomed.sampler()),
                },
            ],
        });

        self.draw_quad(&self.lens, &LENS_DESC, out, &bind_group)
    }

    pub(super) fn draw_antialias(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        out: PassOutput<'_>,
        source: &GpuBuffer,
        uniforms: &AntialiasUniforms,
    ) -> Result<()> {
        self.ensure_static_buffers(device);
        self.antialias.ensure(device, out.format, &ANTIALIAS_DESC)?;

        let (layout, ubo) = self.antialias.bindings(ANTIALIAS_DESC.name)?;
        queue.write_buffer(ubo, 0, bytemuck::bytes_of(uniforms));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("loupe antialias bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(source.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(source.sampler()),
                },
            ],
        });

        self.draw_quad(&self.antialias, &ANTIALIAS_DESC, out, &bind_group)
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn draw_quad(
        &self,
        kind: &PassKind,
        desc: &PassDesc,
        out: PassOutput<'_>,
        bind_group: &wgpu::BindGroup,
    ) -> Result<()> {
        let pipeline = kind
            .pipelines
            .get(&out.format)
            .ok_or_else(|| missing(desc.name, "pipeline"))?;
        let quad_vbo = self.quad_vbo.as_ref().ok_or_else(|| missing(desc.name, "quad vbo"))?;
        let quad_ibo = self.quad_ibo.as_ref().ok_or_else(|| missing(desc.name, "quad ibo"))?;

        let mut rpass = out.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(desc.pass_label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: out.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: out.load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
        Ok(())
    }

    fn ensure_static_buffers(&mut self, device: &wgpu::Device) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("loupe quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("loupe quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}

// ── pass descriptions ─────────────────────────────────────────────────────

struct PassDesc {
    name: &'static str,
    pass_label: &'static str,
    shader_label: &'static str,
    source: &'static str,
    /// Number of (texture, sampler) pairs after the uniform at binding 0.
    textures: u32,
    uniform_size: fn() -> std::num::NonZeroU64,
}

const LENS_DESC: PassDesc = PassDesc {
    name: "lens",
    pass_label: "loupe lens pass",
    shader_label: "loupe lens shader",
    source: include_str!("shaders/lens.wgsl"),
    textures: 2,
    uniform_size: uniform_binding_size::<LensUniforms>,
};

const ANTIALIAS_DESC: PassDesc = PassDesc {
    name: "antialias",
    pass_label: "loupe antialias pass",
    shader_label: "loupe antialias shader",
    source: include_str!("shaders/antialias.wgsl"),
    textures: 1,
    uniform_size: uniform_binding_size::<AntialiasUniforms>,
};

impl PassKind {
    fn ensure(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat, desc: &PassDesc) -> Result<()> {
        if self.pipelines.contains_key(&format) && self.ubo.is_some() {
            return Ok(());
        }

        if self.layout.is_none() {
            let mut entries = vec![wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some((desc.uniform_size)()),
                },
                count: None,
            }];
            for i in 0..desc.textures {
                entries.push(wgpu::BindGroupLayoutEntry {
                    binding: 1 + i * 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                });
                entries.push(wgpu::BindGroupLayoutEntry {
                    binding: 2 + i * 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                });
            }

            let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(desc.pass_label),
                entries: &entries,
            });
            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(desc.pass_label),
                bind_group_layouts: &[&layout],
                immediate_size: 0,
            });
            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(desc.shader_label),
                source: wgpu::ShaderSource::Wgsl(desc.source.into()),
            });

            let ubo = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(desc.pass_label),
                size: (desc.uniform_size)().get(),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            self.layout = Some(layout);
            self.pipeline_layout = Some(pipeline_layout);
            self.shader = Some(shader);
            self.ubo = Some(ubo);
        }

        let pipeline_layout = self
            .pipeline_layout
            .as_ref()
            .ok_or_else(|| missing(desc.name, "pipeline layout"))?;
        let shader = self.shader.as_ref().ok_or_else(|| missing(desc.name, "shader"))?;

        log::debug!("building {} pipeline for {:?}", desc.name, format);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.pass_label),
            layout: Some(pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
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

        self.pipelines.insert(format, pipeline);
        Ok(())
    }

    fn bindings(&self, name: &'static str) -> Result<(&wgpu::BindGroupLayout, &wgpu::Buffer)> {
        let layout = self.layout.as_ref().ok_or_else(|| missing(name, "bind group layout"))?;
        let ubo = self.ubo.as_ref().ok_or_else(|| missing(name, "uniform buffer"))?;
        Ok((layout, ubo))
    }
}

fn missing(pass: &'static str, what: &str) -> LensError {
    LensError::Render {
        pass,
        message: format!("{what} unavailable"),
    }
}
