//! Rotating cube field drawn without a depth buffer.
//!
//! Faces are transformed on the CPU, back faces dropped, and the rest sorted
//! far to near so a plain color pass composites them correctly.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

use loupe_engine::coords::{ColorRgba, Viewport};
use loupe_engine::render::{uniform_binding_size, ViewTransformUniform};
use loupe_lens::gpu::{SceneCtx, SceneDraw};
use loupe_lens::Scene;

const FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;
const SPACING: f32 = 1.8;
const AMBIENT: f32 = 0.3;

const GRADIENT_TOP: u32 = 0x2B3A55;
const GRADIENT_BOTTOM: u32 = 0xC9D6E8;

// ── geometry ──────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct SceneVertex {
    clip: [f32; 4],
    color: [f32; 4],
}

impl SceneVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x4, // clip
        1 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SceneVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct Cube {
    center: Vec3,
    axis: Vec3,
    /// Radians per second.
    speed: f32,
    phase: f32,
    color: Vec3,
}

struct Face {
    normal: Vec3,
    corners: [Vec3; 4],
}

const FACES: [Face; 6] = [
    face(Vec3::X, [[0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5], [0.5, -0.5, 0.5]]),
    face(Vec3::NEG_X, [[-0.5, -0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5], [-0.5, -0.5, -0.5]]),
    face(Vec3::Y, [[-0.5, 0.5, -0.5], [-0.5, 0.5, 0.5], [0.5, 0.5, 0.5], [0.5, 0.5, -0.5]]),
    face(Vec3::NEG_Y, [[-0.5, -0.5, 0.5], [-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5]]),
    face(Vec3::Z, [[-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5]]),
    face(Vec3::NEG_Z, [[0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5, 0.5, -0.5], [0.5, 0.5, -0.5]]),
];

const fn face(normal: Vec3, c: [[f32; 3]; 4]) -> Face {
    Face {
        normal,
        corners: [
            Vec3::new(c[0][0], c[0][1], c[0][2]),
            Vec3::new(c[1][0], c[1][1], c[1][2]),
            Vec3::new(c[2][0], c[2][1], c[2][2]),
            Vec3::new(c[3][0], c[3][1], c[3][2]),
        ],
    }
}

/// Lays out an `n x n` grid of cubes on the XZ plane, centered at the origin.
pub(crate) fn cube_grid(n: u32) -> Vec<Cube> {
    let half = (n.saturating_sub(1)) as f32 * SPACING * 0.5;
    let count = (n * n).max(1) as f32;
    let mut cubes = Vec::with_capacity((n * n) as usize);
    for row in 0..n {
        for col in 0..n {
            let i = (row * n + col) as f32;
            cubes.push(Cube {
                center: Vec3::new(col as f32 * SPACING - half, 0.0, row as f32 * SPACING - half),
                axis: Vec3::new(1.0 + i % 3.0, 2.0, 0.5 + i % 2.0).normalize(),
                speed: 0.4 + 0.15 * (i % 5.0),
                phase: i * 0.7,
                color: hue(i / count),
            });
        }
    }
    cubes
}

/// Fully saturated color for `t` in `0..1` around the hue wheel.
fn hue(t: f32) -> Vec3 {
    let h = t.fract() * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    Vec3::new(r, g, b) * 0.8 + Vec3::splat(0.1)
}

/// Appends the visible faces of `cubes` to `out` as triangles, far first.
///
/// With `gradient`, a full-target backdrop is emitted ahead of the cubes.
pub(crate) fn build_geometry(
    cubes: &[Cube],
    elapsed: f32,
    view: Mat4,
    proj: Mat4,
    gradient: bool,
    out: &mut Vec<SceneVertex>,
) {
    out.clear();

    if gradient {
        let top = ColorRgba::from_rgb_hex(GRADIENT_TOP).to_array();
        let bottom = ColorRgba::from_rgb_hex(GRADIENT_BOTTOM).to_array();
        let v = |x: f32, y: f32, color| SceneVertex { clip: [x, y, 1.0, 1.0], color };
        out.extend_from_slice(&[
            v(-1.0, -1.0, bottom),
            v(1.0, -1.0, bottom),
            v(1.0, 1.0, top),
            v(-1.0, -1.0, bottom),
            v(1.0, 1.0, top),
            v(-1.0, 1.0, top),
        ]);
    }

    let light = view.transform_vector3(Vec3::new(0.4, 1.0, 0.6).normalize());
    let mut faces: Vec<(f32, [Vec4; 4], [f32; 4])> = Vec::new();

    for cube in cubes {
        let rotation = Mat4::from_axis_angle(cube.axis, cube.phase + cube.speed * elapsed);
        let model_view = view * Mat4::from_translation(cube.center) * rotation;

        for f in &FACES {
            let normal = model_view.transform_vector3(f.normal).normalize_or_zero();
            let center = model_view.transform_point3(f.normal * 0.5);
            if normal.dot(-center) <= 0.0 {
                continue;
            }

            let corners = f.corners.map(|p| model_view.transform_point3(p));
            if corners.iter().any(|p| p.z > -Z_NEAR) {
                continue;
            }

            let shade = AMBIENT + (1.0 - AMBIENT) * normal.dot(light).max(0.0);
            let c = cube.color * shade;
            faces.push((
                -center.z,
                corners.map(|p| proj * p.extend(1.0)),
                [c.x, c.y, c.z, 1.0],
            ));
        }
    }

    faces.sort_by(|a, b| b.0.total_cmp(&a.0));

    for (_, clip, color) in faces {
        for i in [0, 1, 2, 0, 2, 3] {
            out.push(SceneVertex { clip: clip[i].to_array(), color });
        }
    }
}

// ── scene ─────────────────────────────────────────────────────────────────

/// The demo scene.
///
/// The background is either a solid color (reported through
/// [`Scene::background_color`]) or a vertical gradient drawn as geometry.
pub struct CubeField {
    cubes: Vec<Cube>,
    solid: ColorRgba,
    solid_background: bool,
    vertices: Vec<SceneVertex>,
    gpu: SceneGpu,
}

impl CubeField {
    pub fn new(grid: u32, solid: ColorRgba, solid_background: bool) -> Self {
        Self {
            cubes: cube_grid(grid),
            solid,
            solid_background,
            vertices: Vec::new(),
            gpu: SceneGpu::default(),
        }
    }

    pub fn toggle_background(&mut self) {
        self.solid_background = !self.solid_background;
        log::info!(
            "background {}",
            if self.solid_background { "solid" } else { "gradient" }
        );
    }

    /// Rebuilds geometry for the frame at `elapsed` seconds.
    pub fn update(&mut self, elapsed: f32, viewport: Viewport) {
        let aspect = if viewport.height > 0.0 { viewport.width / viewport.height } else { 1.0 };
        let proj = Mat4::perspective_rh(FOV_Y, aspect.max(1e-3), Z_NEAR, Z_FAR);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 7.0, 15.0), Vec3::ZERO, Vec3::Y);
        build_geometry(
            &self.cubes,
            elapsed,
            view,
            proj,
            !self.solid_background,
            &mut self.vertices,
        );
    }
}

impl Scene for CubeField {
    fn background_color(&self) -> Option<ColorRgba> {
        self.solid_background.then_some(self.solid)
    }
}

impl SceneDraw for CubeField {
    fn draw(&mut self, ctx: &SceneCtx<'_>, pass: &mut wgpu::RenderPass<'_>) {
        self.gpu.draw(ctx, pass, &self.vertices);
    }
}

// ── gpu ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct SceneGpu {
    pipelines: HashMap<wgpu::TextureFormat, wgpu::RenderPipeline>,
    pipeline_layout: Option<wgpu::PipelineLayout>,
    shader: Option<wgpu::ShaderModule>,
    bind_group: Option<wgpu::BindGroup>,
    view_ubo: Option<wgpu::Buffer>,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
}

impl SceneGpu {
    fn draw(&mut self, ctx: &SceneCtx<'_>, pass: &mut wgpu::RenderPass<'_>, vertices: &[SceneVertex]) {
        if vertices.is_empty() {
            return;
        }

        self.ensure_bindings(ctx);
        self.ensure_pipeline(ctx);
        self.ensure_capacity(ctx, vertices.len());

        let Some(ubo) = self.view_ubo.as_ref() else { return };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewTransformUniform::from(ctx.transform)));

        let Some(vbo) = self.vbo.as_ref() else { return };
        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(vertices));

        let Some(pipeline) = self.pipelines.get(&ctx.format) else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.set_vertex_buffer(0, vbo.slice(..));
        pass.draw(0..vertices.len() as u32, 0..1);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_bindings(&mut self, ctx: &SceneCtx<'_>) {
        if self.bind_group.is_some() {
            return;
        }

        let layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("studio scene bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(uniform_binding_size::<ViewTransformUniform>()),
                },
                count: None,
            }],
        });

        let view_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("studio scene view ubo"),
            size: std::mem::size_of::<ViewTransformUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("studio scene bind group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_ubo.as_entire_binding(),
            }],
        });

        self.pipeline_layout = Some(ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("studio scene pipeline layout"),
            bind_group_layouts: &[&layout],
            immediate_size: 0,
        }));
        self.view_ubo = Some(view_ubo);
        self.bind_group = Some(bind_group);
        self.pipelines.clear();
    }

    fn ensure_pipeline(&mut self, ctx: &SceneCtx<'_>) {
        if self.pipelines.contains_key(&ctx.format) {
            return;
        }
        let Some(layout) = self.pipeline_layout.as_ref() else { return };

        let shader = self.shader.get_or_insert_with(|| {
            ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("studio scene shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
            })
        });

        log::debug!("building scene pipeline for {:?}", ctx.format);
        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("studio scene pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[SceneVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Culled on the CPU.
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

        self.pipelines.insert(ctx.format, pipeline);
    }

    fn ensure_capacity(&mut self, ctx: &SceneCtx<'_>, required: usize) {
        if required <= self.vbo_capacity && self.vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(256);
        self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("studio scene vbo"),
            size: (new_cap * std::mem::size_of::<SceneVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vbo_capacity = new_cap;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_cube(center: Vec3) -> Cube {
        Cube {
            center,
            axis: Vec3::Y,
            speed: 0.0,
            phase: 0.0,
            color: Vec3::ONE,
        }
    }

    fn proj() -> Mat4 {
        Mat4::perspective_rh(FOV_Y, 1.0, Z_NEAR, Z_FAR)
    }

    // ── culling ───────────────────────────────────────────────────────────

    #[test]
    fn cube_facing_camera_shows_one_face() {
        let mut out = Vec::new();
        build_geometry(&[still_cube(Vec3::new(0.0, 0.0, -5.0))], 0.0, Mat4::IDENTITY, proj(), false, &mut out);
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn cube_behind_camera_is_dropped() {
        let mut out = Vec::new();
        build_geometry(&[still_cube(Vec3::new(0.0, 0.0, 5.0))], 0.0, Mat4::IDENTITY, proj(), false, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn offset_cube_shows_at_most_three_faces() {
        let mut out = Vec::new();
        let cube = Cube { axis: Vec3::new(1.0, 1.0, 0.0).normalize(), phase: 0.6, ..still_cube(Vec3::new(2.0, 1.0, -6.0)) };
        build_geometry(&[cube], 0.0, Mat4::IDENTITY, proj(), false, &mut out);
        assert!(!out.is_empty());
        assert!(out.len() <= 18);
    }

    // ── ordering ──────────────────────────────────────────────────────────

    #[test]
    fn far_faces_come_first() {
        let cubes = [still_cube(Vec3::new(0.0, 0.0, -5.0)), still_cube(Vec3::new(0.3, 0.0, -10.0))];
        let mut out = Vec::new();
        build_geometry(&cubes, 0.0, Mat4::IDENTITY, proj(), false, &mut out);

        assert_eq!(out.len(), 12);
        // perspective_rh puts view depth in w.
        assert!((out[0].clip[3] - 9.5).abs() < 1e-4);
        assert!((out[11].clip[3] - 4.5).abs() < 1e-4);
    }

    #[test]
    fn gradient_is_drawn_before_cubes() {
        let mut out = Vec::new();
        build_geometry(&[still_cube(Vec3::new(0.0, 0.0, -5.0))], 0.0, Mat4::IDENTITY, proj(), true, &mut out);
        assert_eq!(out.len(), 12);
        assert_eq!(out[0].clip, [-1.0, -1.0, 1.0, 1.0]);
    }

    // ── scene contract ────────────────────────────────────────────────────

    #[test]
    fn background_reports_solid_only() {
        let mut field = CubeField::new(2, ColorRgba::black(), true);
        assert_eq!(field.background_color(), Some(ColorRgba::black()));
        field.toggle_background();
        assert_eq!(field.background_color(), None);
    }

    #[test]
    fn grid_is_centered() {
        let cubes = cube_grid(3);
        assert_eq!(cubes.len(), 9);
        let sum = cubes.iter().fold(Vec3::ZERO, |acc, c| acc + c.center);
        assert!(sum.length() < 1e-4);
    }
}
