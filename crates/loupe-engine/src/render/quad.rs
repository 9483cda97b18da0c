//! Shared GPU types for full-target quad passes.

use bytemuck::{Pod, Zeroable};

use super::ViewTransform;

// ── view transform uniform ────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ViewTransformUniform {
    pub scale: [f32; 2],
    pub offset: [f32; 2], // 16 bytes total, no padding needed
}

impl From<ViewTransform> for ViewTransformUniform {
    fn from(t: ViewTransform) -> Self {
        Self { scale: t.scale, offset: t.offset }
    }
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Unit quad; vertex shaders map it onto the full target with an
/// orthographic `pos * 2 - 1`.
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── uniform binding size ──────────────────────────────────────────────────

/// Returns the `wgpu` minimum binding size for a uniform of type `T`.
pub fn uniform_binding_size<T: Pod>() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<T>() as u64)
        .expect("uniform types are non-zero sized by construction")
}
