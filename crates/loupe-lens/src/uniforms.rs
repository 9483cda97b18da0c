//! Uniform records consumed by the lens and antialias shaders.
//!
//! Field order and padding mirror the WGSL structs in `gpu/shaders/`.

use bytemuck::{Pod, Zeroable};

/// Lens pass parameters, all lengths in device pixels.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LensUniforms {
    /// Lens center, origin bottom-left.
    pub pointer: [f32; 2],
    pub zoomed_resolution: [f32; 2],
    pub screen_resolution: [f32; 2],
    pub zoom: f32,
    pub shape_exponent: f32,
    /// Linear RGB, alpha 1.
    pub outline_color: [f32; 4],
    pub radius: f32,
    pub outline_thickness: f32,
    pub _pad: [f32; 2], // 64 bytes total
}

impl Default for LensUniforms {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Antialias pass parameters.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct AntialiasUniforms {
    /// `1 / screen size` in device pixels.
    pub inverse_resolution: [f32; 2],
    pub _pad: [f32; 2],
}

impl Default for AntialiasUniforms {
    fn default() -> Self {
        Self::zeroed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_are_uniform_aligned() {
        assert_eq!(std::mem::size_of::<LensUniforms>(), 64);
        assert_eq!(std::mem::size_of::<AntialiasUniforms>(), 16);
    }

    #[test]
    fn outline_color_sits_on_a_vec4_boundary() {
        let u = LensUniforms::default();
        let base = &u as *const _ as usize;
        let color = &u.outline_color as *const _ as usize;
        assert_eq!((color - base) % 16, 0);
        assert_eq!(color - base, 32);
    }
}
