/// Where the device's 2D texture ceiling comes from.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureLimit {
    /// Keep `required_limits.max_texture_dimension_2d` as given.
    Requested,
    /// Raise it to whatever the adapter supports.
    ///
    /// Offscreen passes that scale with the window (the magnifier's zoomed
    /// buffer) need the real ceiling; the wgpu default of 8192 is often lower.
    Adapter,
}

/// Device and surface setup for a window.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format when one is offered.
    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,
    /// Falls back to the first supported mode when unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,
    pub texture_limit: TextureLimit,
    /// Hint passed through as `desired_maximum_frame_latency`.
    pub frame_latency: u32,
}

impl GpuInit {
    /// Limits to request from an adapter that reports `adapter` limits.
    pub fn device_limits(&self, adapter: &wgpu::Limits) -> wgpu::Limits {
        match self.texture_limit {
            TextureLimit::Requested => self.required_limits.clone(),
            TextureLimit::Adapter => wgpu::Limits {
                max_texture_dimension_2d: adapter.max_texture_dimension_2d,
                ..self.required_limits.clone()
            },
        }
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            texture_limit: TextureLimit::Adapter,
            frame_latency: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter_limits(max_2d: u32) -> wgpu::Limits {
        wgpu::Limits {
            max_texture_dimension_2d: max_2d,
            ..wgpu::Limits::default()
        }
    }

    #[test]
    fn default_takes_adapter_texture_ceiling() {
        let limits = GpuInit::default().device_limits(&adapter_limits(16384));
        assert_eq!(limits.max_texture_dimension_2d, 16384);
        assert_eq!(limits.max_bind_groups, wgpu::Limits::default().max_bind_groups);
    }

    #[test]
    fn requested_policy_keeps_given_ceiling() {
        let init = GpuInit {
            texture_limit: TextureLimit::Requested,
            required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
            ..GpuInit::default()
        };
        let limits = init.device_limits(&adapter_limits(16384));
        assert_eq!(limits.max_texture_dimension_2d, 2048);
    }
}
