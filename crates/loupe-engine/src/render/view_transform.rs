use crate::coords::Size;

/// Clip-space affine transform equivalent to rendering into a viewport
/// rectangle of a target.
///
/// `clip.xy' = clip.xy * scale + offset * clip.w`
///
/// The rectangle is in target pixels with GL orientation (origin
/// bottom-left) and may extend beyond the target on any side.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewTransform {
    pub scale: [f32; 2],
    pub offset: [f32; 2],
}

impl ViewTransform {
    /// The standard viewport: the whole target.
    pub const IDENTITY: Self = Self { scale: [1.0, 1.0], offset: [0.0, 0.0] };

    /// Transform for viewport `(x, y, width, height)` on a target of `target` size.
    ///
    /// An empty target yields the identity.
    pub fn from_viewport(x: f32, y: f32, width: f32, height: f32, target: Size) -> Self {
        if target.is_empty() {
            return Self::IDENTITY;
        }
        let (tw, th) = target.as_f32();
        Self {
            scale: [width / tw, height / th],
            offset: [(width + 2.0 * x) / tw - 1.0, (height + 2.0 * y) / th - 1.0],
        }
    }

    /// Applies the transform to an NDC point.
    pub fn apply(self, ndc: [f32; 2]) -> [f32; 2] {
        [
            ndc[0] * self.scale[0] + self.offset[0],
            ndc[1] * self.scale[1] + self.offset[1],
        ]
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
