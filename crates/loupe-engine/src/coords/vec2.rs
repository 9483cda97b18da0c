use core::ops::Mul;

/// Point or offset in pixels; logical or device depending on where it came from.
///
/// Origin conventions are the caller's: input reports top-left, the magnifier
/// works bottom-left (see [`Viewport::flip_y`](super::Viewport::flip_y)).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

/// Uniform scale, e.g. logical to device pixels.
impl Mul<f32> for Vec2 {
    type Output = Vec2;

    #[inline]
    fn mul(self, ratio: f32) -> Vec2 {
        Vec2::new(self.x * ratio, self.y * ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaling_by_pixel_ratio() {
        assert_eq!(Vec2::new(10.0, 20.0) * 1.5, Vec2::new(15.0, 30.0));
        assert_eq!(Vec2::new(3.0, 4.0).to_array(), [3.0, 4.0]);
    }
}
