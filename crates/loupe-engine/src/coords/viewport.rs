use super::Vec2;

/// Window extent in logical pixels, before the pixel ratio is applied.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Mirrors `p` vertically: top-left origin to bottom-left and back.
    #[inline]
    pub fn flip_y(self, p: Vec2) -> Vec2 {
        Vec2::new(p.x, self.height - p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_y_moves_origin_to_bottom() {
        let v = Viewport::new(800.0, 600.0);
        assert_eq!(v.flip_y(Vec2::new(10.0, 0.0)), Vec2::new(10.0, 600.0));
        assert_eq!(v.flip_y(Vec2::new(10.0, 450.0)), Vec2::new(10.0, 150.0));
    }

    #[test]
    fn flip_y_round_trips() {
        let v = Viewport::new(1280.0, 720.0);
        let p = Vec2::new(33.0, 44.0);
        assert_eq!(v.flip_y(v.flip_y(p)), p);
    }
}
