/// Integer extent in device pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Rounds a logical extent scaled by `ratio` to device pixels.
    ///
    /// Negative and non-finite products collapse to zero.
    #[inline]
    pub fn from_logical(width: f32, height: f32, ratio: f32) -> Self {
        let round = |v: f32| {
            let v = (v * ratio).round();
            if v.is_finite() && v > 0.0 { v as u32 } else { 0 }
        };
        Self::new(round(width), round(height))
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn as_f32(self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_logical_rounds_to_nearest() {
        assert_eq!(Size::from_logical(800.0, 600.0, 1.0), Size::new(800, 600));
        assert_eq!(Size::from_logical(333.0, 100.0, 1.5), Size::new(500, 150));
        assert_eq!(Size::from_logical(100.3, 100.7, 1.0), Size::new(100, 101));
    }

    #[test]
    fn from_logical_clamps_negative() {
        assert_eq!(Size::from_logical(-10.0, 5.0, 2.0), Size::new(0, 10));
        assert!(Size::from_logical(-10.0, 5.0, 2.0).is_empty());
    }
}
