/// Viewport size in logical pixels.
///
/// Projection matrices and the circle extrude scale are expressed against this
/// size; the render target is `pixel_ratio` times larger.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(512.0, 512.0)
    }
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Target size in physical pixels, at least 1x1.
    pub fn physical_size(self, pixel_ratio: f32) -> (u32, u32) {
        (
            (self.width * pixel_ratio).round().max(1.0) as u32,
            (self.height * pixel_ratio).round().max(1.0) as u32,
        )
    }
}
