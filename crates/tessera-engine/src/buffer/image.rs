/// RGBA8 image with premultiplied alpha, row-major, tightly packed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PremultipliedImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PremultipliedImage {
    /// Wraps raw pixels.
    ///
    /// # Panics
    /// Panics if `data` is not exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            width as usize * height as usize * 4,
            "PremultipliedImage: {width}x{height} needs {} bytes",
            width as usize * height as usize * 4
        );
        Self { width, height, data }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
