/// Evaluated raster paint properties.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterPaintProperties {
    pub opacity: f32,
    pub brightness_min: f32,
    pub brightness_max: f32,
    /// `-1..=1`; negative desaturates.
    pub saturation: f32,
    /// `-1..=1`.
    pub contrast: f32,
}

impl Default for RasterPaintProperties {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            brightness_min: 0.0,
            brightness_max: 1.0,
            saturation: 0.0,
            contrast: 0.0,
        }
    }
}

/// Style layer drawing a tile's raster image.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterLayer {
    pub id: String,
    pub paint: RasterPaintProperties,
}

impl RasterLayer {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), paint: RasterPaintProperties::default() }
    }
}
