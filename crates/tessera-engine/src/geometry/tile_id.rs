/// Tile address; `overscaled_z >= z` when a tile is drawn past its source's max zoom.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct OverscaledTileId {
    pub overscaled_z: u8,
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl OverscaledTileId {
    #[inline]
    pub const fn new(z: u8, x: u32, y: u32) -> Self {
        Self { overscaled_z: z, z, x, y }
    }

    #[inline]
    pub const fn overscaled(mut self, overscaled_z: u8) -> Self {
        self.overscaled_z = overscaled_z;
        self
    }
}
