//! Buckets: the GPU-ready representation of one tile's features for one layer group.
//!
//! Lifecycle: `Empty -> Populated -> Uploaded -> rendered any number of times`.
//! - building (`add_feature`, `set_image`) is pure CPU work and may run off the
//!   GPU thread
//! - `upload` and `render` run on the GPU thread; `upload` exactly once, and
//!   `render` only afterwards (both enforced by assertions)

mod circle;
mod raster;

pub use circle::{CircleBucket, CircleVertex};
pub use raster::RasterBucket;

use crate::buffer::UploadContext;
use crate::geometry::OverscaledTileId;
use crate::render::{PaintParameters, Painter, RenderTile};
use crate::style::{Layer, LayerKind, MapMode};

/// Inputs shared by every bucket built for one tile.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BucketParameters {
    pub tile_id: OverscaledTileId,
    pub mode: MapMode,
}

/// Observable lifecycle stage of a bucket.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BucketState {
    Empty,
    Populated,
    Uploaded,
}

/// Closed set of bucket kinds.
#[derive(Debug)]
pub enum Bucket {
    Circle(CircleBucket),
    Raster(RasterBucket),
}

impl Bucket {
    #[inline]
    pub fn kind(&self) -> LayerKind {
        match self {
            Bucket::Circle(_) => LayerKind::Circle,
            Bucket::Raster(_) => LayerKind::Raster,
        }
    }

    pub fn has_data(&self) -> bool {
        match self {
            Bucket::Circle(b) => b.has_data(),
            Bucket::Raster(b) => b.has_data(),
        }
    }

    pub fn state(&self) -> BucketState {
        match self {
            Bucket::Circle(b) => b.state(),
            Bucket::Raster(b) => b.state(),
        }
    }

    /// Whether draws must be stencil-clipped to the tile boundary.
    pub fn needs_clipping(&self) -> bool {
        match self {
            Bucket::Circle(b) => b.needs_clipping(),
            Bucket::Raster(b) => b.needs_clipping(),
        }
    }

    pub fn upload(&mut self, ctx: &mut dyn UploadContext) {
        match self {
            Bucket::Circle(b) => b.upload(ctx),
            Bucket::Raster(b) => b.upload(ctx),
        }
    }

    /// Records draws for `layer`. A layer of another kind is skipped with a warning.
    pub fn render(
        &self,
        painter: &mut Painter,
        params: &PaintParameters,
        layer: &Layer,
        tile: &RenderTile,
    ) {
        match (self, layer) {
            (Bucket::Circle(b), Layer::Circle(l)) => b.render(painter, params, l, tile),
            (Bucket::Raster(b), Layer::Raster(l)) => b.render(painter, params, l, tile),
            (bucket, layer) => log::warn!(
                "skipping {:?} layer '{}' against a {:?} bucket",
                layer.kind(),
                layer.id(),
                bucket.kind()
            ),
        }
    }
}

impl From<CircleBucket> for Bucket {
    fn from(bucket: CircleBucket) -> Self {
        Bucket::Circle(bucket)
    }
}

impl From<RasterBucket> for Bucket {
    fn from(bucket: RasterBucket) -> Self {
        Bucket::Raster(bucket)
    }
}
