//! Tile-local geometry shared by buckets and spatial indexes.
//!
//! Canonical tile space:
//! - integer coordinates, origin top-left
//! - nominal range `[0, EXTENT)` on both axes
//! - geometry may spill past the tile edge (buffered from neighbors)

mod bbox;
mod feature;
mod point;
mod tile_id;

pub use bbox::BBox;
pub use feature::{FeatureType, GeometryTileFeature, TileFeature, Value};
pub use point::Point;
pub use tile_id::OverscaledTileId;

/// Coordinate-space width/height of one tile.
pub const EXTENT: i32 = 4096;

/// A single tile-local vertex.
pub type GeometryCoordinate = Point<i16>;

/// One ring, line or point run of a feature.
pub type GeometryCoordinates = Vec<GeometryCoordinate>;

/// All sub-geometries of a feature.
pub type GeometryCollection = Vec<GeometryCoordinates>;
