//! Spatial indexes used for feature hit-testing.
//!
//! - `GridIndex<T>`: uniform grid over bounding boxes, built once per tile
//! - `FeatureIndex`: per-tile index of renderable sub-features backed by a grid

mod feature;
mod grid;

pub use feature::{FeatureIndex, IndexedSubfeature, DEFAULT_GRID_PADDING, DEFAULT_GRID_SIZE};
pub use grid::GridIndex;
