//! Off-thread tile building.
//!
//! Bucket construction is pure CPU work and runs on rayon's pool. Finished
//! tiles cross to the GPU thread over a bounded crossbeam channel; upload and
//! rendering happen only there.

mod handoff;
mod tile;

pub use handoff::{build_tiles_into, tile_handoff, TileReceiver, TileSender};
pub use tile::{build_tile, build_tiles, BuiltTile, TileConfig, TileData};
