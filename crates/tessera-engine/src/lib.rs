//! Tessera engine crate.
//!
//! Compiles decoded map tiles into GPU-ready buckets and draws them:
//! - `geometry`, `style`: tile features and evaluated layer properties
//! - `buffer`, `binder`, `bucket`: segmented vertex/index building and paint attributes
//! - `index`: grid-backed feature hit-testing
//! - `state`, `render`: cached GPU state, draw recording and wgpu submission
//! - `worker`, `device`: parallel tile builds and the headless GPU

pub mod binder;
pub mod bucket;
pub mod buffer;
pub mod device;
pub mod geometry;
pub mod index;
pub mod logging;
pub mod render;
pub mod state;
pub mod style;
pub mod worker;
