//! Draw recording and GPU submission.
//!
//! Buckets record draws into a [`Painter`]. All state goes through the
//! [`StateContext`](crate::state::StateContext) cache; fixed-function state is
//! folded into each draw's [`PipelineKey`] and dynamic state is kept as ordered
//! state commands. [`FrameEncoder`] replays a finished [`Frame`] on a wgpu pass.
//!
//! Convention:
//! - geometry is in tile units (`0..EXTENT`, +Y down)
//! - each [`RenderTile`] matrix maps tile units to clip space

mod ctx;
mod encoder;
mod frame;
pub mod matrix;
mod painter;
mod params;
mod resources;
mod uniforms;
mod viewport;

pub use ctx::{RenderTarget, DEPTH_STENCIL_FORMAT};
pub use encoder::{EncodeStats, FrameEncoder};
pub use frame::{DrawCall, DrawGeometry, Frame, FrameCommand, PipelineKey};
pub use painter::Painter;
pub use params::{PaintParameters, RenderPass, RenderTile, DEPTH_EPSILON, NUM_SUBLAYERS, TILE_SIZE};
pub use resources::{GpuResourceStore, Uploader};
pub use uniforms::{CircleUniforms, ClippingMaskUniforms, RasterUniforms, Uniforms};
pub use viewport::Viewport;
