//! Headless GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue without a window
//! - offscreen color + depth-stencil targets and pixel readback

mod gpu;
mod target;

pub use gpu::{Gpu, GpuInit};
pub use target::{OffscreenTarget, OFFSCREEN_FORMAT};
