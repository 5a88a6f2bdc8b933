//! CPU-side vertex/index accumulation and the hand-off to GPU-resident buffers.
//!
//! Ownership model:
//! - builders append into `VertexVector` / `IndexVector` on any thread
//! - `upload` consumes the vector and returns a typed GPU handle; the CPU copy
//!   cannot be touched afterwards
//! - uploading goes through [`UploadContext`], implemented by the GPU thread's
//!   resource owner

mod handle;
mod image;
mod segment;
mod vector;

#[cfg(test)]
pub(crate) mod testing;

pub use handle::{BufferId, BufferUsage, TextureId, UploadContext};
pub use image::PremultipliedImage;
pub use segment::{Segment, SegmentVector, MAX_SEGMENT_VERTICES};
pub use vector::{IndexBuffer, IndexVector, VertexBuffer, VertexVector};
