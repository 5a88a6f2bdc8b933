use super::PremultipliedImage;

/// Opaque handle to a GPU buffer owned by an [`UploadContext`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u32);

/// Opaque handle to a GPU texture owned by an [`UploadContext`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferUsage {
    Vertex,
    Index,
}

/// GPU resource owner.
///
/// Must only be used on the thread owning the GPU device.
pub trait UploadContext {
    /// Creates an immutable buffer initialized with `contents`.
    fn create_buffer(&mut self, usage: BufferUsage, label: &str, contents: &[u8]) -> BufferId;

    /// Creates a sampled RGBA8 texture from a premultiplied image.
    fn create_texture(&mut self, label: &str, image: &PremultipliedImage) -> TextureId;
}
