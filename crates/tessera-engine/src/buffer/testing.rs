//! Upload context that keeps bytes in memory, for tests.

use super::{BufferId, BufferUsage, PremultipliedImage, TextureId, UploadContext};

#[derive(Debug, Default)]
pub(crate) struct RecordingUploads {
    pub buffers: Vec<(BufferUsage, String, Vec<u8>)>,
    pub textures: Vec<(String, u32, u32)>,
}

impl UploadContext for RecordingUploads {
    fn create_buffer(&mut self, usage: BufferUsage, label: &str, contents: &[u8]) -> BufferId {
        self.buffers.push((usage, label.to_owned(), contents.to_vec()));
        BufferId(self.buffers.len() as u32 - 1)
    }

    fn create_texture(&mut self, label: &str, image: &PremultipliedImage) -> TextureId {
        self.textures.push((label.to_owned(), image.width, image.height));
        TextureId(self.textures.len() as u32 - 1)
    }
}
