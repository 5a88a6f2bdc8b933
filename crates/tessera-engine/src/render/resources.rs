use wgpu::util::DeviceExt;

use crate::buffer::{BufferId, BufferUsage, PremultipliedImage, TextureId, UploadContext};

/// GPU objects created by bucket uploads, addressed by the handles buckets keep.
#[derive(Debug, Default)]
pub struct GpuResourceStore {
    buffers: Vec<wgpu::Buffer>,
    textures: Vec<GpuTexture>,
}

#[derive(Debug)]
struct GpuTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl GpuResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn buffer(&self, id: BufferId) -> Option<&wgpu::Buffer> {
        self.buffers.get(id.0 as usize)
    }

    #[inline]
    pub fn texture_view(&self, id: TextureId) -> Option<&wgpu::TextureView> {
        self.textures.get(id.0 as usize).map(|t| &t.view)
    }

    #[inline]
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    #[inline]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Upload context writing into this store.
    pub fn uploader<'a>(
        &'a mut self,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
    ) -> Uploader<'a> {
        Uploader { device, queue, store: self }
    }
}

/// [`UploadContext`] backed by a wgpu device.
pub struct Uploader<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    store: &'a mut GpuResourceStore,
}

impl UploadContext for Uploader<'_> {
    fn create_buffer(&mut self, usage: BufferUsage, label: &str, contents: &[u8]) -> BufferId {
        let usage = match usage {
            BufferUsage::Vertex => wgpu::BufferUsages::VERTEX,
            BufferUsage::Index => wgpu::BufferUsages::INDEX,
        };
        // Empty slices cannot be bound; keep one padded word instead.
        let contents = if contents.is_empty() { &[0u8; 4][..] } else { contents };
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage,
        });

        let id = BufferId(self.store.buffers.len() as u32);
        self.store.buffers.push(buffer);
        id
    }

    fn create_texture(&mut self, label: &str, image: &PremultipliedImage) -> TextureId {
        let (width, height) = (image.width.max(1), image.height.max(1));
        let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let blank;
        let data = if image.is_empty() {
            blank = vec![0u8; 4];
            &blank
        } else {
            &image.data
        };
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let id = TextureId(self.store.textures.len() as u32);
        self.store.textures.push(GpuTexture { _texture: texture, view });
        id
    }
}
