use anyhow::{Context, Result};

use crate::buffer::PremultipliedImage;
use crate::render::DEPTH_STENCIL_FORMAT;

use super::Gpu;

/// Color + depth-stencil textures frames render into when there is no window.
pub struct OffscreenTarget {
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    _depth_stencil: wgpu::Texture,
    depth_stencil_view: wgpu::TextureView,
    size: (u32, u32),
}

/// Color format of offscreen targets (premultiplied RGBA8, not sRGB-encoded).
pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

impl OffscreenTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = |label: &str, format: wgpu::TextureFormat, usage: wgpu::TextureUsages| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage,
                view_formats: &[],
            })
        };

        let color = texture(
            "tessera offscreen color",
            OFFSCREEN_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        );
        let depth_stencil = texture(
            "tessera offscreen depth-stencil",
            DEPTH_STENCIL_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );

        Self {
            color_view: color.create_view(&wgpu::TextureViewDescriptor::default()),
            depth_stencil_view: depth_stencil.create_view(&wgpu::TextureViewDescriptor::default()),
            color,
            _depth_stencil: depth_stencil,
            size: (size.width, size.height),
        }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    #[inline]
    pub fn depth_stencil_view(&self) -> &wgpu::TextureView {
        &self.depth_stencil_view
    }

    /// Copies the color texture back to the CPU. Blocks until the GPU is idle.
    pub fn read_pixels(&self, gpu: &Gpu) -> Result<PremultipliedImage> {
        let (width, height) = self.size;
        let row_bytes = width as usize * 4;
        let padded_row_bytes = row_bytes.next_multiple_of(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as usize);

        let buffer = gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessera readback"),
            size: padded_row_bytes as u64 * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = gpu.create_encoder("tessera readback");
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.color,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row_bytes as u32),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        );
        gpu.submit(encoder);

        let slice = buffer.slice(..);
        let (sender, receiver) = crossbeam_channel::bounded(1);
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        gpu.device()
            .poll(wgpu::PollType::wait_indefinitely())
            .context("device poll failed")?;
        receiver
            .recv()
            .context("readback callback dropped")?
            .context("failed to map readback buffer")?;

        let mut data = Vec::with_capacity(row_bytes * height as usize);
        {
            let mapped = slice.get_mapped_range();
            for row in mapped.chunks(padded_row_bytes) {
                data.extend_from_slice(&row[..row_bytes]);
            }
        }
        buffer.unmap();

        Ok(PremultipliedImage::new(width, height, data))
    }
}
