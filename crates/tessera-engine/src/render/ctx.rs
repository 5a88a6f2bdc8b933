/// Target for one encoded frame (encoder + color and depth-stencil views).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    /// Must be [`DEPTH_STENCIL_FORMAT`] and match the color size.
    pub depth_stencil_view: &'a wgpu::TextureView,
    /// Physical pixels.
    pub size: (u32, u32),
}

/// Depth-stencil format every pipeline is built against.
pub const DEPTH_STENCIL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        depth_stencil_view: &'a wgpu::TextureView,
        size: (u32, u32),
    ) -> Self {
        Self { encoder, color_view, depth_stencil_view, size }
    }
}
