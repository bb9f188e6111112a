use winit::dpi::PhysicalSize;

/// Target for one frame of drawing: encoder, color view and its size.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    /// Physical pixels; the depth buffer is sized to match.
    pub size: PhysicalSize<u32>,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        size: PhysicalSize<u32>,
    ) -> Self {
        Self {
            encoder,
            color_view,
            size,
        }
    }
}
