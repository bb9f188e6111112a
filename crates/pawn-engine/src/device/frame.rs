use winit::dpi::PhysicalSize;

/// A single acquired frame.
///
/// Short-lived: holding the surface texture prevents acquiring the next one.
/// Hand it back to [`Gpu::submit`](super::Gpu::submit) to present.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
    /// Size of `view` in physical pixels.
    pub size: PhysicalSize<u32>,
}
