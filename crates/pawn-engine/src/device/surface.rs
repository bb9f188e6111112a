use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;

use super::GpuInit;

/// Builds the initial surface configuration for `size` from what `adapter`
/// supports and what `init` asks for.
pub(super) fn initial_config(
    surface: &wgpu::Surface<'_>,
    adapter: &wgpu::Adapter,
    size: PhysicalSize<u32>,
    init: &GpuInit,
) -> Result<wgpu::SurfaceConfiguration> {
    let mut config = surface
        .get_default_config(adapter, size.width, size.height)
        .context("surface is not supported by the adapter")?;

    let caps = surface.get_capabilities(adapter);
    if let Some(format) = pick_format(&caps.formats, init.prefer_srgb) {
        config.format = format;
    }
    if let Some(alpha) = init.alpha_mode.filter(|m| caps.alpha_modes.contains(m)) {
        config.alpha_mode = alpha;
    }
    config.present_mode = init.present_mode;
    config.desired_maximum_frame_latency = init.desired_maximum_frame_latency;

    Ok(config)
}

/// First format whose sRGB-ness matches the preference, else the first one.
fn pick_format(formats: &[wgpu::TextureFormat], prefer_srgb: bool) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb() == prefer_srgb)
        .or_else(|| formats.first().copied())
}
