use winit::dpi::PhysicalSize;

use crate::scene::Composition;
use crate::shader::ShaderProgram;

use super::{RenderTarget, WgpuBackend, WgpuPass, DEPTH_FORMAT};

/// Clears the frame to white, depth-tests, and draws a composition with one
/// program.
///
/// Owns the depth buffer and recreates it when the target size changes.
pub struct SceneRenderer {
    clear_color: wgpu::Color,
    depth: Option<(PhysicalSize<u32>, wgpu::TextureView)>,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self {
            clear_color: wgpu::Color::WHITE,
            depth: None,
        }
    }

    pub fn with_clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Records one pass drawing `composition` into `target`.
    ///
    /// The fallback attribute buffer of `gpu` must already cover
    /// [`Composition::max_vertex_count`]; see [`WgpuBackend::ensure_fallback`].
    pub fn render(
        &mut self,
        gpu: &WgpuBackend,
        target: &mut RenderTarget<'_>,
        program: &ShaderProgram<WgpuBackend>,
        composition: &Composition<WgpuBackend>,
    ) {
        if target.size.width == 0 || target.size.height == 0 {
            return;
        }
        self.ensure_depth(gpu.device(), target.size);
        let Some((_, depth_view)) = self.depth.as_ref() else { return };

        let rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("pawn scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let mut pass = WgpuPass::new(rpass, gpu, program.raw());
        composition.draw_composition(program, &mut pass);
    }

    fn ensure_depth(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        if matches!(&self.depth, Some((current, _)) if *current == size) {
            return;
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("pawn depth"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        log::debug!("depth buffer (re)created at {}x{}", size.width, size.height);
        self.depth = Some((size, view));
    }
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self::new()
    }
}
