use crate::shader::UniformLocation;

use super::{DrawPass, WgpuBackend, WgpuBuffer, WgpuProgram, WgpuUniform};

/// [`DrawPass`] recording into one wgpu render pass with one program.
///
/// Slots and groups that were not bound explicitly before a draw are filled
/// from the backend's zero attribute buffer and the program's default groups.
/// Uniform bindings only last for the next draw.
pub struct WgpuPass<'a> {
    raw: wgpu::RenderPass<'a>,
    program: &'a WgpuProgram,
    fallback: Option<&'a wgpu::Buffer>,

    enabled: Vec<bool>,
    bound: Vec<bool>,
}

impl<'a> WgpuPass<'a> {
    /// Wraps `raw` and sets `program`'s pipeline on it.
    pub fn new(mut raw: wgpu::RenderPass<'a>, gpu: &'a WgpuBackend, program: &'a WgpuProgram) -> Self {
        raw.set_pipeline(program.pipeline());
        Self {
            raw,
            program,
            fallback: gpu.fallback(),
            enabled: vec![false; program.slot_count() as usize],
            bound: vec![false; program.group_count() as usize],
        }
    }

    /// Fills every slot the draw would read but nobody enabled.
    ///
    /// Returns `false` if the zero buffer is missing or too small.
    fn fill_unbound_slots(&mut self, vertex_count: u32) -> bool {
        let needed = vertex_count as u64 * 3 * std::mem::size_of::<f32>() as u64;

        for (slot, enabled) in self.enabled.iter().enumerate() {
            if *enabled {
                continue;
            }
            match self.fallback {
                Some(fallback) if fallback.size() >= needed => {
                    self.raw.set_vertex_buffer(slot as u32, fallback.slice(..needed));
                }
                _ => return false,
            }
        }
        true
    }

    fn fill_unbound_groups(&mut self) {
        for (group, bound) in self.bound.iter().enumerate() {
            if *bound {
                continue;
            }
            if let Some(default) = self.program.default_group(group as u32) {
                self.raw.set_bind_group(group as u32, default, &[]);
            }
        }
    }
}

impl DrawPass<WgpuBackend> for WgpuPass<'_> {
    fn enable_attribute(&mut self, location: u32, buffer: &WgpuBuffer) {
        let Some(slot) = self.program.slot(location) else {
            log::debug!("location {location} is not a vertex input of the bound program");
            return;
        };
        self.raw.set_vertex_buffer(slot, buffer.raw().slice(..));
        self.enabled[slot as usize] = true;
    }

    fn disable_attribute(&mut self, location: u32) {
        if let Some(slot) = self.program.slot(location) {
            self.enabled[slot as usize] = false;
        }
    }

    fn bind_uniform(&mut self, location: UniformLocation, uniform: &WgpuUniform) {
        let Some(bound) = self.bound.get_mut(location.group as usize) else {
            log::debug!("group {} is not used by the bound program", location.group);
            return;
        };
        self.raw.set_bind_group(location.group, uniform.bind_group(), &[]);
        *bound = true;
    }

    fn draw_triangles(&mut self, vertex_count: u32) {
        if vertex_count == 0 {
            return;
        }

        if !self.fill_unbound_slots(vertex_count) {
            log::warn!(
                "draw of {vertex_count} vertices skipped: fallback attribute buffer too small"
            );
        } else {
            self.fill_unbound_groups();
            self.raw.draw(0..vertex_count, 0..1);
        }

        self.bound.fill(false);
    }
}
