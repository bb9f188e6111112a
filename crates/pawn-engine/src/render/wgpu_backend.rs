use std::num::NonZeroU64;

use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::error::ShaderError;
use crate::shader::{CompiledStage, ProgramLayout, UniformBinding, UniformLocation};

use super::GraphicsBackend;

/// Depth buffer format used by every program and the scene renderer.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Bytes per vertex in one attribute buffer (`vec3<f32>`).
const VERTEX_STRIDE: u64 = (3 * std::mem::size_of::<f32>()) as u64;

/// Bytes of one `mat4x4<f32>` uniform.
const MAT4_SIZE: u64 = (16 * std::mem::size_of::<f32>()) as u64;

/// [`GraphicsBackend`] on top of a wgpu device.
///
/// Holds its own handles to the device and queue (wgpu handles are
/// reference counted) plus the formats every program renders into.
///
/// wgpu pipelines read every declared vertex input on every draw. Attributes
/// a shape did not upload are fed from a shared zero-filled buffer, sized by
/// [`ensure_fallback`](Self::ensure_fallback).
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    color_format: wgpu::TextureFormat,

    fallback: Option<wgpu::Buffer>,
    fallback_vertices: u32,
}

impl WgpuBackend {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, color_format: wgpu::TextureFormat) -> Self {
        Self {
            device: device.clone(),
            queue: queue.clone(),
            color_format,
            fallback: None,
            fallback_vertices: 0,
        }
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    #[inline]
    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.color_format
    }

    /// Grows the zero attribute buffer to cover at least `vertices` vertices.
    pub fn ensure_fallback(&mut self, vertices: u32) {
        if self.fallback.is_some() && self.fallback_vertices >= vertices {
            return;
        }

        let vertices = vertices.max(1);
        // New buffers are zero-initialized by wgpu.
        self.fallback = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pawn fallback attribute vbo"),
            size: vertices as u64 * VERTEX_STRIDE,
            usage: wgpu::BufferUsages::VERTEX,
            mapped_at_creation: false,
        }));
        self.fallback_vertices = vertices;

        log::debug!("fallback attribute buffer sized for {vertices} vertices");
    }

    #[inline]
    pub(crate) fn fallback(&self) -> Option<&wgpu::Buffer> {
        self.fallback.as_ref()
    }
}

/// A vertex buffer; released on drop.
pub struct WgpuBuffer {
    raw: wgpu::Buffer,
}

impl WgpuBuffer {
    #[inline]
    pub fn raw(&self) -> &wgpu::Buffer {
        &self.raw
    }
}

/// A `mat4x4<f32>` uniform buffer and the bind group exposing it.
pub struct WgpuUniform {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl WgpuUniform {
    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// A linked render pipeline.
///
/// Every vertex input gets its own buffer slot, in location order. Every
/// uniform gets its own bind group; groups without a uniform are bound to an
/// empty group so the layout has no holes.
pub struct WgpuProgram {
    pipeline: wgpu::RenderPipeline,
    slots: Vec<u32>,
    group_layouts: Vec<wgpu::BindGroupLayout>,
    default_groups: Vec<wgpu::BindGroup>,
}

impl WgpuProgram {
    #[inline]
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Vertex buffer slot fed by shader `location`.
    #[inline]
    pub fn slot(&self, location: u32) -> Option<u32> {
        self.slots.iter().position(|&l| l == location).map(|s| s as u32)
    }

    #[inline]
    pub fn slot_count(&self) -> u32 {
        self.slots.len() as u32
    }

    #[inline]
    pub fn group_count(&self) -> u32 {
        self.default_groups.len() as u32
    }

    /// Bind group used for `group` when nothing else was bound: identity
    /// matrices for uniforms, empty for gaps.
    #[inline]
    pub(crate) fn default_group(&self, group: u32) -> Option<&wgpu::BindGroup> {
        self.default_groups.get(group as usize)
    }
}

impl GraphicsBackend for WgpuBackend {
    type Buffer = WgpuBuffer;
    type Uniform = WgpuUniform;
    type Program = WgpuProgram;

    fn create_vertex_buffer(&self, label: &str, data: &[f32]) -> WgpuBuffer {
        let raw = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::VERTEX,
        });
        WgpuBuffer { raw }
    }

    fn create_uniform(
        &self,
        program: &WgpuProgram,
        location: UniformLocation,
        value: &Mat4,
    ) -> Result<WgpuUniform, ShaderError> {
        let layout = program
            .group_layouts
            .get(location.group as usize)
            .ok_or_else(|| {
                ShaderError::MissingUniform(format!(
                    "@group({}) @binding({})",
                    location.group, location.binding
                ))
            })?;

        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pawn transform ubo"),
            contents: bytemuck::cast_slice(&value.to_cols_array()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pawn transform bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: location.binding,
                resource: buffer.as_entire_binding(),
            }],
        });

        Ok(WgpuUniform { buffer, bind_group })
    }

    fn write_uniform(&self, uniform: &WgpuUniform, value: &Mat4) {
        self.queue
            .write_buffer(&uniform.buffer, 0, bytemuck::cast_slice(&value.to_cols_array()));
    }

    fn link_program(
        &self,
        vertex: CompiledStage,
        fragment: CompiledStage,
        layout: &ProgramLayout,
    ) -> Result<WgpuProgram, ShaderError> {
        let limits = self.device.limits();

        let attributes = layout.attributes();
        if attributes.len() as u32 > limits.max_vertex_buffers {
            return Err(ShaderError::Link {
                diagnostic: format!(
                    "{} vertex inputs exceed the device limit of {} vertex buffers",
                    attributes.len(),
                    limits.max_vertex_buffers
                ),
            });
        }

        let per_group = uniforms_per_group(layout)?;
        if per_group.len() as u32 > limits.max_bind_groups {
            return Err(ShaderError::Link {
                diagnostic: format!(
                    "{} bind groups exceed the device limit of {}",
                    per_group.len(),
                    limits.max_bind_groups
                ),
            });
        }

        let group_layouts: Vec<wgpu::BindGroupLayout> = per_group
            .iter()
            .enumerate()
            .map(|(group, uniform)| self.create_group_layout(group, *uniform))
            .collect();

        let default_groups: Vec<wgpu::BindGroup> = per_group
            .iter()
            .zip(&group_layouts)
            .map(|(uniform, bgl)| self.create_default_group(bgl, *uniform))
            .collect();

        let vertex_attributes: Vec<[wgpu::VertexAttribute; 1]> = attributes
            .iter()
            .map(|a| {
                [wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: a.location,
                }]
            })
            .collect();
        let vertex_buffers: Vec<wgpu::VertexBufferLayout<'_>> = vertex_attributes
            .iter()
            .map(|attrs| wgpu::VertexBufferLayout {
                array_stride: VERTEX_STRIDE,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attrs,
            })
            .collect();

        let CompiledStage {
            source: vs_source,
            entry_point: vs_entry,
            ..
        } = vertex;
        let CompiledStage {
            source: fs_source,
            entry_point: fs_entry,
            ..
        } = fragment;

        // Module and pipeline validation happens inside wgpu; capture it
        // instead of letting the uncaptured-error handler panic.
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vs_module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pawn vertex shader"),
            source: wgpu::ShaderSource::Wgsl(vs_source.into()),
        });
        let fs_module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pawn fragment shader"),
            source: wgpu::ShaderSource::Wgsl(fs_source.into()),
        });

        let bgl_refs: Vec<&wgpu::BindGroupLayout> = group_layouts.iter().collect();
        let pipeline_layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pawn pipeline layout"),
            bind_group_layouts: &bgl_refs,
            immediate_size: 0,
        });

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pawn pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some(vs_entry.as_str()),
                compilation_options: Default::default(),
                buffers: &vertex_buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: Some(fs_entry.as_str()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        // Shader modules are only needed while the pipeline is created.
        drop(vs_module);
        drop(fs_module);

        pipeline_status(pollster::block_on(scope.pop()))?;

        Ok(WgpuProgram {
            pipeline,
            slots: attributes.iter().map(|a| a.location).collect(),
            group_layouts,
            default_groups,
        })
    }
}

impl WgpuBackend {
    fn create_group_layout(
        &self,
        group: usize,
        uniform: Option<&UniformBinding>,
    ) -> wgpu::BindGroupLayout {
        let entries: Vec<wgpu::BindGroupLayoutEntry> = uniform
            .into_iter()
            .map(|u| wgpu::BindGroupLayoutEntry {
                binding: u.location.binding,
                visibility: visibility(u),
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(MAT4_SIZE),
                },
                count: None,
            })
            .collect();

        self.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("pawn group {group} bgl")),
            entries: &entries,
        })
    }

    fn create_default_group(
        &self,
        layout: &wgpu::BindGroupLayout,
        uniform: Option<&UniformBinding>,
    ) -> wgpu::BindGroup {
        let Some(uniform) = uniform else {
            return self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("pawn empty bind group"),
                layout,
                entries: &[],
            });
        };

        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pawn identity ubo"),
            contents: bytemuck::cast_slice(&Mat4::IDENTITY.to_cols_array()),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pawn identity bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: uniform.location.binding,
                resource: buffer.as_entire_binding(),
            }],
        })
    }
}

/// Maps an error captured around pipeline creation to a link failure.
fn pipeline_status(error: Option<wgpu::Error>) -> Result<(), ShaderError> {
    let Some(error) = error else { return Ok(()) };
    let diagnostic = match error {
        wgpu::Error::Validation { description, .. } => description,
        other => other.to_string(),
    };
    log::error!("failed to link shader program: {diagnostic}");
    Err(ShaderError::Link { diagnostic })
}

/// Indexes uniforms by bind group, one uniform per group at most.
fn uniforms_per_group(layout: &ProgramLayout) -> Result<Vec<Option<&UniformBinding>>, ShaderError> {
    let count = layout
        .uniforms()
        .iter()
        .map(|u| u.location.group as usize + 1)
        .max()
        .unwrap_or(0);

    let mut per_group: Vec<Option<&UniformBinding>> = vec![None; count];
    for uniform in layout.uniforms() {
        let slot = &mut per_group[uniform.location.group as usize];
        if let Some(other) = slot {
            return Err(ShaderError::Link {
                diagnostic: format!(
                    "uniforms `{}` and `{}` share bind group {}; use one group per uniform",
                    other.name, uniform.name, uniform.location.group
                ),
            });
        }
        *slot = Some(uniform);
    }
    Ok(per_group)
}

fn visibility(uniform: &UniformBinding) -> wgpu::ShaderStages {
    let mut stages = wgpu::ShaderStages::NONE;
    if uniform.visible_in_vertex {
        stages |= wgpu::ShaderStages::VERTEX;
    }
    if uniform.visible_in_fragment {
        stages |= wgpu::ShaderStages::FRAGMENT;
    }
    if stages.is_empty() {
        wgpu::ShaderStages::VERTEX_FRAGMENT
    } else {
        stages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{compile_stage, parse_shader, Stage};
    use crate::testing::TEST_SHADER;

    fn layout_of(text: &str) -> ProgramLayout {
        let source = parse_shader(text).unwrap();
        let vs = compile_stage(Stage::Vertex, &source.vertex).unwrap();
        let fs = compile_stage(Stage::Fragment, &source.fragment).unwrap();
        ProgramLayout::reflect(&vs, &fs).unwrap()
    }

    #[test]
    fn transform_gets_group_zero() {
        let layout = layout_of(TEST_SHADER);
        let groups = uniforms_per_group(&layout).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].map(|u| u.name.as_str()), Some("transform"));
    }

    #[test]
    fn uniforms_sharing_a_group_are_rejected() {
        let text = r#"
#shader vertex
@group(0) @binding(0) var<uniform> model: mat4x4<f32>;
@group(0) @binding(1) var<uniform> view: mat4x4<f32>;

@vertex
fn vs_main(@location(0) inPosition: vec3<f32>) -> @builtin(position) vec4<f32> {
    return view * model * vec4<f32>(inPosition, 1.0);
}
#shader fragment
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0);
}
"#;
        let layout = layout_of(text);
        let err = uniforms_per_group(&layout).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
    }

    #[test]
    fn gaps_between_groups_are_kept() {
        let text = r#"
#shader vertex
@group(2) @binding(0) var<uniform> transform: mat4x4<f32>;

@vertex
fn vs_main(@location(0) inPosition: vec3<f32>) -> @builtin(position) vec4<f32> {
    return transform * vec4<f32>(inPosition, 1.0);
}
#shader fragment
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0);
}
"#;
        let layout = layout_of(text);
        let groups = uniforms_per_group(&layout).unwrap();
        assert_eq!(groups.len(), 3);
        assert!(groups[0].is_none() && groups[1].is_none());
        assert!(groups[2].is_some());
    }

    #[test]
    fn clean_pipeline_scope_links() {
        assert!(pipeline_status(None).is_ok());
    }

    #[test]
    fn pipeline_validation_error_becomes_link_error() {
        let error = wgpu::Error::Validation {
            source: Box::new(std::io::Error::other("color target mismatch")),
            description: "fragment output @location(0) does not match the color target".into(),
        };

        match pipeline_status(Some(error)) {
            Err(ShaderError::Link { diagnostic }) => {
                assert_eq!(
                    diagnostic,
                    "fragment output @location(0) does not match the color target"
                );
            }
            other => panic!("expected a link error, got {other:?}"),
        }
    }
}
