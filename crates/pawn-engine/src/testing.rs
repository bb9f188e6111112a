//! Test doubles for the graphics seam.
//!
//! `RecordingBackend` hands out numbered buffers/uniforms and logs their
//! creation, writes, and release; `RecordingPass` logs draw-time calls.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Mat4;

use crate::error::ShaderError;
use crate::render::{DrawPass, GraphicsBackend};
use crate::shader::{CompiledStage, ProgramLayout, ShaderProgram, UniformLocation, parse_shader};

/// Same interface as the bundled pawn shader.
pub(crate) const TEST_SHADER: &str = r#"
#shader vertex
@group(0) @binding(0)
var<uniform> transform: mat4x4<f32>;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
};

@vertex
fn vs_main(
    @location(0) inPosition: vec3<f32>,
    @location(1) inColor: vec3<f32>,
    @location(2) inNormal: vec3<f32>,
) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = transform * vec4<f32>(inPosition, 1.0);
    out.color = inColor + inNormal * 0.0;
    return out;
}

#shader fragment
@fragment
fn fs_main(@location(0) color: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(color, 1.0);
}
"#;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BackendEvent {
    CreateBuffer { id: u32, label: String, floats: usize },
    ReleaseBuffer { id: u32 },
    CreateUniform { id: u32, location: UniformLocation, value: Mat4 },
    WriteUniform { id: u32, value: Mat4 },
    LinkProgram,
}

type Log = Rc<RefCell<Vec<BackendEvent>>>;

#[derive(Default)]
pub(crate) struct RecordingBackend {
    log: Log,
    next_id: Cell<u32>,
}

impl RecordingBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn events(&self) -> Vec<BackendEvent> {
        self.log.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    fn next_id(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn push(&self, event: BackendEvent) {
        self.log.borrow_mut().push(event);
    }
}

pub(crate) struct RecordedBuffer {
    pub id: u32,
    pub data: Vec<f32>,
    log: Log,
}

impl Drop for RecordedBuffer {
    fn drop(&mut self) {
        self.log.borrow_mut().push(BackendEvent::ReleaseBuffer { id: self.id });
    }
}

#[derive(Debug)]
pub(crate) struct RecordedUniform {
    pub id: u32,
}

pub(crate) struct RecordedProgram;

impl GraphicsBackend for RecordingBackend {
    type Buffer = RecordedBuffer;
    type Uniform = RecordedUniform;
    type Program = RecordedProgram;

    fn create_vertex_buffer(&self, label: &str, data: &[f32]) -> RecordedBuffer {
        let id = self.next_id();
        self.push(BackendEvent::CreateBuffer {
            id,
            label: label.to_owned(),
            floats: data.len(),
        });
        RecordedBuffer {
            id,
            data: data.to_vec(),
            log: Rc::clone(&self.log),
        }
    }

    fn create_uniform(
        &self,
        _program: &RecordedProgram,
        location: UniformLocation,
        value: &Mat4,
    ) -> Result<RecordedUniform, ShaderError> {
        let id = self.next_id();
        self.push(BackendEvent::CreateUniform {
            id,
            location,
            value: *value,
        });
        Ok(RecordedUniform { id })
    }

    fn write_uniform(&self, uniform: &RecordedUniform, value: &Mat4) {
        self.push(BackendEvent::WriteUniform {
            id: uniform.id,
            value: *value,
        });
    }

    fn link_program(
        &self,
        _vertex: CompiledStage,
        _fragment: CompiledStage,
        _layout: &ProgramLayout,
    ) -> Result<RecordedProgram, ShaderError> {
        self.push(BackendEvent::LinkProgram);
        Ok(RecordedProgram)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PassEvent {
    Enable { location: u32, buffer: u32 },
    Disable { location: u32 },
    BindUniform { location: UniformLocation, uniform: u32 },
    Draw { vertices: u32 },
}

#[derive(Debug, Default)]
pub(crate) struct RecordingPass {
    pub events: Vec<PassEvent>,
}

impl RecordingPass {
    pub(crate) fn draws(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PassEvent::Draw { vertices } => Some(*vertices),
                _ => None,
            })
            .collect()
    }
}

impl DrawPass<RecordingBackend> for RecordingPass {
    fn enable_attribute(&mut self, location: u32, buffer: &RecordedBuffer) {
        self.events.push(PassEvent::Enable {
            location,
            buffer: buffer.id,
        });
    }

    fn disable_attribute(&mut self, location: u32) {
        self.events.push(PassEvent::Disable { location });
    }

    fn bind_uniform(&mut self, location: UniformLocation, uniform: &RecordedUniform) {
        self.events.push(PassEvent::BindUniform {
            location,
            uniform: uniform.id,
        });
    }

    fn draw_triangles(&mut self, vertex_count: u32) {
        self.events.push(PassEvent::Draw {
            vertices: vertex_count,
        });
    }
}

/// Links [`TEST_SHADER`] against `gpu` and clears the link event.
pub(crate) fn test_program(gpu: &RecordingBackend) -> ShaderProgram<RecordingBackend> {
    let source = parse_shader(TEST_SHADER).expect("test shader splits");
    let program = match ShaderProgram::create(gpu, &source) {
        Ok(p) => p,
        Err(e) => panic!("test shader failed: {e}"),
    };
    gpu.clear();
    program
}
