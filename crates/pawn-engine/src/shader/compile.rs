use std::fmt;

use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::error::ShaderError;

/// Programmable pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    #[inline]
    pub(crate) fn naga(self) -> naga::ShaderStage {
        match self {
            Stage::Vertex => naga::ShaderStage::Vertex,
            Stage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
        })
    }
}

/// A parsed and validated single-stage WGSL module.
///
/// Consumed by linking; backends keep whatever native object they build from it.
#[derive(Debug)]
pub struct CompiledStage {
    pub stage: Stage,
    pub source: String,
    pub module: naga::Module,
    pub entry_point: String,
    entry_index: usize,
}

impl CompiledStage {
    #[inline]
    pub(crate) fn entry(&self) -> &naga::EntryPoint {
        &self.module.entry_points[self.entry_index]
    }
}

/// Parses and validates one stage.
///
/// Failures are logged with the compiler diagnostic and returned; callers must
/// not link a program from a stage that failed here.
pub fn compile_stage(stage: Stage, source: &str) -> Result<CompiledStage, ShaderError> {
    let compiled = parse_and_validate(stage, source).and_then(|module| {
        let entry_index = module
            .entry_points
            .iter()
            .position(|ep| ep.stage == stage.naga())
            .ok_or(ShaderError::MissingEntryPoint { stage })?;

        Ok(CompiledStage {
            stage,
            source: source.to_owned(),
            entry_point: module.entry_points[entry_index].name.clone(),
            module,
            entry_index,
        })
    });

    match &compiled {
        Ok(c) => log::debug!("compiled {stage} shader (entry point `{}`)", c.entry_point),
        Err(ShaderError::Compile { diagnostic, .. }) => {
            log::error!("failed to compile {stage} shader\n{diagnostic}")
        }
        Err(e) => log::error!("{e}"),
    }

    compiled
}

fn parse_and_validate(stage: Stage, source: &str) -> Result<naga::Module, ShaderError> {
    let failed = |diagnostic: String| ShaderError::Compile { stage, diagnostic };

    let module = naga::front::wgsl::parse_str(source).map_err(|e| failed(e.emit_to_string(source)))?;

    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|e| failed(e.emit_to_string(source)))?;

    Ok(module)
}

/// A user-defined (`@location`) input or output of an entry point.
pub(super) struct Located<'m> {
    pub name: Option<&'m str>,
    pub location: u32,
    pub inner: &'m naga::TypeInner,
}

/// Collects located bindings reachable from one argument or result.
///
/// Struct-typed values without a binding contribute their members.
pub(super) fn collect_locations<'m>(
    module: &'m naga::Module,
    name: Option<&'m str>,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut Vec<Located<'m>>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => out.push(Located {
            name,
            location: *location,
            inner: &module.types[ty].inner,
        }),
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    collect_locations(module, m.name.as_deref(), m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

/// Checks that every fragment input is written by the vertex stage with the
/// same type.
///
/// This is the link-time half of program creation that does not need a GPU.
pub fn check_interface(vertex: &CompiledStage, fragment: &CompiledStage) -> Result<(), ShaderError> {
    let mut outputs = Vec::new();
    if let Some(result) = &vertex.entry().function.result {
        collect_locations(&vertex.module, None, result.ty, result.binding.as_ref(), &mut outputs);
    }

    let mut inputs = Vec::new();
    for arg in &fragment.entry().function.arguments {
        collect_locations(
            &fragment.module,
            arg.name.as_deref(),
            arg.ty,
            arg.binding.as_ref(),
            &mut inputs,
        );
    }

    for input in &inputs {
        let label = input.name.unwrap_or("<unnamed>");
        let Some(output) = outputs.iter().find(|o| o.location == input.location) else {
            return Err(ShaderError::Link {
                diagnostic: format!(
                    "fragment input `{label}` at location {} is not written by the vertex stage",
                    input.location
                ),
            });
        };

        if output.inner != input.inner {
            return Err(ShaderError::Link {
                diagnostic: format!(
                    "location {}: vertex stage writes {:?}, fragment input `{label}` reads {:?}",
                    input.location, output.inner, input.inner
                ),
            });
        }
    }

    Ok(())
}
