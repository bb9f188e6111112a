use naga::{AddressSpace, Scalar, TypeInner, VectorSize};

use crate::error::ShaderError;

use super::compile::{collect_locations, CompiledStage};
use super::Stage;

/// A named vertex input and its shader location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeBinding {
    pub name: String,
    pub location: u32,
}

/// Where a uniform lives: bind group index + binding index.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UniformLocation {
    pub group: u32,
    pub binding: u32,
}

/// A named `mat4x4<f32>` uniform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformBinding {
    pub name: String,
    pub location: UniformLocation,
    pub visible_in_vertex: bool,
    pub visible_in_fragment: bool,
}

/// Reflected interface of a program: the lookup tables behind
/// "attribute location by name" and "uniform location by name".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramLayout {
    attributes: Vec<AttributeBinding>,
    uniforms: Vec<UniformBinding>,
}

impl ProgramLayout {
    /// Reflects vertex inputs from the vertex entry point and uniforms from
    /// both stages.
    ///
    /// Vertex inputs must be `vec3<f32>` and uniforms `mat4x4<f32>`; those are
    /// the only attribute and uniform shapes the scene produces.
    pub fn reflect(vertex: &CompiledStage, fragment: &CompiledStage) -> Result<Self, ShaderError> {
        let mut located = Vec::new();
        for arg in &vertex.entry().function.arguments {
            collect_locations(
                &vertex.module,
                arg.name.as_deref(),
                arg.ty,
                arg.binding.as_ref(),
                &mut located,
            );
        }

        let mut attributes = Vec::with_capacity(located.len());
        for input in located {
            let name = input.name.unwrap_or_default().to_owned();
            if !is_vec3_f32(input.inner) {
                return Err(ShaderError::UnsupportedAttribute { name });
            }
            attributes.push(AttributeBinding {
                name,
                location: input.location,
            });
        }
        attributes.sort_by_key(|a| a.location);

        let mut layout = Self {
            attributes,
            uniforms: Vec::new(),
        };
        layout.collect_uniforms(vertex)?;
        layout.collect_uniforms(fragment)?;

        log::debug!(
            "reflected {} attribute(s), {} uniform(s)",
            layout.attributes.len(),
            layout.uniforms.len()
        );
        Ok(layout)
    }

    fn collect_uniforms(&mut self, stage: &CompiledStage) -> Result<(), ShaderError> {
        for (_, var) in stage.module.global_variables.iter() {
            if var.space != AddressSpace::Uniform {
                continue;
            }
            let (Some(name), Some(rb)) = (var.name.as_deref(), var.binding.as_ref()) else {
                continue;
            };

            if !is_mat4_f32(&stage.module.types[var.ty].inner) {
                return Err(ShaderError::UnsupportedUniform { name: name.to_owned() });
            }

            let location = UniformLocation {
                group: rb.group,
                binding: rb.binding,
            };

            let index = match self.uniforms.iter().position(|u| u.name == name) {
                Some(i) => i,
                None => {
                    self.uniforms.push(UniformBinding {
                        name: name.to_owned(),
                        location,
                        visible_in_vertex: false,
                        visible_in_fragment: false,
                    });
                    self.uniforms.len() - 1
                }
            };

            let entry = &mut self.uniforms[index];
            match stage.stage {
                Stage::Vertex => entry.visible_in_vertex = true,
                Stage::Fragment => entry.visible_in_fragment = true,
            }
        }
        Ok(())
    }

    /// Vertex inputs ordered by location.
    #[inline]
    pub fn attributes(&self) -> &[AttributeBinding] {
        &self.attributes
    }

    #[inline]
    pub fn uniforms(&self) -> &[UniformBinding] {
        &self.uniforms
    }

    /// Shader location of the vertex input called `name`, if declared.
    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.location)
    }

    /// Group/binding of the uniform called `name`, if declared.
    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.uniforms
            .iter()
            .find(|u| u.name == name)
            .map(|u| u.location)
    }
}

fn is_vec3_f32(inner: &TypeInner) -> bool {
    matches!(
        inner,
        TypeInner::Vector { size: VectorSize::Tri, scalar } if *scalar == Scalar::F32
    )
}

fn is_mat4_f32(inner: &TypeInner) -> bool {
    matches!(
        inner,
        TypeInner::Matrix { columns: VectorSize::Quad, rows: VectorSize::Quad, scalar }
            if *scalar == Scalar::F32
    )
}
