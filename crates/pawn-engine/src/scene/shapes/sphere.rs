use glam::Vec3;

use crate::error::MeshError;
use crate::geometry::{self, Rgb};
use crate::render::{DrawPass, GraphicsBackend};
use crate::scene::{Drawable, Mesh, Rotatable, Rotation, Shape};
use crate::shader::ShaderProgram;

use super::{build_mesh, DEFAULT_QUALITY};

/// Generation parameters for a [`Sphere`].
#[derive(Debug, Clone, PartialEq)]
pub struct SphereParams {
    pub center: Vec3,
    pub radius: f32,
    /// Slices around the polar axis.
    pub layer_quality: u32,
    /// Bands from pole to pole.
    pub density_quality: u32,
    /// Base color shaded per vertex; `None` uploads no color buffer.
    pub color: Option<Rgb>,
    /// Must hold one normal per generated vertex.
    pub normals: Option<Vec<f32>>,
}

impl SphereParams {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            layer_quality: DEFAULT_QUALITY,
            density_quality: DEFAULT_QUALITY,
            color: None,
            normals: None,
        }
    }

    pub fn quality(mut self, layer_quality: u32, density_quality: u32) -> Self {
        self.layer_quality = layer_quality;
        self.density_quality = density_quality;
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    pub fn normals(mut self, normals: Vec<f32>) -> Self {
        self.normals = Some(normals);
        self
    }
}

/// A tessellated sphere that spins around its pivot.
pub struct Sphere<B: GraphicsBackend> {
    params: SphereParams,
    mesh: Mesh<B>,
    rotation: Rotation<B>,
}

impl<B: GraphicsBackend> Sphere<B> {
    pub fn new(gpu: &B, params: SphereParams) -> Result<Self, MeshError> {
        let positions = geometry::sphere(
            params.center,
            params.radius,
            params.layer_quality,
            params.density_quality,
        );
        let mesh = build_mesh(gpu, "sphere", positions, params.color, params.normals.clone())?;

        Ok(Self {
            params,
            mesh,
            rotation: Rotation::new(),
        })
    }

    /// Independent copy with its own buffers.
    ///
    /// The rotation keeps its transform and pivot but has no uniform slot;
    /// call [`Rotatable::init_rotation`] on the copy.
    pub fn duplicate(&self, gpu: &B) -> Self {
        Self {
            params: self.params.clone(),
            mesh: self.mesh.duplicate(gpu),
            rotation: self.rotation.detached(),
        }
    }

    #[inline]
    pub fn params(&self) -> &SphereParams {
        &self.params
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh<B> {
        &self.mesh
    }

    #[inline]
    pub fn mesh_mut(&mut self) -> &mut Mesh<B> {
        &mut self.mesh
    }
}

impl<B: GraphicsBackend> Drawable<B> for Sphere<B> {
    fn draw(&self, program: &ShaderProgram<B>, pass: &mut dyn DrawPass<B>) {
        self.rotation.bind(pass);
        self.mesh.draw(program, pass);
    }

    fn vertex_count(&self) -> u32 {
        self.mesh.vertex_count()
    }
}

impl<B: GraphicsBackend> Rotatable<B> for Sphere<B> {
    fn rotation(&self) -> &Rotation<B> {
        &self.rotation
    }

    fn rotation_mut(&mut self) -> &mut Rotation<B> {
        &mut self.rotation
    }
}

impl<B: GraphicsBackend> Shape<B> for Sphere<B> {
    fn as_rotatable(&self) -> Option<&dyn Rotatable<B>> {
        Some(self)
    }

    fn as_rotatable_mut(&mut self) -> Option<&mut dyn Rotatable<B>> {
        Some(self)
    }
}
