use glam::Vec3;

use crate::error::MeshError;
use crate::geometry::{self, Rgb};
use crate::render::{DrawPass, GraphicsBackend};
use crate::scene::{Drawable, Mesh, Rotatable, Rotation, Shape};
use crate::shader::ShaderProgram;

use super::{build_mesh, DEFAULT_QUALITY};

/// Generation parameters for a [`StandingCylinder`].
#[derive(Debug, Clone, PartialEq)]
pub struct CylinderParams {
    /// Center of the bottom cap.
    pub base: Vec3,
    pub radius: f32,
    /// Extent along +Y.
    pub height: f32,
    pub circle_quality: u32,
    pub side_quality: u32,
    pub color: Option<Rgb>,
    pub normals: Option<Vec<f32>>,
}

impl CylinderParams {
    pub fn new(base: Vec3, radius: f32, height: f32) -> Self {
        Self {
            base,
            radius,
            height,
            circle_quality: DEFAULT_QUALITY,
            side_quality: DEFAULT_QUALITY,
            color: None,
            normals: None,
        }
    }

    pub fn quality(mut self, circle_quality: u32, side_quality: u32) -> Self {
        self.circle_quality = circle_quality;
        self.side_quality = side_quality;
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

/// A capped cylinder whose axis is parallel to Y.
pub struct StandingCylinder<B: GraphicsBackend> {
    params: CylinderParams,
    mesh: Mesh<B>,
    rotation: Rotation<B>,
}

impl<B: GraphicsBackend> StandingCylinder<B> {
    pub fn new(gpu: &B, params: CylinderParams) -> Result<Self, MeshError> {
        let positions = geometry::cylinder(
            params.base,
            params.radius,
            params.height,
            params.circle_quality,
            params.side_quality,
        );
        let mesh = build_mesh(gpu, "cylinder", positions, params.color, params.normals.clone())?;

        Ok(Self {
            params,
            mesh,
            rotation: Rotation::new(),
        })
    }

    /// See [`Sphere::duplicate`](super::Sphere::duplicate).
    pub fn duplicate(&self, gpu: &B) -> Self {
        Self {
            params: self.params.clone(),
            mesh: self.mesh.duplicate(gpu),
            rotation: self.rotation.detached(),
        }
    }

    #[inline]
    pub fn params(&self) -> &CylinderParams {
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

impl<B: GraphicsBackend> Drawable<B> for StandingCylinder<B> {
    fn draw(&self, program: &ShaderProgram<B>, pass: &mut dyn DrawPass<B>) {
        self.rotation.bind(pass);
        self.mesh.draw(program, pass);
    }

    fn vertex_count(&self) -> u32 {
        self.mesh.vertex_count()
    }
}

impl<B: GraphicsBackend> Rotatable<B> for StandingCylinder<B> {
    fn rotation(&self) -> &Rotation<B> {
        &self.rotation
    }

    fn rotation_mut(&mut self) -> &mut Rotation<B> {
        &mut self.rotation
    }
}

impl<B: GraphicsBackend> Shape<B> for StandingCylinder<B> {
    fn as_rotatable(&self) -> Option<&dyn Rotatable<B>> {
        Some(self)
    }

    fn as_rotatable_mut(&mut self) -> Option<&mut dyn Rotatable<B>> {
        Some(self)
    }
}
