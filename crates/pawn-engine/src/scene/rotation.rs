use glam::{Mat4, Vec3};

use crate::error::ShaderError;
use crate::render::{DrawPass, GraphicsBackend};
use crate::shader::{ShaderProgram, UniformLocation};

/// Angle, in radians, added by every [`Rotation::apply`].
pub const ROTATION_STEP: f32 = 0.001;

/// Pivot axis used when none is given.
pub const DEFAULT_PIVOT: Vec3 = Vec3::splat(0.3);

/// Program uniform receiving the transform.
pub const TRANSFORM_UNIFORM: &str = "transform";

/// Accumulated spin of one entity around a pivot axis.
///
/// The transform starts as identity and is post-multiplied by a
/// [`ROTATION_STEP`] rotation about the (normalized) pivot on each
/// [`apply`](Self::apply). It is never reset or wrapped.
pub struct Rotation<B: GraphicsBackend> {
    transform: Mat4,
    pivot: Vec3,
    uniform: Option<(UniformLocation, B::Uniform)>,
}

impl<B: GraphicsBackend> Rotation<B> {
    #[inline]
    pub fn new() -> Self {
        Self::with_pivot(DEFAULT_PIVOT)
    }

    #[inline]
    pub fn with_pivot(pivot: Vec3) -> Self {
        Self {
            transform: Mat4::IDENTITY,
            pivot,
            uniform: None,
        }
    }

    #[inline]
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    #[inline]
    pub fn pivot(&self) -> Vec3 {
        self.pivot
    }

    #[inline]
    pub fn set_pivot(&mut self, pivot: Vec3) {
        self.pivot = pivot;
    }

    /// Copy of the transform and pivot without the uniform slot.
    pub fn detached(&self) -> Self {
        Self {
            transform: self.transform,
            pivot: self.pivot,
            uniform: None,
        }
    }

    /// Returns `true` once a uniform slot has been created by [`init`](Self::init).
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.uniform.is_some()
    }

    /// Resolves the program's `transform` uniform, creates a slot for it, and
    /// uploads the current transform.
    ///
    /// Calling this again replaces (and releases) the previous slot.
    pub fn init(&mut self, gpu: &B, program: &ShaderProgram<B>) -> Result<(), ShaderError> {
        let location = program
            .uniform_location(TRANSFORM_UNIFORM)
            .ok_or_else(|| ShaderError::MissingUniform(TRANSFORM_UNIFORM.to_owned()))?;

        let uniform = gpu.create_uniform(program.raw(), location, &self.transform)?;
        self.uniform = Some((location, uniform));
        Ok(())
    }

    /// Advances by one step and uploads the new transform, if initialized.
    pub fn apply(&mut self, gpu: &B) {
        self.advance();
        if let Some((_, uniform)) = &self.uniform {
            gpu.write_uniform(uniform, &self.transform);
        }
    }

    /// Advances by one step without touching the GPU.
    ///
    /// A zero pivot has no axis; the transform is left unchanged.
    pub fn advance(&mut self) {
        if let Some(axis) = self.pivot.try_normalize() {
            self.transform *= Mat4::from_axis_angle(axis, ROTATION_STEP);
        }
    }

    /// Binds the uniform slot into `pass`, if initialized.
    pub fn bind(&self, pass: &mut dyn DrawPass<B>) {
        if let Some((location, uniform)) = &self.uniform {
            pass.bind_uniform(*location, uniform);
        }
    }
}

impl<B: GraphicsBackend> Default for Rotation<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Capability of spinning around a pivot.
///
/// Implementors only expose their [`Rotation`]; the behaviour is provided.
pub trait Rotatable<B: GraphicsBackend> {
    fn rotation(&self) -> &Rotation<B>;
    fn rotation_mut(&mut self) -> &mut Rotation<B>;

    fn init_rotation(&mut self, gpu: &B, program: &ShaderProgram<B>) -> Result<(), ShaderError> {
        self.rotation_mut().init(gpu, program)
    }

    fn apply_rotation(&mut self, gpu: &B) {
        self.rotation_mut().apply(gpu);
    }

    fn set_pivot(&mut self, pivot: Vec3) {
        self.rotation_mut().set_pivot(pivot);
    }

    fn pivot(&self) -> Vec3 {
        self.rotation().pivot()
    }

    fn transform(&self) -> Mat4 {
        self.rotation().transform()
    }
}
