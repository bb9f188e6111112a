use crate::render::{DrawPass, GraphicsBackend};
use crate::shader::ShaderProgram;

use super::Rotatable;

/// Anything that can issue its own draw into a pass.
pub trait Drawable<B: GraphicsBackend> {
    /// Binds this entity's buffers to `program`'s attributes and draws it.
    ///
    /// Bindings made here must not outlive the call.
    fn draw(&self, program: &ShaderProgram<B>, pass: &mut dyn DrawPass<B>);

    /// Number of vertices covered by one draw.
    fn vertex_count(&self) -> u32;
}

/// A scene member. Optional capabilities are queried, not assumed.
pub trait Shape<B: GraphicsBackend>: Drawable<B> {
    /// Returns the rotation capability, if this shape has one.
    fn as_rotatable(&self) -> Option<&dyn Rotatable<B>> {
        None
    }

    fn as_rotatable_mut(&mut self) -> Option<&mut dyn Rotatable<B>> {
        None
    }
}
