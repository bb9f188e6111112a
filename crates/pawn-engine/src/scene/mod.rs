//! Scene entities.
//!
//! Responsibilities:
//! - own per-shape attribute arrays and their GPU buffers (`Mesh`)
//! - express capabilities as traits: every shape is `Drawable`, some are `Rotatable`
//! - keep concrete shapes isolated per file under `scene::shapes`
//! - own shapes exclusively and drive them in insertion order (`Composition`)
//!
//! Extending the scene:
//! - add a new shape module under `scene::shapes::*`
//! - implement `Drawable` + `Shape` (and `Rotatable` if the shape spins)
//! - `Composition::add` accepts it without further changes

mod composition;
mod drawable;
mod mesh;
mod rotation;

pub mod shapes;

pub use composition::Composition;
pub use drawable::{Drawable, Shape};
pub use mesh::{Mesh, COLOR_ATTRIBUTE, NORMAL_ATTRIBUTE, POSITION_ATTRIBUTE};
pub use rotation::{Rotatable, Rotation, DEFAULT_PIVOT, ROTATION_STEP, TRANSFORM_UNIFORM};
pub use shapes::{CylinderParams, Sphere, SphereParams, StandingCylinder};
