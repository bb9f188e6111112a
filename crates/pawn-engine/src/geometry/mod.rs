//! CPU-side geometry.
//!
//! Responsibilities:
//! - tessellate parametric solids into flat triangle lists
//! - derive per-vertex colors from generated positions
//!
//! Everything here is pure and allocation-only; GPU upload happens in `scene`.
//!
//! Convention:
//! - attribute arrays are flat `f32` sequences grouped in triples (x, y, z / r, g, b)
//! - triangle lists are unindexed; shared edges duplicate their vertices

mod shading;
mod solids;

pub use shading::{gradient_factor, shade, Rgb};
pub use solids::{cylinder, sphere};

/// Number of floats per vertex in every attribute array.
pub const COMPONENTS: usize = 3;

/// Returns the number of whole vertices stored in a flat attribute array.
#[inline]
pub fn vertex_count(data: &[f32]) -> usize {
    data.len() / COMPONENTS
}
