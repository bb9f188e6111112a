//! Concrete shapes.
//!
//! Each shape owns a [`Mesh`](super::Mesh) generated from its parameters
//! and a [`Rotation`](super::Rotation).

mod cylinder;
mod sphere;

pub use cylinder::{CylinderParams, StandingCylinder};
pub use sphere::{Sphere, SphereParams};

use crate::error::MeshError;
use crate::geometry::{self, Rgb};
use crate::render::GraphicsBackend;

use super::Mesh;

/// Default tessellation along each generation axis.
pub const DEFAULT_QUALITY: u32 = 20;

/// Uploads generated positions plus the optional color and normal arrays.
fn build_mesh<B: GraphicsBackend>(
    gpu: &B,
    label: &'static str,
    positions: Vec<f32>,
    color: Option<Rgb>,
    normals: Option<Vec<f32>>,
) -> Result<Mesh<B>, MeshError> {
    let colors = color.map(|c| geometry::shade(&positions, c));

    let mut mesh = Mesh::new(label);
    mesh.upload_positions(gpu, positions)?;
    if let Some(colors) = colors {
        mesh.upload_colors(gpu, colors)?;
    }
    if let Some(normals) = normals {
        mesh.upload_normals(gpu, normals)?;
    }

    log::debug!("{label}: {} vertices uploaded", mesh.vertex_count());
    Ok(mesh)
}
