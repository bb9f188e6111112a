//! The hardcoded pawn: one sphere head on four stacked cylinders.

use glam::Vec3;
use pawn_engine::MeshError;
use pawn_engine::geometry::Rgb;
use pawn_engine::render::GraphicsBackend;
use pawn_engine::scene::{Composition, CylinderParams, Sphere, SphereParams, StandingCylinder};

pub const PAWN_COLOR: Rgb = [0.5, 0.5, 0.5];

/// `(base, radius, height)` of each cylinder, top to bottom.
const BODY: [(Vec3, f32, f32); 4] = [
    (Vec3::new(0.0, 0.05, 0.0), 0.1, 0.4),
    (Vec3::new(0.0, 0.25, 0.0), 0.2, 0.05),
    (Vec3::new(0.0, -0.35, 0.0), 0.15, 0.4),
    (Vec3::new(0.0, -0.5, 0.0), 0.25, 0.2),
];

pub fn build<B: GraphicsBackend + 'static>(gpu: &B) -> Result<Composition<B>, MeshError> {
    let mut pawn = Composition::new();

    let head = SphereParams::new(Vec3::new(0.0, 0.5, 0.0), 0.2).color(PAWN_COLOR);
    pawn.add(Sphere::new(gpu, head)?);

    for (base, radius, height) in BODY {
        let params = CylinderParams::new(base, radius, height).color(PAWN_COLOR);
        pawn.add(StandingCylinder::new(gpu, params)?);
    }

    log::info!(
        "pawn built: {} shapes, largest has {} vertices",
        pawn.len(),
        pawn.max_vertex_count()
    );
    Ok(pawn)
}
