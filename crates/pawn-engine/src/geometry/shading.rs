use glam::Vec3;

/// Linear RGB triple, nominally in `[0, 1]`.
pub type Rgb = [f32; 3];

/// Length of the `(1, 1, 1)` reference vector used to normalize distances.
const REFERENCE_LENGTH: f32 = 1.732_050_8;

/// Per-vertex darkening factor: distance from the origin over `|(1, 1, 1)|`.
///
/// This is a cheap depth-style gradient, not a lighting model.
#[inline]
pub fn gradient_factor(position: Vec3) -> f32 {
    position.length() / REFERENCE_LENGTH
}

/// Derives one color per vertex of `positions` by darkening `base`.
///
/// Each channel becomes `base * (1 - gradient_factor)`. Results are not
/// clamped; vertices further than `|(1, 1, 1)|` from the origin produce
/// negative channels.
pub fn shade(positions: &[f32], base: Rgb) -> Vec<f32> {
    let mut colors = Vec::with_capacity(positions.len());

    for p in positions.chunks_exact(3) {
        let falloff = 1.0 - gradient_factor(Vec3::from_slice(p));
        colors.extend(base.iter().map(|c| c * falloff));
    }

    colors
}
