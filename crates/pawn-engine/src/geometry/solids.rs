use std::f32::consts::PI;

use glam::Vec3;

/// Tessellates a sphere on a latitude/longitude grid.
///
/// `layer_quality` slices the azimuth range `[0, 2π)`, `density_quality` slices
/// the polar range `[0, π]`. Every grid cell yields two triangles, so the result
/// holds `layer_quality * density_quality * 6` vertices.
///
/// Pole vertices are not merged; the degenerate triangles at both poles are
/// emitted as-is.
pub fn sphere(center: Vec3, radius: f32, layer_quality: u32, density_quality: u32) -> Vec<f32> {
    let cells = layer_quality as usize * density_quality as usize;
    let mut out = Vec::with_capacity(cells * 6 * 3);

    let point = |i: u32, j: u32| -> Vec3 {
        let theta = 2.0 * PI * i as f32 / layer_quality as f32;
        let phi = j as f32 / density_quality as f32 * PI;
        center + radius * Vec3::new(theta.cos() * phi.sin(), theta.sin() * phi.sin(), phi.cos())
    };

    for i in 0..layer_quality {
        for j in 0..density_quality {
            let p1 = point(i, j);
            let p2 = point(i + 1, j);
            let p3 = point(i, j + 1);
            let p4 = point(i + 1, j + 1);

            push_triangle(&mut out, p1, p2, p3);
            push_triangle(&mut out, p1, p2, p4);
        }
    }

    out
}

/// Tessellates an upright cylinder standing on `base`.
///
/// Layout of the output, in order:
/// 1. bottom cap: `circle_quality` triangles fanned around `base`
/// 2. top cap: the same fan lifted by `height`
/// 3. side wall: `side_quality` quads, two triangles each
///
/// Total vertex count is `circle_quality * 3 * 2 + side_quality * 6`.
pub fn cylinder(
    base: Vec3,
    radius: f32,
    height: f32,
    circle_quality: u32,
    side_quality: u32,
) -> Vec<f32> {
    let mut out =
        Vec::with_capacity((circle_quality as usize * 3 * 2 + side_quality as usize * 6) * 3);

    let rim = |i: u32, segments: u32, y: f32| -> Vec3 {
        let angle = 2.0 * PI * i as f32 / segments as f32;
        Vec3::new(base.x + radius * angle.cos(), y, base.z + radius * angle.sin())
    };

    let bottom = base.y;
    let top = base.y + height;

    for y in [bottom, top] {
        let hub = Vec3::new(base.x, y, base.z);
        for i in 0..circle_quality {
            push_triangle(
                &mut out,
                rim(i, circle_quality, y),
                rim(i + 1, circle_quality, y),
                hub,
            );
        }
    }

    for i in 0..side_quality {
        let b0 = rim(i, side_quality, bottom);
        let b1 = rim(i + 1, side_quality, bottom);
        let t0 = rim(i, side_quality, top);
        let t1 = rim(i + 1, side_quality, top);

        push_triangle(&mut out, b0, b1, t0);
        push_triangle(&mut out, b1, t1, t0);
    }

    out
}

#[inline]
fn push_triangle(out: &mut Vec<f32>, a: Vec3, b: Vec3, c: Vec3) {
    out.extend_from_slice(&a.to_array());
    out.extend_from_slice(&b.to_array());
    out.extend_from_slice(&c.to_array());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(data: &[f32]) -> impl Iterator<Item = Vec3> + '_ {
        data.chunks_exact(3).map(Vec3::from_slice)
    }

    // ── sphere ────────────────────────────────────────────────────────────

    #[test]
    fn sphere_length_matches_quality_grid() {
        for (l, d) in [(1, 1), (3, 5), (20, 20), (7, 2)] {
            let data = sphere(Vec3::ZERO, 1.0, l, d);
            assert_eq!(data.len(), (l * d * 6 * 3) as usize, "quality {l}x{d}");
        }
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let center = Vec3::new(0.0, 0.5, 0.0);
        let data = sphere(center, 0.2, 12, 9);
        for p in points(&data) {
            assert!((p.distance(center) - 0.2).abs() < 1e-5, "vertex {p} off the surface");
        }
    }

    #[test]
    fn sphere_keeps_degenerate_pole_triangles() {
        // j = 0 puts p1 and p2 on the north pole.
        let data = sphere(Vec3::ZERO, 1.0, 4, 4);
        let first: Vec<Vec3> = points(&data).take(2).collect();
        assert!(first[0].distance(first[1]) < 1e-6);
        assert!((first[0] - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn sphere_zero_quality_is_empty() {
        assert!(sphere(Vec3::ZERO, 1.0, 0, 10).is_empty());
        assert!(sphere(Vec3::ZERO, 1.0, 10, 0).is_empty());
    }

    // ── cylinder ──────────────────────────────────────────────────────────

    #[test]
    fn cylinder_length_matches_fans_plus_wall() {
        for (c, s) in [(1, 1), (20, 20), (8, 3), (3, 16)] {
            let data = cylinder(Vec3::ZERO, 1.0, 2.0, c, s);
            assert_eq!(data.len(), (c * 3 * 3 * 2 + s * 6 * 3) as usize, "quality {c}x{s}");
        }
    }

    #[test]
    fn cylinder_caps_sit_at_base_and_top() {
        let base = Vec3::new(0.0, -0.35, 0.0);
        let data = cylinder(base, 0.15, 0.4, 10, 10);
        let verts: Vec<Vec3> = points(&data).collect();

        let (bottom, rest) = verts.split_at(10 * 3);
        let (top, _) = rest.split_at(10 * 3);

        assert!(bottom.iter().all(|p| (p.y - -0.35).abs() < 1e-6));
        assert!(top.iter().all(|p| (p.y - 0.05).abs() < 1e-6));
        // Every third vertex of a fan is the hub.
        assert_eq!(bottom[2], Vec3::new(0.0, -0.35, 0.0));
    }

    #[test]
    fn cylinder_wall_stays_on_radius() {
        let base = Vec3::new(1.0, 0.0, -1.0);
        let data = cylinder(base, 0.25, 0.2, 6, 9);
        let wall = points(&data).skip(6 * 3 * 2);
        for p in wall {
            let radial = Vec3::new(p.x - base.x, 0.0, p.z - base.z).length();
            assert!((radial - 0.25).abs() < 1e-5);
            assert!(p.y >= -1e-6 && p.y <= 0.2 + 1e-6);
        }
    }

    #[test]
    fn cylinder_zero_quality_is_empty() {
        assert!(cylinder(Vec3::ZERO, 1.0, 1.0, 0, 0).is_empty());
        assert_eq!(cylinder(Vec3::ZERO, 1.0, 1.0, 0, 2).len(), 2 * 6 * 3);
    }
}
