use std::f64::consts::TAU;

use crate::math::mesh::WireMesh;

const A: f64 = 1.0;
const B: f64 = 2.0;
const N: f64 = 2.0;

pub const U_RANGE: (f64, f64) = (0.0, TAU);
pub const V_RANGE: (f64, f64) = (0.2, 1.0);

pub const DEFAULT_STEPS_U: usize = 80;
pub const DEFAULT_STEPS_V: usize = 10;

/// Point on the twisted tube surface at parameters `(u, v)`.
pub fn point(u: f64, v: f64) -> [f64; 3] {
    let radius = A + B * (N * u).sin();
    let (sin_u, cos_u) = u.sin_cos();

    [
        radius * cos_u - v * sin_u,
        radius * sin_u + v * cos_u,
        B * (N * u).cos(),
    ]
}

/// `i`-th of `steps + 1` evenly spaced samples over `range`, endpoints included.
///
/// The last sample is the range maximum exactly, so the topology never
/// depends on rounding in the step arithmetic.
fn sample(range: (f64, f64), steps: usize, i: usize) -> f64 {
    if i >= steps {
        range.1
    } else {
        range.0 + (range.1 - range.0) * i as f64 / steps as f64
    }
}

/// Vertices `tessellate` emits at this resolution, breaks included, or
/// `None` when the count overflows `usize`.
pub fn vertex_count(steps_u: usize, steps_v: usize) -> Option<usize> {
    let steps_u = steps_u.max(1);
    let steps_v = steps_v.max(1);

    let u_lines = steps_u.checked_add(1)?.checked_mul(steps_v.checked_add(2)?)?;
    let v_lines = steps_v.checked_add(1)?.checked_mul(steps_u.checked_add(3)?)?;
    u_lines.checked_add(v_lines)
}

fn to_f32(p: [f64; 3]) -> [f32; 3] {
    [p[0] as f32, p[1] as f32, p[2] as f32]
}

/// Wireframe of the surface as a single break-separated line strip.
///
/// Emits one polyline per u sample (v swept min to max), then one closed
/// polyline per v sample (u swept over the full turn, first point repeated).
/// A step count of zero is treated as one. Step counts are expected to have
/// passed config validation, which bounds [`vertex_count`].
pub fn tessellate(steps_u: usize, steps_v: usize) -> WireMesh {
    let mut mesh = WireMesh::with_capacity(vertex_count(steps_u, steps_v).unwrap_or(0));

    let steps_u = steps_u.max(1);
    let steps_v = steps_v.max(1);

    for i in 0..=steps_u {
        let u = sample(U_RANGE, steps_u, i);
        for j in 0..=steps_v {
            let v = sample(V_RANGE, steps_v, j);
            mesh.push_point(to_f32(point(u, v)));
        }
        mesh.push_break();
    }

    for j in 0..=steps_v {
        let v = sample(V_RANGE, steps_v, j);
        let first = to_f32(point(U_RANGE.0, v));
        for i in 0..=steps_u {
            let u = sample(U_RANGE, steps_u, i);
            mesh.push_point(to_f32(point(u, v)));
        }
        mesh.push_point(first);
        mesh.push_break();
    }

    mesh
}
